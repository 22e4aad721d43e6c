//! `TiledGeometry`: the public facade tying the stripe/cell clippers, the world-copy driver,
//! the point slicer and the result store together into the one object callers construct,
//! populate and read.

use crate::driver::{slice_group, GroupInput};
use crate::extent::TileExtents;
use crate::params::SliceParams;
use crate::points;
use crate::ranges::FilledLedger;
use crate::store::{RingGroup, TileContents};
use crate::tile_id::TileId;

/// Largest zoom this crate will slice at: `1i64 << z` must stay a valid tile index.
pub const MAX_ZOOM: u8 = 62;

/// The one way construction of a [`TiledGeometry`] can fail — everything past this point is
/// total (see module docs on the slicer's discard-if-degenerate policies).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SliceError {
    #[error("zoom {0} exceeds the maximum representable zoom ({MAX_ZOOM})")]
    ZoomTooLarge(u8),
}

/// Plain data carrier for slicing parameters, so a host service can deserialize them from its
/// own configuration the way the teacher's `Config` struct does. Performs no I/O itself.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliceConfig {
    pub zoom: u8,
    pub buffer: f64,
    pub area: bool,
}

/// Cuts one input geometry into per-tile pieces at one fixed zoom.
///
/// Constructed for one input geometry, populated by exactly one [`slice_points`] or
/// [`slice_shapes`] call, then read via [`tile_data`]/[`filled_tiles`] and discarded.
///
/// [`slice_points`]: TiledGeometry::slice_points
/// [`slice_shapes`]: TiledGeometry::slice_shapes
/// [`tile_data`]: TiledGeometry::tile_data
/// [`filled_tiles`]: TiledGeometry::filled_tiles
pub struct TiledGeometry {
    z: u8,
    contents: TileContents,
    filled: FilledLedger,
}

impl TiledGeometry {
    pub fn new(z: u8) -> Result<Self, SliceError> {
        if z > MAX_ZOOM {
            return Err(SliceError::ZoomTooLarge(z));
        }
        Ok(TiledGeometry {
            z,
            contents: TileContents::new(),
            filled: FilledLedger::new(),
        })
    }

    /// Slices normalized `[0, 1]` world coordinates (the point-geometry fast path).
    pub fn slice_points(&mut self, extents: &dyn TileExtents, buffer: f64, coords: impl IntoIterator<Item = (f64, f64)>) {
        points::slice_points(&mut self.contents, coords, extents, buffer, self.z);
    }

    /// Slices polygon/linestring ring groups, already in world units (see `points.rs` for the
    /// normalized-vs-world-unit distinction between the two entry points).
    pub fn slice_shapes(&mut self, extents: &dyn TileExtents, buffer: f64, area: bool, groups: &[GroupInput]) {
        let params = SliceParams::new(buffer, self.z, area, extents);
        for group in groups {
            slice_group(&mut self.contents, &mut self.filled, group, &params);
        }
    }

    /// Every tile with clipped geometry.
    pub fn tile_data(&self) -> impl Iterator<Item = (&TileId, &Vec<RingGroup>)> {
        self.contents.iter()
    }

    /// Every fully-filled tile not already present in [`tile_data`](Self::tile_data).
    pub fn filled_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        let z = self.z;
        let contents = &self.contents;
        self.filled
            .iter()
            .map(move |(x, y)| TileId::new(x, y, z))
            .filter(move |tile| !contents.contains(tile))
    }

    pub fn zoom_level(&self) -> u8 {
        self.z
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::extent::WorldExtents;
    use crate::driver::RingInput;
    use crate::sequence::Point;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
            Point::new(x0, y0),
        ]
    }

    #[test]
    fn rejects_zoom_beyond_the_representable_range() {
        assert_eq!(TiledGeometry::new(MAX_ZOOM + 1), Err(SliceError::ZoomTooLarge(MAX_ZOOM + 1)));
        assert!(TiledGeometry::new(MAX_ZOOM).is_ok());
    }

    #[test]
    fn unit_square_at_z0_produces_one_closed_five_point_tile() {
        let extents = WorldExtents::new(0);
        let mut geom = TiledGeometry::new(0).unwrap();
        let group = GroupInput {
            rings: vec![RingInput {
                points: square(0.0, 0.0, 1.0, 1.0),
                outer: true,
            }],
        };

        geom.slice_shapes(&extents, 0.0, true, &[group]);

        let tiles: Vec<_> = geom.tile_data().collect();
        assert_eq!(tiles.len(), 1);
        let (tile, groups) = tiles[0];
        assert_eq!(*tile, TileId::new(0, 0, 0));
        assert_eq!(groups.len(), 1);
        let outer = &groups[0].outer;
        assert_eq!(outer.len(), 5);
        assert_eq!(outer.first(), outer.last());
        assert!(geom.filled_tiles().next().is_none());
    }

    #[test]
    fn polyline_crossing_a_column_boundary_produces_both_tiles() {
        let extents = WorldExtents::new(1);
        let mut geom = TiledGeometry::new(1).unwrap();
        let group = GroupInput {
            rings: vec![RingInput {
                points: vec![Point::new(0.5, 0.5), Point::new(1.5, 0.5)],
                outer: true,
            }],
        };

        geom.slice_shapes(&extents, 0.0, false, &[group]);

        let tiles: std::collections::HashMap<TileId, Vec<RingGroup>> =
            geom.tile_data().map(|(t, g)| (*t, g.clone())).collect();
        let left = &tiles[&TileId::new(0, 0, 1)][0].outer;
        let right = &tiles[&TileId::new(1, 0, 1)][0].outer;
        assert_eq!(*left.last().unwrap(), Point::new(256.0, 128.0));
        assert_eq!(*right.first().unwrap(), Point::new(0.0, 128.0));
    }

    #[test]
    fn polyline_crossing_the_antimeridian_wraps_both_directions() {
        let extents = WorldExtents::new(1);
        let mut geom = TiledGeometry::new(1).unwrap();
        let group = GroupInput {
            rings: vec![RingInput {
                points: vec![Point::new(-0.1, 0.5), Point::new(1.1, 0.5)],
                outer: true,
            }],
        };

        geom.slice_shapes(&extents, 0.0, false, &[group]);

        assert!(geom.tile_data().any(|(t, _)| *t == TileId::new(0, 0, 1)));
        assert!(geom.tile_data().any(|(t, _)| *t == TileId::new(1, 0, 1)));
    }

    #[test]
    fn exact_boundary_point_touches_all_four_neighbors() {
        let extents = WorldExtents::new(3);
        let mut geom = TiledGeometry::new(3).unwrap();

        geom.slice_points(&extents, 0.0, [(0.5, 0.5)]);

        let mut tiles: Vec<_> = geom.tile_data().map(|(t, _)| *t).collect();
        tiles.sort_by_key(|t| (t.x, t.y));
        assert_eq!(
            tiles,
            vec![
                TileId::new(3, 3, 3),
                TileId::new(3, 4, 3),
                TileId::new(4, 3, 3),
                TileId::new(4, 4, 3),
            ]
        );
    }

    #[test]
    fn full_world_square_at_z2_reports_all_sixteen_tiles_filled() {
        // A polygon covering the entire world at z=2: every tile's own edges coincide with
        // either the polygon's boundary or its neighbor's, so no tile should keep clipped
        // boundary content at all -- the whole 4x4 grid comes back as filled.
        let extents = WorldExtents::new(2);
        let mut geom = TiledGeometry::new(2).unwrap();
        let group = GroupInput {
            rings: vec![RingInput {
                points: square(0.0, 0.0, 4.0, 4.0),
                outer: true,
            }],
        };

        geom.slice_shapes(&extents, 0.0, true, &[group]);

        assert_eq!(geom.tile_data().count(), 0, "a fully-filled world should keep no boundary data");

        let mut filled: Vec<_> = geom.filled_tiles().collect();
        filled.sort_by_key(|t| (t.x, t.y));
        let expected: Vec<_> = (0..4).flat_map(|x| (0..4).map(move |y| TileId::new(x, y, 2))).collect();
        assert_eq!(filled, expected);
    }

    #[test]
    fn full_world_square_with_a_hole_leaves_one_tile_with_a_synthetic_outer() {
        // Same world-covering square, but with a hole entirely inside tile (1,1,2): that one
        // tile keeps real boundary data (a synthetic fill square plus the clipped hole ring)
        // and drops out of filled_tiles, while the other 15 tiles remain fully filled.
        let extents = WorldExtents::new(2);
        let mut geom = TiledGeometry::new(2).unwrap();
        let group = GroupInput {
            rings: vec![
                RingInput {
                    points: square(0.0, 0.0, 4.0, 4.0),
                    outer: true,
                },
                RingInput {
                    points: square(1.25, 1.25, 1.75, 1.75),
                    outer: false,
                },
            ],
        };

        geom.slice_shapes(&extents, 0.0, true, &[group]);

        let hole_tile = TileId::new(1, 1, 2);

        let tiles: Vec<_> = geom.tile_data().collect();
        assert_eq!(tiles.len(), 1);
        let (tile, groups) = tiles[0];
        assert_eq!(*tile, hole_tile);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].outer.len(), 5, "synthetic fill square has 5 closed-ring points");
        assert_eq!(groups[0].outer.first(), groups[0].outer.last());
        assert_eq!(groups[0].holes.len(), 1);

        let mut filled: Vec<_> = geom.filled_tiles().collect();
        filled.sort_by_key(|t| (t.x, t.y));
        assert_eq!(filled.len(), 15);
        assert!(!filled.contains(&hole_tile));
    }

    #[test]
    fn serde_feature_round_trips_slice_config() {
        let cfg = SliceConfig {
            zoom: 4,
            buffer: 0.05,
            area: true,
        };
        assert_eq!(cfg.zoom, 4);
    }
}
