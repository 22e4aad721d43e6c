//! The point slicer: the degenerate fast path for point geometries.
//!
//! Unlike the stripe/cell clippers, points never pass through X- then Y-axis clipping —
//! each input coordinate is assigned directly to every tile within `neighborBuffer`.

use crate::extent::{wrap, TileExtents, TILE_PIXELS};
use crate::store::TileContents;
use crate::tile_id::TileId;

/// Slices normalized `[0, 1]` world coordinates into tiles at zoom `z`.
///
/// `coords` are normalized (a fraction of the whole world), not yet multiplied by `2^z` —
/// this is the one entry point that takes normalized input; `sliceShapes`' rings are already
/// in world units (see `geometry.rs`).
pub fn slice_points(
    contents: &mut TileContents,
    coords: impl IntoIterator<Item = (f64, f64)>,
    extents: &dyn TileExtents,
    buffer: f64,
    z: u8,
) {
    let w = 1i64 << z;
    let nb = buffer + crate::extent::NEIGHBOR_BUFFER_EPS;

    for (cx, cy) in coords {
        let wx = cx * w as f64;
        let wy = cy * w as f64;

        let x_min = (wx - nb).floor() as i64;
        let x_max = (wx + nb).floor() as i64;
        let y_min = (extents.min_y()).max((wy - nb).floor() as i64);
        let y_max = (extents.max_y() - 1).min((wy + nb).floor() as i64);

        for x in x_min..=x_max {
            let wrapped = wrap(x, w);
            if !extents.in_range(wrapped) {
                continue;
            }
            for y in y_min..=y_max {
                let tile = TileId::new(wrapped, y, z);
                let local_x = (wx - x as f64) * TILE_PIXELS;
                let local_y = (wy - y as f64) * TILE_PIXELS;
                contents
                    .point_sequence(tile)
                    .push(crate::sequence::Point::new(local_x, local_y));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::extent::WorldExtents;

    #[test]
    fn boundary_point_touches_all_four_neighbors() {
        let mut contents = TileContents::new();
        let extents = WorldExtents::new(3);
        slice_points(&mut contents, [(0.5, 0.5)], &extents, 0.0, 3);

        // z=3 -> W=8, world coordinate (4.0, 4.0): exactly the corner shared by 4 tiles.
        let mut tiles: Vec<_> = contents.iter().map(|(id, _)| *id).collect();
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
    fn world_seam_wraps_both_directions() {
        let mut contents = TileContents::new();
        let extents = WorldExtents::new(2);
        // Slightly negative world-x wraps to the last column; slightly over W wraps to 0.
        slice_points(&mut contents, [(-0.001, 0.5)], &extents, 0.0, 2);
        let mut tiles: Vec<_> = contents.iter().map(|(id, _)| id.x).collect();
        tiles.sort();
        assert!(tiles.contains(&3), "wraps to last column at z=2: {tiles:?}");
    }

    #[test]
    fn interior_point_is_assigned_to_exactly_one_tile() {
        let mut contents = TileContents::new();
        let extents = WorldExtents::new(3);
        slice_points(&mut contents, [(0.2, 0.3)], &extents, 0.0, 3);
        assert_eq!(contents.len(), 1);
    }
}
