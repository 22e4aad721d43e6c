//! The per-tile result accumulator.

use std::collections::HashMap;

use crate::sequence::Point;
use crate::tile_id::TileId;

/// Minimum number of points a surviving output sequence must have.
pub fn min_points(area: bool) -> usize {
    if area {
        4
    } else {
        2
    }
}

/// One source polygon or polyline, clipped into one tile.
///
/// The outer ring always occupies slot 0; holes follow in input order. For polylines and
/// points, `holes` is always empty.
#[derive(Clone, Debug, Default)]
pub struct RingGroup {
    pub outer: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

impl RingGroup {
    pub fn single(sequence: Vec<Point>) -> Self {
        RingGroup {
            outer: sequence,
            holes: Vec::new(),
        }
    }
}

/// `TileId -> list of surviving groups`, plus the filled-tile ledger readout.
#[derive(Default)]
pub struct TileContents {
    tiles: HashMap<TileId, Vec<RingGroup>>,
}

impl TileContents {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push_group(&mut self, tile: TileId, group: RingGroup) {
        self.tiles.entry(tile).or_default().push(group);
    }

    pub fn contains(&self, tile: &TileId) -> bool {
        self.tiles.contains_key(tile)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Point slicing's single shared group per tile: create it empty on first touch, then
    /// keep returning the same sequence for later points in the same tile.
    pub fn point_sequence(&mut self, tile: TileId) -> &mut Vec<Point> {
        let groups = self.tiles.entry(tile).or_default();
        if groups.is_empty() {
            groups.push(RingGroup::single(Vec::new()));
        }
        &mut groups[0].outer
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileId, &Vec<RingGroup>)> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }
}
