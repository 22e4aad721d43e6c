//! The world-copy driver: orchestrates the stripe and cell clippers across one ring group,
//! re-running with a horizontal world offset when the group crosses the antimeridian, and
//! flushes the resulting per-tile sequences into the result store.

use std::collections::{HashMap, HashSet};

use crate::cell::clip_cell;
use crate::extent::wrap;
use crate::params::SliceParams;
use crate::ranges::FilledLedger;
use crate::sequence::{Point, SequenceArena, SequenceHandle, SequenceHandles};
use crate::stripe::clip_stripes;
use crate::store::{min_points, RingGroup, TileContents};
use crate::tile_id::TileId;

/// One coordinate sequence of a ring group, in world units.
pub struct RingInput {
    pub points: Vec<Point>,
    /// True iff this is the group's outer ring (slot 0); false for holes.
    pub outer: bool,
}

/// One source polygon (outer + holes) or, for linestrings/points, a single ring with `outer`
/// set to simplify the driver's loop over rings.
pub struct GroupInput {
    pub rings: Vec<RingInput>,
}

/// Clips one ring group into `contents`, recording fully-filled runs into `filled`.
///
/// Runs the stripe clipper on every ring, feeding in-range columns to the cell clipper and
/// replaying at `xOffset = -W`/`+W` if the first pass overflows past either edge of the world.
/// Every offset pass for this group shares one scratch store, flushed once at the end.
pub fn slice_group(contents: &mut TileContents, filled: &mut FilledLedger, group: &GroupInput, params: &SliceParams) {
    let mut cell_arena = SequenceArena::new();
    let mut in_progress: HashMap<TileId, SequenceHandles> = HashMap::new();

    let mut offsets = vec![0i64];
    let mut seen: HashSet<i64> = HashSet::new();
    seen.insert(0);

    let mut i = 0;
    while i < offsets.len() {
        let offset = offsets[i];
        i += 1;

        let mut overflow_left = false;
        let mut overflow_right = false;

        for ring in &group.rings {
            let mut stripe_arena = SequenceArena::new();
            let stripe_map = clip_stripes(&mut stripe_arena, &ring.points, params);

            for (&x, handles) in &stripe_map {
                let shifted = x + offset;
                if shifted >= params.w {
                    overflow_right = true;
                    continue;
                }
                if shifted < 0 {
                    overflow_left = true;
                    continue;
                }
                let wrapped = wrap(shifted, params.w);
                if !params.extents.in_range(wrapped) {
                    continue;
                }

                for &h in handles {
                    let points = stripe_arena.get(h).as_slice();
                    if points.len() < 2 {
                        continue;
                    }
                    let points = points.to_vec();
                    let result = clip_cell(&mut cell_arena, &mut in_progress, &points, wrapped, ring.outer, params);
                    if params.area {
                        if let Some(range_set) = result {
                            for r in range_set.ranges() {
                                if ring.outer {
                                    filled.add(wrapped, r);
                                } else {
                                    filled.remove(wrapped, r);
                                }
                            }
                        }
                    }
                }
            }
        }

        if offset == 0 {
            if overflow_right && seen.insert(-params.w) {
                offsets.push(-params.w);
            }
            if overflow_left && seen.insert(params.w) {
                offsets.push(params.w);
            }
        }
    }

    flush_in_progress(contents, &cell_arena, in_progress, params.area);
}

/// Applies the drop-if-too-short policies and appends whatever survives into `contents`.
///
/// For polygons a tile's handle list is one group (`[outer, hole1, hole2, ...]`): the whole
/// group is dropped if the outer ring has fewer than 4 points, otherwise short holes are culled
/// individually. For linestrings/points each handle is an independent, disjoint piece of the
/// one input ring and becomes its own group.
fn flush_in_progress(
    contents: &mut TileContents,
    arena: &SequenceArena,
    in_progress: HashMap<TileId, SequenceHandles>,
    area: bool,
) {
    let min_pts = min_points(area);

    for (tile, handles) in in_progress {
        if handles.is_empty() {
            continue;
        }

        if area {
            let outer = arena.get(handles[0]).as_slice().to_vec();
            if outer.len() < 4 {
                continue;
            }
            let holes: Vec<Vec<Point>> = handles[1..]
                .iter()
                .map(|&h| arena.get(h).as_slice().to_vec())
                .filter(|seq| seq.len() >= min_pts)
                .collect();
            contents.push_group(tile, RingGroup { outer, holes });
        } else {
            for &h in &handles {
                let seq = arena.get(h).as_slice().to_vec();
                if seq.len() >= min_pts {
                    contents.push_group(tile, RingGroup::single(seq));
                }
            }
        }
    }
}
