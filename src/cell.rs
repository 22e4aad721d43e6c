//! The cell clipper: cuts one stripe sub-sequence into per-tile (Y-axis) pieces, and for
//! polygons detects vertical runs of entirely-filled tiles along the stripe's own left/right
//! edges without ever materializing their interior coordinates.
//!
//! Mirrors `stripe.rs` on the Y axis, plus two extra mechanisms: edge-fill skipping (a vertical
//! edge riding the stripe's buffered boundary "outward" skips whole runs of filled tile rows
//! instead of touching each one) and backfill (a later segment that creates a slice in a
//! previously-skipped row gets the skipped boundary replayed into it first).

use std::collections::HashMap;

use crate::extent::{FILL_SQUARE_PAD, TILE_PIXELS};
use crate::params::SliceParams;
use crate::primitives::{side, Line, Side, Y};
use crate::ranges::{IntRange, RangeSet};
use crate::sequence::{MutableSequence, Point, SequenceArena, SequenceHandle, SequenceHandles};
use crate::tile_id::TileId;

/// Which buffered stripe edge a skipped run was recorded against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SkipSide {
    Left,
    Right,
}

const EDGE_EPS: f64 = 1e-9;

/// Clips one stripe sub-sequence `points` (stripe-local X, world Y) at world column `x` into
/// tile-local pixel sequences appended to `in_progress`. Returns the y-range (if any) that both
/// of the stripe's vertical edges swept past without a boundary crossing — i.e. fully filled.
pub fn clip_cell(
    arena: &mut SequenceArena,
    in_progress: &mut HashMap<TileId, SequenceHandles>,
    points: &[Point],
    x: i64,
    outer: bool,
    params: &SliceParams,
) -> Option<RangeSet> {
    if points.len() < 2 {
        return None;
    }

    let mut active: HashMap<i64, SequenceHandle> = HashMap::new();
    let mut journal: Vec<(SkipSide, i64, i64)> = Vec::new();
    let mut left_filled = RangeSet::new();
    let mut right_filled = RangeSet::new();

    let k1 = params.k1();
    let k2 = params.k2();
    let nb = params.neighbor_buffer;
    let z = params.z;

    seed_endpoint(arena, in_progress, &mut active, &journal, points[0], x, z, outer, params);

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);

        if params.area {
            if let Some(edge_side) = is_skip_edge(a, b, params.buffer) {
                handle_skip(&mut journal, &mut left_filled, &mut right_filled, edge_side, a, b);
                continue;
            }
        }

        let y_lo = (a.y.min(b.y) - nb).floor() as i64;
        let y_hi = (a.y.max(b.y) + nb).floor() as i64;

        for y in y_lo..=y_hi {
            if y < params.extents.min_y() || y >= params.extents.max_y() {
                continue;
            }
            let ay = a.y - y as f64;
            let by = b.y - y as f64;
            let sa = side(ay, k1, k2);
            let sb = side(by, k1, k2);

            if matches!((sa, sb), (Side::Low, Side::Low) | (Side::High, Side::High)) {
                continue;
            }

            let handle = get_or_create(arena, in_progress, &mut active, &journal, x, y, z, outer, params.buffer);
            emit_transition(arena.get_mut(handle), a, b, sa, sb, y, k1, k2);

            if !params.area && sb != Side::Inside {
                active.remove(&y);
            }
        }
    }

    let last = *points.last().unwrap();
    let y_lo = (last.y - nb).floor() as i64 - 1;
    let y_hi = (last.y + nb).floor() as i64 + 1;
    for y in y_lo..=y_hi {
        if y < params.extents.min_y() || y >= params.extents.max_y() {
            continue;
        }
        if let Some(&handle) = active.get(&y) {
            let ly = last.y - y as f64;
            if side(ly, k1, k2) == Side::Inside {
                let seq = arena.get_mut(handle);
                // The edge loop above typically already emitted this exact point as the
                // last edge's endpoint; avoid re-appending a verbatim duplicate.
                let transformed = Point::new(last.x, ly) * TILE_PIXELS;
                if seq.as_slice().last() != Some(&transformed) {
                    seq.push(last);
                }
            }
        }
    }

    if params.area {
        for &h in active.values() {
            arena.get_mut(h).close_ring();
        }
    }

    let result = left_filled.intersect(&right_filled);
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

/// Seeds a slice with `p` at every row where `p` itself lies within the clip window, mirroring
/// `stripe::seed_endpoint` (without it, a polyline's very first point would be dropped).
#[allow(clippy::too_many_arguments)]
fn seed_endpoint(
    arena: &mut SequenceArena,
    in_progress: &mut HashMap<TileId, SequenceHandles>,
    active: &mut HashMap<i64, SequenceHandle>,
    journal: &[(SkipSide, i64, i64)],
    p: Point,
    x: i64,
    z: u8,
    outer: bool,
    params: &SliceParams,
) {
    let k1 = params.k1();
    let k2 = params.k2();
    let nb = params.neighbor_buffer;
    let y_lo = (p.y - nb).floor() as i64 - 1;
    let y_hi = (p.y + nb).floor() as i64 + 1;
    for y in y_lo..=y_hi {
        if y < params.extents.min_y() || y >= params.extents.max_y() {
            continue;
        }
        let ly = p.y - y as f64;
        if side(ly, k1, k2) == Side::Inside {
            let handle = get_or_create(arena, in_progress, active, journal, x, y, z, outer, params.buffer);
            arena.get_mut(handle).add_point(p.x, p.y);
        }
    }
}

/// Looks up the active slice for row `y`, or creates one: allocates a tile-pixel-scaled
/// sequence, registers it in `in_progress` (first inserting the synthetic fill square if this
/// is a hole touching a tile its outer never visited), and replays any journaled skip events
/// that cover this row.
#[allow(clippy::too_many_arguments)]
fn get_or_create(
    arena: &mut SequenceArena,
    in_progress: &mut HashMap<TileId, SequenceHandles>,
    active: &mut HashMap<i64, SequenceHandle>,
    journal: &[(SkipSide, i64, i64)],
    x: i64,
    y: i64,
    z: u8,
    outer: bool,
    buffer: f64,
) -> SequenceHandle {
    if let Some(&h) = active.get(&y) {
        return h;
    }

    let tile = TileId::new(x, y, z);
    let handle = arena.alloc_scaling(0.0, y as f64, TILE_PIXELS);

    let needs_square = !outer && in_progress.get(&tile).map_or(true, |v| v.is_empty());
    let square = if needs_square { Some(fill_square(arena, buffer)) } else { None };

    let entry = in_progress.entry(tile).or_default();
    if let Some(sq) = square {
        entry.push(sq);
    }
    entry.push(handle);

    active.insert(y, handle);

    for &(skip_side, lo, hi) in journal {
        if lo <= y && y <= hi {
            let seq = arena.get_mut(handle);
            match skip_side {
                SkipSide::Left => {
                    seq.add_point(-buffer, (y + 1) as f64);
                    seq.add_point(-buffer, y as f64);
                }
                SkipSide::Right => {
                    seq.add_point(1.0 + buffer, y as f64);
                    seq.add_point(1.0 + buffer, (y + 1) as f64);
                }
            }
        }
    }

    handle
}

/// A tile-sized closed square strictly enclosing any hole clipped into the same tile, used when
/// a hole reaches a tile its own outer ring never touched (the tile is entirely inside the
/// outer's body).
fn fill_square(arena: &mut SequenceArena, buffer: f64) -> SequenceHandle {
    let handle = arena.alloc();
    let pad = buffer + FILL_SQUARE_PAD;
    let lo = -TILE_PIXELS * pad;
    let hi = TILE_PIXELS * (1.0 + pad);
    let seq = arena.get_mut(handle);
    seq.add_point(lo, lo);
    seq.add_point(hi, lo);
    seq.add_point(hi, hi);
    seq.add_point(lo, hi);
    seq.add_point(lo, lo);
    handle
}

/// Classifies a vertical edge riding exactly on the stripe's buffered left/right edge, traveling
/// "outward" (down on the right edge, up on the left edge — the direction a CCW outer ring
/// traces when that edge is on the interior of a filled column).
fn is_skip_edge(a: Point, b: Point, buffer: f64) -> Option<SkipSide> {
    if (a.x - b.x).abs() > EDGE_EPS {
        return None;
    }
    if (a.x - (1.0 + buffer)).abs() < EDGE_EPS && b.y > a.y {
        return Some(SkipSide::Right);
    }
    if (a.x - (-buffer)).abs() < EDGE_EPS && b.y < a.y {
        return Some(SkipSide::Left);
    }
    None
}

/// Records the run of tile rows this skip edge passes through with no boundary crossing, into
/// the per-side filled range and the replay journal.
///
/// The filled range is the edge's whole swept span (`first_tile..=last_tile`), computed purely
/// from its own endpoints: it must not depend on whether some *other* edge of the same ring has
/// already materialized one of those rows by the time this edge is processed, since edges of a
/// ring are walked in a fixed order and a row can easily get real content from one edge before
/// the opposite buffered-edge run is even visited — an ordering accident that must not make one
/// side's filled range come out short (or empty) while the other side's doesn't.
///
/// The replay journal only needs the rows strictly between the edge's own endpoints: both
/// endpoints already get real content from whichever adjacent edge of the ring materializes
/// them, so journaling those rows too would just replay redundant boundary points into content
/// a neighboring edge already owns. When the edge doesn't span any such interior row (it covers
/// only its own one or two endpoint rows), fall back to journaling its full start/end span
/// instead (spec's `startEndY` fallback) so a row this edge blocks on still gets something to
/// replay rather than nothing.
fn handle_skip(
    journal: &mut Vec<(SkipSide, i64, i64)>,
    left_filled: &mut RangeSet,
    right_filled: &mut RangeSet,
    edge_side: SkipSide,
    a: Point,
    b: Point,
) {
    let (lo, hi) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
    let first_tile = lo.floor() as i64;
    let last_tile = if (hi - hi.floor()).abs() < EDGE_EPS {
        hi as i64 - 1
    } else {
        hi.floor() as i64
    };
    if last_tile < first_tile {
        return;
    }

    let filled_range = IntRange::new(first_tile, last_tile);
    match edge_side {
        SkipSide::Left => left_filled.add(filled_range),
        SkipSide::Right => right_filled.add(filled_range),
    }

    let (journal_lo, journal_hi) = (first_tile + 1, last_tile - 1);
    let (journal_lo, journal_hi) =
        if journal_lo <= journal_hi { (journal_lo, journal_hi) } else { (first_tile, last_tile) };
    journal.push((edge_side, journal_lo, journal_hi));
}

/// Appends whichever boundary intersections and/or endpoint are implied by the edge `a`-`b`
/// crossing from classification `sa` to `sb` against the row window `[y+k1, y+k2]`.
fn emit_transition(seq: &mut MutableSequence, a: Point, b: Point, sa: Side, sb: Side, y: i64, k1: f64, k2: f64) {
    let at = |value: f64| -> Point { Line(Y, y as f64 + value).intersect(a, b) };

    match (sa, sb) {
        (Side::Inside, Side::Inside) => seq.push(b),
        (Side::Inside, Side::Low) => seq.push(at(k1)),
        (Side::Inside, Side::High) => seq.push(at(k2)),
        (Side::Low, Side::Inside) => {
            seq.push(at(k1));
            seq.push(b);
        }
        (Side::High, Side::Inside) => {
            seq.push(at(k2));
            seq.push(b);
        }
        (Side::Low, Side::High) => {
            seq.push(at(k1));
            seq.push(at(k2));
        }
        (Side::High, Side::Low) => {
            seq.push(at(k2));
            seq.push(at(k1));
        }
        (Side::Low, Side::Low) | (Side::High, Side::High) => unreachable!("filtered by caller"),
    }
}
