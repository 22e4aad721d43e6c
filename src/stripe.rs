//! The stripe clipper: cuts one coordinate sequence into per-column (X-axis) pieces.
//!
//! For polygon rings the active slice at a column is never retired on exit, so a ring that
//! dips outside the column's buffered window and back in continues writing into the same
//! sequence (it gets closed into one ring at the end). For polylines an exited slice is
//! retired, so a later re-entry into the same column starts a fresh, disjoint piece.

use std::collections::HashMap;

use crate::params::{SliceParams, WARN_MIN_ZOOM};
use crate::primitives::{side, Line, Side, X};
use crate::sequence::{Point, SequenceArena, SequenceHandle, SequenceHandles};

/// Stripe-local sub-sequences produced for one input sequence, keyed by world column
/// (not yet wrapped or offset by a world copy).
pub type StripeMap = HashMap<i64, SequenceHandles>;

pub fn clip_stripes(arena: &mut SequenceArena, points: &[Point], params: &SliceParams) -> StripeMap {
    let mut active: HashMap<i64, SequenceHandle> = HashMap::new();
    let mut output: StripeMap = HashMap::new();

    if points.len() < 2 {
        return output;
    }

    let k1 = params.k1();
    let k2 = params.k2();
    let nb = params.neighbor_buffer;

    let mut get_or_create = |arena: &mut SequenceArena,
                             active: &mut HashMap<i64, SequenceHandle>,
                             output: &mut StripeMap,
                             x: i64| {
        *active.entry(x).or_insert_with(|| {
            let h = arena.alloc();
            output.entry(x).or_default().push(h);
            h
        })
    };

    // The first vertex is never `b` of any preceding edge, so (unlike a closed ring, which
    // gets it back via wraparound) it must be seeded explicitly or a polyline starting inside
    // a column would lose its first point.
    seed_endpoint(
        arena,
        &mut active,
        &mut output,
        points[0],
        nb,
        k1,
        k2,
        &mut get_or_create,
    );

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let x_lo = (a.x.min(b.x) - nb).floor() as i64;
        let x_hi = (a.x.max(b.x) + nb).floor() as i64;

        if params.z >= WARN_MIN_ZOOM && (x_hi - x_lo + 1) >= params.w - 1 {
            log::warn!(
                "stripe clipper: a single edge spans {} of {} stripes at z={} \
                 (likely malformed input)",
                x_hi - x_lo + 1,
                params.w,
                params.z
            );
        }

        for x in x_lo..=x_hi {
            let ax = a.x - x as f64;
            let bx = b.x - x as f64;
            let sa = side(ax, k1, k2);
            let sb = side(bx, k1, k2);

            if matches!((sa, sb), (Side::Low, Side::Low) | (Side::High, Side::High)) {
                continue;
            }

            let handle = get_or_create(arena, &mut active, &mut output, x);
            emit_transition(arena.get_mut(handle), a, b, sa, sb, x, k1, k2);

            if !params.area && sb != Side::Inside {
                active.remove(&x);
            }
        }
    }

    let last = *points.last().unwrap();
    let x_lo = (last.x - nb).floor() as i64 - 1;
    let x_hi = (last.x + nb).floor() as i64 + 1;
    for x in x_lo..=x_hi {
        if let Some(&handle) = active.get(&x) {
            let local = Point::new(last.x - x as f64, last.y);
            if side(local.x, k1, k2) == Side::Inside {
                let seq = arena.get_mut(handle);
                // The edge loop above typically already emitted this exact point as the
                // last edge's endpoint; avoid re-appending a verbatim duplicate.
                if seq.as_slice().last() != Some(&local) {
                    seq.push(local);
                }
            }
        }
    }

    if params.area {
        for handles in output.values() {
            for &h in handles {
                arena.get_mut(h).close_ring();
            }
        }
    }

    output
}

/// Seeds a slice with `p` at every column where `p` itself lies within the clip window, so
/// a sequence's very first point isn't silently dropped (see module docs).
fn seed_endpoint(
    arena: &mut SequenceArena,
    active: &mut HashMap<i64, SequenceHandle>,
    output: &mut StripeMap,
    p: Point,
    nb: f64,
    k1: f64,
    k2: f64,
    get_or_create: &mut impl FnMut(&mut SequenceArena, &mut HashMap<i64, SequenceHandle>, &mut StripeMap, i64) -> SequenceHandle,
) {
    let x_lo = (p.x - nb).floor() as i64 - 1;
    let x_hi = (p.x + nb).floor() as i64 + 1;
    for x in x_lo..=x_hi {
        let local = p.x - x as f64;
        if side(local, k1, k2) == Side::Inside {
            let handle = get_or_create(arena, active, output, x);
            arena.get_mut(handle).add_point(local, p.y);
        }
    }
}

/// Appends whichever boundary intersections and/or endpoint are implied by the edge `a`-`b`
/// crossing from classification `sa` to `sb` against the window `[k1, k2]`.
fn emit_transition(
    seq: &mut crate::sequence::MutableSequence,
    a: Point,
    b: Point,
    sa: Side,
    sb: Side,
    x: i64,
    k1: f64,
    k2: f64,
) {
    let at = |value: f64| -> Point {
        let p = Line(X, x as f64 + value).intersect(a, b);
        Point::new(p.x - x as f64, p.y)
    };
    let local_b = Point::new(b.x - x as f64, b.y);

    match (sa, sb) {
        (Side::Inside, Side::Inside) => seq.push(local_b),
        (Side::Inside, Side::Low) => seq.push(at(k1)),
        (Side::Inside, Side::High) => seq.push(at(k2)),
        (Side::Low, Side::Inside) => {
            seq.push(at(k1));
            seq.push(local_b);
        }
        (Side::High, Side::Inside) => {
            seq.push(at(k2));
            seq.push(local_b);
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
