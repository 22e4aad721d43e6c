//! Mutable coordinate sequences and the arena that owns them.
//!
//! During clipping, the same sequence is referenced both by the column/row currently
//! accumulating points into it and by the output list it will end up in. Rather than share
//! that mutable state through `Rc<RefCell<_>>`, every sequence lives in a [`SequenceArena`]
//! and is referred to everywhere else by a [`SequenceHandle`] (a plain index). The active-row
//! map holds a handle, the output list holds the same handle, and only the final read-out
//! touches the arena to get the actual points.

pub type Point = nalgebra::Vector2<f64>;

/// A growable list of 2-D points, optionally storing an offset+scale transform applied to
/// every point as it is appended.
///
/// [`MutableSequence::new_scaling`] is how the cell clipper turns stripe-local coordinates
/// into tile-local pixel coordinates: points are appended in world/stripe-local space and
/// come out already translated and scaled.
#[derive(Clone, Debug)]
pub struct MutableSequence {
    points: Vec<Point>,
    offset: Point,
    scale: f64,
}

impl Default for MutableSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl MutableSequence {
    /// A plain sequence: `addPoint` stores coordinates unchanged.
    pub fn new() -> Self {
        MutableSequence {
            points: Vec::new(),
            offset: Point::new(0.0, 0.0),
            scale: 1.0,
        }
    }

    /// A sequence that stores `(x - ox) * scale, (y - oy) * scale` for every appended point.
    pub fn new_scaling(ox: f64, oy: f64, scale: f64) -> Self {
        MutableSequence {
            points: Vec::new(),
            offset: Point::new(ox, oy),
            scale,
        }
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        self.points
            .push((Point::new(x, y) - self.offset) * self.scale);
    }

    pub fn push(&mut self, p: Point) {
        self.add_point(p.x, p.y);
    }

    /// Re-appends the first point if it differs from the last, closing an open ring.
    /// No-op on an empty or already-closed sequence.
    pub fn close_ring(&mut self) {
        if let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) {
            if first != last {
                self.points.push(first);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn into_vec(self) -> Vec<Point> {
        self.points
    }
}

/// A handle into a [`SequenceArena`]. Cheap to copy, stable for the arena's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SequenceHandle(usize);

/// The handles accumulated for one column or tile. Almost always holds a single ring (or a ring
/// plus one or two holes); `SmallVec` keeps that common case off the heap, the same way the
/// teacher's stripe/cell clip loop uses `SmallVec` for its handful of per-edge intersections.
pub type SequenceHandles = smallvec::SmallVec<[SequenceHandle; 2]>;

/// Owns every [`MutableSequence`] created while clipping one world copy of one ring.
#[derive(Default)]
pub struct SequenceArena {
    sequences: Vec<MutableSequence>,
}

impl SequenceArena {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn alloc(&mut self) -> SequenceHandle {
        self.alloc_with(MutableSequence::new())
    }

    pub fn alloc_scaling(&mut self, ox: f64, oy: f64, scale: f64) -> SequenceHandle {
        self.alloc_with(MutableSequence::new_scaling(ox, oy, scale))
    }

    pub fn alloc_with(&mut self, sequence: MutableSequence) -> SequenceHandle {
        self.sequences.push(sequence);
        SequenceHandle(self.sequences.len() - 1)
    }

    pub fn get(&self, handle: SequenceHandle) -> &MutableSequence {
        &self.sequences[handle.0]
    }

    pub fn get_mut(&mut self, handle: SequenceHandle) -> &mut MutableSequence {
        &mut self.sequences[handle.0]
    }
}
