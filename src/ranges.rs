//! Integer ranges and the per-column filled-tile ledger built from them.

use std::collections::HashMap;

/// An inclusive run of integer tile rows `[lo, hi]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntRange {
    pub lo: i64,
    pub hi: i64,
}

impl IntRange {
    pub fn new(lo: i64, hi: i64) -> Self {
        debug_assert!(lo <= hi);
        IntRange { lo, hi }
    }

    pub fn contains(&self, v: i64) -> bool {
        self.lo <= v && v <= self.hi
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> {
        self.lo..=self.hi
    }
}

/// A sorted set of disjoint, non-adjacent [`IntRange`]s, supporting union and difference.
#[derive(Clone, Debug, Default)]
pub struct RangeSet {
    ranges: Vec<IntRange>,
}

impl RangeSet {
    pub fn new() -> Self {
        Default::default()
    }

    fn merge_sorted(mut items: Vec<IntRange>) -> Vec<IntRange> {
        items.sort_by_key(|r| r.lo);
        let mut out: Vec<IntRange> = Vec::with_capacity(items.len());
        for r in items {
            if let Some(last) = out.last_mut() {
                if r.lo <= last.hi + 1 {
                    if r.hi > last.hi {
                        last.hi = r.hi;
                    }
                    continue;
                }
            }
            out.push(r);
        }
        out
    }

    /// Unions `r` into this set.
    pub fn add(&mut self, r: IntRange) {
        let mut items = self.ranges.clone();
        items.push(r);
        self.ranges = Self::merge_sorted(items);
    }

    /// Subtracts `r` from this set.
    pub fn remove(&mut self, r: IntRange) {
        let mut result = Vec::with_capacity(self.ranges.len() + 1);
        for existing in &self.ranges {
            if existing.hi < r.lo || existing.lo > r.hi {
                result.push(*existing);
                continue;
            }
            if existing.lo < r.lo {
                result.push(IntRange::new(existing.lo, r.lo - 1));
            }
            if existing.hi > r.hi {
                result.push(IntRange::new(r.hi + 1, existing.hi));
            }
        }
        self.ranges = result;
    }

    pub fn add_all(&mut self, other: &RangeSet) {
        for r in &other.ranges {
            self.add(*r);
        }
    }

    pub fn remove_all(&mut self, other: &RangeSet) {
        for r in &other.ranges {
            self.remove(*r);
        }
    }

    pub fn intersect(&self, other: &RangeSet) -> RangeSet {
        let mut ranges = Vec::new();
        for a in &self.ranges {
            for b in &other.ranges {
                let lo = a.lo.max(b.lo);
                let hi = a.hi.min(b.hi);
                if lo <= hi {
                    ranges.push(IntRange::new(lo, hi));
                }
            }
        }
        RangeSet { ranges }
    }

    pub fn contains(&self, v: i64) -> bool {
        self.ranges.iter().any(|r| r.contains(v))
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The disjoint `IntRange`s making up this set, in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = IntRange> + '_ {
        self.ranges.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ranges.iter().flat_map(|r| r.iter())
    }
}

/// Per-column (`x`) accumulation of filled y-ranges, lazily allocated: a column with no
/// `add`/`remove` calls never appears in the map (most geometries never fill a whole tile).
#[derive(Default)]
pub struct FilledLedger {
    columns: HashMap<i64, RangeSet>,
}

impl FilledLedger {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, x: i64, r: IntRange) {
        self.columns.entry(x).or_default().add(r);
    }

    pub fn remove(&mut self, x: i64, r: IntRange) {
        if let Some(set) = self.columns.get_mut(&x) {
            set.remove(r);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.values().all(RangeSet::is_empty)
    }

    /// Iterates every `(x, y)` tile still marked filled.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.columns
            .iter()
            .flat_map(|(&x, set)| set.iter().map(move |y| (x, y)))
    }
}
