//! Interval algebra over media time.
//!
//! An [`Interval`] is a `[start, end)` range in seconds tagged with the set of
//! characters it belongs to. The submodules provide the three set operations
//! the scene finder is built from:
//!
//! - [`merge`] -- coalesce overlapping or touching ranges.
//! - [`intersect`] / [`intersect_all`] -- time where every input set is present.
//! - [`subtract`] -- remove excluded time, splitting ranges where needed.
//!
//! Point intervals (`start == end`) are valid and represent an instantaneous
//! appearance. They are never dropped silently by any operation.

mod intersect;
mod merge;
mod subtract;

use std::collections::BTreeSet;

use crate::types::{CharacterId, Seconds};

pub use intersect::{intersect, intersect_all};
pub use merge::merge;
pub use subtract::subtract;

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// A time range `[start, end)` with its owning characters.
///
/// Invariant: `start <= end`. Operations that combine intervals carry the
/// union of the inputs' owners.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: Seconds,
    pub end: Seconds,
    pub owners: BTreeSet<CharacterId>,
}

impl Interval {
    /// Create an unowned interval.
    ///
    /// Callers must uphold `start <= end`; this is asserted in debug builds.
    pub fn new(start: Seconds, end: Seconds) -> Self {
        debug_assert!(start <= end, "interval start {start} > end {end}");
        Self {
            start,
            end,
            owners: BTreeSet::new(),
        }
    }

    /// Create an interval owned by a single character.
    pub fn owned(start: Seconds, end: Seconds, owner: CharacterId) -> Self {
        Self::new(start, end).with_owner(owner)
    }

    /// Add `owner` to this interval's owner set.
    pub fn with_owner(mut self, owner: CharacterId) -> Self {
        self.owners.insert(owner);
        self
    }

    /// Replace the bounds while keeping the owners.
    pub(crate) fn with_bounds(&self, start: Seconds, end: Seconds) -> Self {
        debug_assert!(start <= end, "interval start {start} > end {end}");
        Self {
            start,
            end,
            owners: self.owners.clone(),
        }
    }

    pub fn duration(&self) -> Seconds {
        self.end - self.start
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Whether the instant `t` lies inside this interval.
    ///
    /// Half-open for ranges; a point interval contains exactly its instant.
    pub fn contains_instant(&self, t: Seconds) -> bool {
        if self.is_point() {
            t == self.start
        } else {
            self.start <= t && t < self.end
        }
    }

    /// Whether the two intervals share any instant.
    ///
    /// Ranges overlap when `a.start < b.end && b.start < a.end`, so ranges that
    /// merely touch do not overlap. A point overlaps whatever contains its
    /// instant.
    pub fn overlaps(&self, other: &Interval) -> bool {
        match (self.is_point(), other.is_point()) {
            (true, _) => other.contains_instant(self.start),
            (false, true) => self.contains_instant(other.start),
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }

    /// Clip this interval to `window`, or `None` when they do not overlap.
    pub fn clip(&self, window: &Interval) -> Option<Interval> {
        if !self.overlaps(window) {
            return None;
        }
        Some(self.with_bounds(
            self.start.max(window.start),
            self.end.min(window.end),
        ))
    }
}

// ---------------------------------------------------------------------------
// Set helpers
// ---------------------------------------------------------------------------

/// Sum of the individual durations. Overlapping time is counted repeatedly.
pub fn total_duration(intervals: &[Interval]) -> Seconds {
    intervals.iter().map(Interval::duration).sum()
}

/// Wall-clock time covered by the set, counting overlaps once.
pub fn covered_duration(intervals: &[Interval]) -> Seconds {
    total_duration(&merge(intervals))
}

/// Smallest single interval spanning every member, or `None` for an empty set.
pub fn hull(intervals: &[Interval]) -> Option<Interval> {
    let start = intervals.iter().map(|i| i.start).reduce(Seconds::min)?;
    let end = intervals.iter().map(|i| i.end).reduce(Seconds::max)?;
    let mut spanning = Interval::new(start, end);
    for interval in intervals {
        spanning.owners.extend(interval.owners.iter().copied());
    }
    Some(spanning)
}

/// Whether the set is sorted by `start` ascending.
pub fn is_sorted_by_start(intervals: &[Interval]) -> bool {
    intervals.windows(2).all(|w| w[0].start <= w[1].start)
}

/// Sort by `start`, then `end`, then owners, so equal inputs yield equal output.
pub(crate) fn sort_canonical(intervals: &mut [Interval]) {
    intervals.sort_by(|a, b| {
        a.start
            .total_cmp(&b.start)
            .then(a.end.total_cmp(&b.end))
            .then_with(|| a.owners.cmp(&b.owners))
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
