use super::{sort_canonical, Interval};

/// Intersect two interval sets.
///
/// Every pair `(a, b)` whose closed ranges meet contributes
/// `[max(a.start, b.start), min(a.end, b.end)]`, owned by the union of both
/// owner sets. Ranges that only touch produce a point interval. The result
/// is sorted canonically, so `intersect(a, b) == intersect(b, a)`.
pub fn intersect(set_a: &[Interval], set_b: &[Interval]) -> Vec<Interval> {
    let mut out = Vec::new();
    for a in set_a {
        for b in set_b {
            let start = a.start.max(b.start);
            let end = a.end.min(b.end);
            if start > end {
                continue;
            }
            let mut overlap = Interval::new(start, end);
            overlap.owners.extend(a.owners.iter().copied());
            overlap.owners.extend(b.owners.iter().copied());
            out.push(overlap);
        }
    }
    sort_canonical(&mut out);
    out
}

/// Intersect any number of sets by folding [`intersect`] left to right.
///
/// Only time covered by every set survives. No sets, or any empty set,
/// yields an empty result.
pub fn intersect_all(sets: &[Vec<Interval>]) -> Vec<Interval> {
    let Some((first, rest)) = sets.split_first() else {
        return Vec::new();
    };
    let mut acc = first.clone();
    sort_canonical(&mut acc);
    for set in rest {
        if acc.is_empty() {
            break;
        }
        acc = intersect(&acc, set);
    }
    acc
}
