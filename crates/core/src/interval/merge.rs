use super::{sort_canonical, Interval};

/// Merge a set of intervals into the minimal sorted set of disjoint ranges.
///
/// Input order does not matter. Intervals that overlap or touch
/// (`a.end == b.start`) are coalesced, and the merged range owns the union of
/// its inputs' owners. A point interval joins a neighbour only when the
/// neighbour's bounds include that instant; otherwise it is kept as-is.
///
/// The output is sorted by start, and no two output intervals overlap or touch.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sort_canonical(&mut sorted);

    let mut iter = sorted.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    for next in iter {
        if next.start <= current.end {
            current.end = current.end.max(next.end);
            current.owners.extend(next.owners);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{covered_duration, total_duration};
    use uuid::Uuid;

    fn iv(start: f64, end: f64) -> Interval {
        Interval::new(start, end)
    }

    fn bounds(set: &[Interval]) -> Vec<(f64, f64)> {
        set.iter().map(|i| (i.start, i.end)).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(merge(&[]).is_empty());
    }

    #[test]
    fn single_interval_is_returned_unchanged() {
        assert_eq!(bounds(&merge(&[iv(2.0, 4.0)])), vec![(2.0, 4.0)]);
    }

    #[test]
    fn overlapping_intervals_coalesce() {
        let merged = merge(&[iv(5.0, 15.0), iv(0.0, 10.0)]);
        assert_eq!(bounds(&merged), vec![(0.0, 15.0)]);
    }

    #[test]
    fn touching_intervals_coalesce() {
        let merged = merge(&[iv(0.0, 5.0), iv(5.0, 8.0)]);
        assert_eq!(bounds(&merged), vec![(0.0, 8.0)]);
    }

    #[test]
    fn gaps_are_preserved_and_output_sorted() {
        let merged = merge(&[iv(20.0, 25.0), iv(0.0, 5.0), iv(6.0, 7.0)]);
        assert_eq!(bounds(&merged), vec![(0.0, 5.0), (6.0, 7.0), (20.0, 25.0)]);
    }

    #[test]
    fn contained_interval_is_absorbed() {
        let merged = merge(&[iv(0.0, 10.0), iv(2.0, 3.0)]);
        assert_eq!(bounds(&merged), vec![(0.0, 10.0)]);
    }

    #[test]
    fn point_on_boundary_joins_neighbour() {
        let merged = merge(&[iv(0.0, 10.0), iv(10.0, 10.0)]);
        assert_eq!(bounds(&merged), vec![(0.0, 10.0)]);
    }

    #[test]
    fn isolated_point_is_kept() {
        let merged = merge(&[iv(0.0, 10.0), iv(12.0, 12.0)]);
        assert_eq!(bounds(&merged), vec![(0.0, 10.0), (12.0, 12.0)]);
    }

    #[test]
    fn merged_interval_owns_all_inputs() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let merged = merge(&[Interval::owned(0.0, 4.0, a), Interval::owned(3.0, 6.0, b)]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].owners.contains(&a));
        assert!(merged[0].owners.contains(&b));
    }

    #[test]
    fn merge_is_idempotent() {
        let set = [
            iv(4.0, 9.0),
            iv(0.0, 1.0),
            iv(1.0, 2.5),
            iv(8.0, 12.0),
            iv(30.0, 30.0),
            iv(14.0, 16.0),
        ];
        let once = merge(&set);
        assert_eq!(merge(&once), once);
    }

    #[test]
    fn merge_preserves_covered_duration() {
        let set = [iv(0.0, 4.0), iv(2.0, 6.0), iv(10.0, 11.0), iv(10.5, 10.5)];
        let merged = merge(&set);
        assert_eq!(total_duration(&merged), 7.0);
        assert_eq!(covered_duration(&set), total_duration(&merged));
    }

    #[test]
    fn output_never_touches_or_overlaps() {
        let merged = merge(&[iv(0.0, 1.0), iv(1.0, 2.0), iv(3.0, 4.0), iv(3.5, 5.0)]);
        for pair in merged.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }
}
