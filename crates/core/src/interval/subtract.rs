use super::{is_sorted_by_start, merge, sort_canonical, Interval};

/// Remove from `base` all time covered by `exclude`.
///
/// A base interval fully contained by an exclude interval
/// (`e.start <= b.start && e.end >= b.end`) is dropped. Otherwise each exclude
/// overlapping it carves out its own gap, so one base interval can split into
/// several fragments. An exclude that only shares a boundary instant with the
/// base leaves it intact. Fragments keep the base interval's owners.
///
/// `base` is merged first, so overlapping base intervals are carved as one
/// range. The output is sorted by start, fragments are pairwise disjoint
/// (they may touch where a point exclude split a range), and it never covers
/// more time than `base`.
pub fn subtract(base: &[Interval], exclude: &[Interval]) -> Vec<Interval> {
    let merged_base = merge(base);
    if exclude.is_empty() {
        return merged_base;
    }

    let mut sorted_exclude = exclude.to_vec();
    sort_canonical(&mut sorted_exclude);

    let mut out = Vec::new();
    for b in &merged_base {
        carve(b, &sorted_exclude, &mut out);
    }
    out
}

/// Carve `excludes` out of a single base interval, appending the fragments.
///
/// Requires `excludes` sorted by start.
fn carve(b: &Interval, excludes: &[Interval], out: &mut Vec<Interval>) {
    debug_assert!(is_sorted_by_start(excludes), "excludes must be sorted by start");

    if excludes
        .iter()
        .any(|e| e.start <= b.start && e.end >= b.end)
    {
        return;
    }

    let mut cursor = b.start;
    let mut carved = false;
    for e in excludes {
        if e.start >= b.end {
            break;
        }
        if e.end <= cursor {
            continue;
        }
        carved = true;
        if cursor < e.start {
            out.push(b.with_bounds(cursor, e.start));
        }
        cursor = cursor.max(e.end);
    }

    if !carved {
        out.push(b.clone());
    } else if cursor < b.end {
        out.push(b.with_bounds(cursor, b.end));
    }
}
