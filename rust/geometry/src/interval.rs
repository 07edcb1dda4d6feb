// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 1-D interval algebra for cutting openings out of walls

use smallvec::SmallVec;

/// Closed interval `(start, end)` in millimeters
pub type Interval = (f64, f64);

/// Disjoint intervals; a wall rarely has more than a few vertical spans
pub type IntervalSet = SmallVec<[Interval; 4]>;

/// Default tolerance for split point dedupe and overlap tests
pub const INTERVAL_EPSILON_MM: f64 = 1.0;

/// Remove `cut` from a set of disjoint intervals
///
/// A degenerate cut (`end <= start`) leaves `source` unchanged. Intervals fully
/// inside the cut disappear, partially covered ones are truncated, and an
/// interval strictly containing the cut is split in two. Applying several
/// cuts gives the same set in any order.
pub fn subtract(source: &[Interval], cut: Interval) -> IntervalSet {
    let (cut_start, cut_end) = cut;
    if cut_end <= cut_start {
        return source.iter().copied().collect();
    }

    let mut result = IntervalSet::new();
    for &(start, end) in source {
        if cut_end <= start || cut_start >= end {
            result.push((start, end));
            continue;
        }
        if cut_start > start {
            result.push((start, cut_start));
        }
        if cut_end < end {
            result.push((cut_end, end));
        }
    }
    result
}

/// Drop values within `epsilon` of the previously retained value
///
/// `points` must already be sorted ascending.
pub fn dedupe_sorted(points: &[f64], epsilon: f64) -> Vec<f64> {
    let mut result: Vec<f64> = Vec::with_capacity(points.len());
    for &point in points {
        match result.last() {
            Some(&last) if point - last <= epsilon => {}
            _ => result.push(point),
        }
    }
    result
}

/// Whether `a` and `b` share more than `tolerance` of length
pub fn overlaps(a: Interval, b: Interval, tolerance: f64) -> bool {
    a.0 < b.1 - tolerance && a.1 > b.0 + tolerance
}
