// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall Segmenter
//!
//! Splits a wall into solid pieces around the openings anchored to it:
//! 1. Horizontal split points at `0`, the wall length, and every opening span
//!    end (whole millimeters, deduped at 1mm)
//! 2. For each horizontal run, the openings overlapping it
//! 3. The full height band minus each overlapping opening band
//! 4. One piece per remaining vertical span
//!
//! Runs and spans shorter than 60mm produce no geometry.

use crate::coords::CoordinateMapper;
use crate::interval::{self, IntervalSet, INTERVAL_EPSILON_MM};
use crate::model::{AnchoredOpening, WallPiece, WallSegment};

/// Shortest horizontal run that becomes a piece
pub const MIN_PIECE_LENGTH_MM: f64 = 60.0;

/// Shortest vertical span that becomes a piece
pub const MIN_PIECE_HEIGHT_MM: f64 = 60.0;

/// Horizontal split points along a wall of `wall_length` mm
pub fn split_points(wall_length: f64, openings: &[AnchoredOpening]) -> Vec<f64> {
    let mut points = Vec::with_capacity(2 + openings.len() * 2);
    points.push(0.0);
    points.push(wall_length);
    for opening in openings {
        points.push(opening.span_start_mm.round().clamp(0.0, wall_length));
        points.push(opening.span_end_mm.round().clamp(0.0, wall_length));
    }
    points.sort_by(f64::total_cmp);
    interval::dedupe_sorted(&points, INTERVAL_EPSILON_MM)
}

/// Cut `wall` into solid pieces around `openings`
///
/// `openings` must all be anchored to this wall with valid height bands.
/// A degenerate wall or one without a positive thickness produces no pieces;
/// a wall without openings produces a single full piece.
pub fn segment(
    wall_index: usize,
    wall: &WallSegment,
    openings: &[AnchoredOpening],
    wall_height_mm: f64,
) -> Vec<WallPiece> {
    if !wall.is_usable() {
        return Vec::new();
    }

    let wall_length = wall.length();
    let angle = CoordinateMapper::rotation_of(&wall.start, &wall.end);
    let points = split_points(wall_length, openings);

    let mut pieces = Vec::new();
    for run in points.windows(2) {
        let (run_start, run_end) = (run[0], run[1]);
        if run_end - run_start < MIN_PIECE_LENGTH_MM {
            continue;
        }

        let mut spans: IntervalSet = IntervalSet::new();
        spans.push((0.0, wall_height_mm));
        for opening in openings.iter().filter(|o| {
            interval::overlaps(
                (o.span_start_mm, o.span_end_mm),
                (run_start, run_end),
                INTERVAL_EPSILON_MM,
            )
        }) {
            spans = interval::subtract(&spans, opening.band().as_interval());
        }

        for (bottom, top) in spans {
            if top - bottom < MIN_PIECE_HEIGHT_MM {
                continue;
            }
            pieces.push(WallPiece {
                wall_index,
                wall_id: wall.id.clone(),
                start_mm: run_start,
                end_mm: run_end,
                bottom_mm: bottom,
                top_mm: top,
                thickness_mm: wall.thickness_mm,
                angle,
            });
        }
    }

    pieces
}
