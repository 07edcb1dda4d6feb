// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while anchoring openings and segmenting walls
///
/// Only [`Error::UnknownUnit`] and [`Error::DegenerateSegment`] are returned
/// by public operations. The plan pipeline reports the rest as a
/// [`crate::plan::PlanIssue`]; [`crate::plan::PlanIssue::error`] gives the
/// matching variant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Degenerate segment: length {length_mm:.3}mm is below the 1mm minimum")]
    DegenerateSegment { length_mm: f64 },

    #[error("Opening does not project onto any wall")]
    NoMatchingWall,

    #[error("Invalid wall thickness {thickness_mm}mm, must be positive")]
    InvalidThickness { thickness_mm: f64 },

    #[error("Invalid height band: [{bottom_mm}, {top_mm}] has no usable height")]
    InvalidHeightBand { bottom_mm: f64, top_mm: f64 },

    #[error("Unknown unit '{0}'. Valid: mm, cm, m, ft, in")]
    UnknownUnit(String),
}
