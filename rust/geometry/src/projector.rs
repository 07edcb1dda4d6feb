// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening Projector
//!
//! Decides which wall a door or window belongs to and clips it onto that
//! wall's centerline. The same projector serves the 2D snapping preview and
//! the 3D reconstruction; they differ only in [`ProjectorConfig`].
//!
//! A candidate wall must:
//! - run within `min_alignment` of parallel to the opening
//! - keep both opening endpoints within `max(thickness * 0.75, 120mm)` of its
//!   centerline
//! - leave at least 120mm of the opening after clipping to the wall's length
//!
//! Among candidates the lowest fit score wins:
//! `mean lateral distance + trim_weight * trimmed length + (1 - alignment) * K`.

use crate::model::{AnchoredOpening, HeightBand, WallSegment};
use crate::primitives::{self, Segment2D};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Openings shorter than this are degenerate
pub const MIN_OPENING_LENGTH_MM: f64 = 20.0;

/// Shortest clipped span still considered an opening
pub const MIN_SPAN_MM: f64 = 120.0;

/// Lower bound of the lateral tolerance around a wall centerline
pub const MIN_LATERAL_TOLERANCE_MM: f64 = 120.0;

/// Fraction of wall thickness an opening endpoint may sit off the centerline
const LATERAL_THICKNESS_FACTOR: f64 = 0.75;

pub const DEFAULT_MIN_ALIGNMENT: f64 = 0.84;
pub const PLAN_VIEW_ALIGNMENT_WEIGHT: f64 = 250.0;
pub const RECONSTRUCTION_ALIGNMENT_WEIGHT: f64 = 400.0;
pub const DEFAULT_TRIM_WEIGHT: f64 = 0.35;

/// An opening projected onto one wall
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Projection {
    /// Clipped, ordered span along the wall
    pub span_start_mm: f64,
    pub span_end_mm: f64,
    /// Unclipped positions of the opening start and end along the wall
    pub raw_start_mm: f64,
    pub raw_end_mm: f64,
    /// Distances of the opening start and end from the wall centerline
    pub lateral_start_mm: f64,
    pub lateral_end_mm: f64,
    /// `|cos|` of the angle between opening and wall, 1 is parallel
    pub alignment: f64,
    /// Plan-space angle of the wall
    pub wall_angle: f64,
}

impl Projection {
    pub fn span_length(&self) -> f64 {
        self.span_end_mm - self.span_start_mm
    }

    pub fn mean_lateral(&self) -> f64 {
        (self.lateral_start_mm + self.lateral_end_mm) / 2.0
    }

    pub fn max_lateral(&self) -> f64 {
        self.lateral_start_mm.max(self.lateral_end_mm)
    }
}

/// How far an opening may sit from a wall of the given thickness
pub fn lateral_tolerance(thickness_mm: f64) -> f64 {
    (thickness_mm * LATERAL_THICKNESS_FACTOR).max(MIN_LATERAL_TOLERANCE_MM)
}

/// Project `opening` onto `wall`
///
/// Returns `None` when either segment is degenerate, the wall has no positive
/// thickness, the opening is not aligned closely enough, it sits off the
/// wall, or clipping leaves less than [`MIN_SPAN_MM`].
pub fn project(opening: &Segment2D, wall: &WallSegment, min_alignment: f64) -> Option<Projection> {
    if !wall.has_valid_thickness() {
        return None;
    }
    let wall_dir = wall.centerline().unit_direction().ok()?;
    let wall_length = wall.length();

    let opening_length = opening.length();
    if opening_length < MIN_OPENING_LENGTH_MM {
        tracing::trace!(length_mm = opening_length, "Degenerate opening skipped");
        return None;
    }
    let opening_dir = opening.unit_direction().ok()?;

    let alignment = opening_dir.dot(&wall_dir).abs();
    if alignment < min_alignment {
        return None;
    }

    let raw_start = primitives::project_scalar(&opening.start, &wall.start, &wall_dir);
    let raw_end = primitives::project_scalar(&opening.end, &wall.start, &wall_dir);
    let lateral_start = primitives::lateral_distance(&opening.start, &wall.start, &wall_dir);
    let lateral_end = primitives::lateral_distance(&opening.end, &wall.start, &wall_dir);

    let clipped_start = raw_start.clamp(0.0, wall_length);
    let clipped_end = raw_end.clamp(0.0, wall_length);
    let projection = Projection {
        span_start_mm: clipped_start.min(clipped_end),
        span_end_mm: clipped_start.max(clipped_end),
        raw_start_mm: raw_start,
        raw_end_mm: raw_end,
        lateral_start_mm: lateral_start,
        lateral_end_mm: lateral_end,
        alignment,
        wall_angle: wall_dir.y.atan2(wall_dir.x),
    };

    if projection.max_lateral() > lateral_tolerance(wall.thickness_mm) {
        return None;
    }
    if projection.span_length() < MIN_SPAN_MM {
        return None;
    }
    Some(projection)
}

/// Caller context selecting the alignment tie-break weight
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FitProfile {
    /// Interactive 2D drawing and snapping
    Plan,
    /// 3D model reconstruction
    #[default]
    Reconstruction,
}

impl FromStr for FitProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plan" | "2d" => Ok(FitProfile::Plan),
            "reconstruction" | "3d" => Ok(FitProfile::Reconstruction),
            other => Err(format!("unknown fit profile '{}'", other)),
        }
    }
}

impl fmt::Display for FitProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitProfile::Plan => f.write_str("plan"),
            FitProfile::Reconstruction => f.write_str("reconstruction"),
        }
    }
}

/// Tunables of the wall selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectorConfig {
    /// Minimum `|cos|` between opening and wall
    pub min_alignment: f64,
    /// K in `(1 - alignment) * K`
    pub alignment_weight: f64,
    /// Weight of the length trimmed off by clipping
    pub trim_weight: f64,
}

impl ProjectorConfig {
    pub fn for_profile(profile: FitProfile) -> Self {
        let alignment_weight = match profile {
            FitProfile::Plan => PLAN_VIEW_ALIGNMENT_WEIGHT,
            FitProfile::Reconstruction => RECONSTRUCTION_ALIGNMENT_WEIGHT,
        };
        Self {
            min_alignment: DEFAULT_MIN_ALIGNMENT,
            alignment_weight,
            trim_weight: DEFAULT_TRIM_WEIGHT,
        }
    }
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self::for_profile(FitProfile::default())
    }
}

impl From<FitProfile> for ProjectorConfig {
    fn from(profile: FitProfile) -> Self {
        Self::for_profile(profile)
    }
}

/// The wall chosen for an opening
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WallFit {
    pub wall_index: usize,
    pub projection: Projection,
    pub score: f64,
}

impl WallFit {
    /// Anchored opening on `wall`, which must be the wall this fit refers to
    pub fn to_anchored(&self, wall: &WallSegment, band: HeightBand) -> AnchoredOpening {
        AnchoredOpening {
            wall_index: self.wall_index,
            wall_id: wall.id.clone(),
            span_start_mm: self.projection.span_start_mm,
            span_end_mm: self.projection.span_end_mm,
            bottom_mm: band.bottom_mm,
            top_mm: band.top_mm,
            score: self.score,
        }
    }
}

/// Selects host walls for openings
#[derive(Debug, Clone, Copy, Default)]
pub struct OpeningProjector {
    config: ProjectorConfig,
}

impl OpeningProjector {
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    /// Weights used while drawing in the 2D plan
    pub fn plan_view() -> Self {
        Self::new(ProjectorConfig::for_profile(FitProfile::Plan))
    }

    /// Weights used when rebuilding the 3D model
    pub fn reconstruction() -> Self {
        Self::new(ProjectorConfig::for_profile(FitProfile::Reconstruction))
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Fit score of a projection, lower is better
    pub fn fit_score(&self, opening_length: f64, projection: &Projection) -> f64 {
        let trim_penalty = (opening_length - projection.span_length()).max(0.0);
        let alignment_penalty = (1.0 - projection.alignment) * self.config.alignment_weight;
        projection.mean_lateral() + trim_penalty * self.config.trim_weight + alignment_penalty
    }

    /// Best-scoring wall for a raw opening segment
    ///
    /// Ties keep the first wall in `walls` order. `None` is the normal answer
    /// for an opening drawn away from every wall.
    pub fn best_fit(&self, opening: &Segment2D, walls: &[WallSegment]) -> Option<WallFit> {
        let opening_length = opening.length();
        let mut best: Option<WallFit> = None;

        for (wall_index, wall) in walls.iter().enumerate() {
            let Some(projection) = project(opening, wall, self.config.min_alignment) else {
                continue;
            };
            let score = self.fit_score(opening_length, &projection);
            if best.as_ref().map_or(true, |b| score < b.score) {
                best = Some(WallFit {
                    wall_index,
                    projection,
                    score,
                });
            }
        }

        if let Some(fit) = &best {
            tracing::debug!(
                wall_index = fit.wall_index,
                score = fit.score,
                span_start = fit.projection.span_start_mm,
                span_end = fit.projection.span_end_mm,
                "Opening fitted to wall"
            );
        }
        best
    }

    /// Anchor an opening with a resolved height band onto its best wall
    pub fn anchor(
        &self,
        opening: &Segment2D,
        walls: &[WallSegment],
        band: HeightBand,
    ) -> Option<AnchoredOpening> {
        let fit = self.best_fit(opening, walls)?;
        Some(fit.to_anchored(&walls[fit.wall_index], band))
    }
}
