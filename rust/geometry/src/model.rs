// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan elements consumed and produced by the anchoring engine

use crate::primitives::{self, Point2D, Segment2D, MIN_SEGMENT_LENGTH_MM};
use serde::{Deserialize, Serialize};

fn default_wall_thickness() -> f64 {
    200.0
}

/// A wall centerline with thickness
///
/// Lengths are in the unit of the owning snapshot until
/// [`crate::plan::PlanSnapshot::normalized`] converts them to millimeters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start: Point2D,
    pub end: Point2D,
    #[serde(default = "default_wall_thickness")]
    pub thickness_mm: f64,
}

impl WallSegment {
    pub fn new(start: Point2D, end: Point2D, thickness_mm: f64) -> Self {
        Self {
            id: None,
            start,
            end,
            thickness_mm,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn length(&self) -> f64 {
        primitives::length(&self.start, &self.end)
    }

    /// Walls shorter than 1mm are skipped by every algorithm
    pub fn is_degenerate(&self) -> bool {
        self.length() < MIN_SEGMENT_LENGTH_MM
    }

    /// Thickness is finite and positive
    pub fn has_valid_thickness(&self) -> bool {
        self.thickness_mm.is_finite() && self.thickness_mm > 0.0
    }

    /// Whether this wall can host openings and produce pieces
    pub fn is_usable(&self) -> bool {
        !self.is_degenerate() && self.has_valid_thickness()
    }

    pub fn centerline(&self) -> Segment2D {
        Segment2D::new(self.start, self.end)
    }
}

/// Which way a door leaf swings, seen from the opening's start point
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoorSwing {
    #[default]
    Left,
    Right,
    Double,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OpeningKind {
    Door {
        #[serde(default)]
        swing: DoorSwing,
    },
    Window,
}

/// A door or window as drawn in the plan, before anchoring
///
/// `height_mm` overrides the configured door height or nominal window height;
/// `sill_mm` overrides the configured window sill and is ignored for doors.
/// Like the endpoints, both are in snapshot units until normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpeningSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub kind: OpeningKind,
    pub start: Point2D,
    pub end: Point2D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sill_mm: Option<f64>,
}

impl OpeningSegment {
    pub fn door(start: Point2D, end: Point2D) -> Self {
        Self {
            id: None,
            kind: OpeningKind::Door {
                swing: DoorSwing::default(),
            },
            start,
            end,
            height_mm: None,
            sill_mm: None,
        }
    }

    pub fn window(start: Point2D, end: Point2D) -> Self {
        Self {
            id: None,
            kind: OpeningKind::Window,
            start,
            end,
            height_mm: None,
            sill_mm: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_height(mut self, height_mm: f64) -> Self {
        self.height_mm = Some(height_mm);
        self
    }

    pub fn with_sill(mut self, sill_mm: f64) -> Self {
        self.sill_mm = Some(sill_mm);
        self
    }

    pub fn with_swing(mut self, swing: DoorSwing) -> Self {
        if let OpeningKind::Door { .. } = self.kind {
            self.kind = OpeningKind::Door { swing };
        }
        self
    }

    pub fn segment(&self) -> Segment2D {
        Segment2D::new(self.start, self.end)
    }

    pub fn width(&self) -> f64 {
        primitives::length(&self.start, &self.end)
    }
}

/// Vertical extent of an opening, measured from the floor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HeightBand {
    pub bottom_mm: f64,
    pub top_mm: f64,
}

impl HeightBand {
    pub fn new(bottom_mm: f64, top_mm: f64) -> Self {
        Self { bottom_mm, top_mm }
    }

    pub fn height(&self) -> f64 {
        self.top_mm - self.bottom_mm
    }

    pub fn as_interval(&self) -> (f64, f64) {
        (self.bottom_mm, self.top_mm)
    }
}

/// An opening clipped onto the wall it belongs to
///
/// Spans are positions along the host wall, 0 at `wall.start`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnchoredOpening {
    pub wall_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_id: Option<String>,
    pub span_start_mm: f64,
    pub span_end_mm: f64,
    pub bottom_mm: f64,
    pub top_mm: f64,
    /// Fit score of the chosen wall (lower is better)
    pub score: f64,
}

impl AnchoredOpening {
    pub fn span_length(&self) -> f64 {
        self.span_end_mm - self.span_start_mm
    }

    pub fn band(&self) -> HeightBand {
        HeightBand::new(self.bottom_mm, self.top_mm)
    }
}

/// One solid, opening-free rectangle of a wall
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallPiece {
    pub wall_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_id: Option<String>,
    pub start_mm: f64,
    pub end_mm: f64,
    pub bottom_mm: f64,
    pub top_mm: f64,
    pub thickness_mm: f64,
    /// Plan-space angle of the host wall (radians)
    pub angle: f64,
}

impl WallPiece {
    pub fn length(&self) -> f64 {
        self.end_mm - self.start_mm
    }

    pub fn height(&self) -> f64 {
        self.top_mm - self.bottom_mm
    }

    pub fn mid_mm(&self) -> f64 {
        (self.start_mm + self.end_mm) / 2.0
    }
}
