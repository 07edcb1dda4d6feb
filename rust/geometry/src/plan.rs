// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan snapshot pipeline
//!
//! An editor keeps plain wall and opening lists and hands an immutable
//! [`PlanSnapshot`] to [`PlanSnapshot::build`] after every edit. The build
//! anchors every opening, segments every wall and maps the results into scene
//! space. Nothing is retained between builds.

use crate::coords::{CoordinateMapper, PlacedPiece, PlanBounds, Pose, SCENE_UNITS_PER_MM};
use crate::error::Error;
use crate::model::{
    AnchoredOpening, DoorSwing, HeightBand, OpeningKind, OpeningSegment, WallSegment,
};
use crate::primitives::{self, Point2D};
use crate::projector::{OpeningProjector, WallFit};
use crate::segmenter;
use crate::settings::RenderSettings;
use crate::units::LengthUnit;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Walls and openings of one plan at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanSnapshot {
    /// Unit of every length in this snapshot
    #[serde(default)]
    pub unit: LengthUnit,
    #[serde(default)]
    pub walls: Vec<WallSegment>,
    #[serde(default)]
    pub openings: Vec<OpeningSegment>,
}

/// Offset between the three plan-view lines of a window
pub const GLASS_LINE_OFFSET_MM: f64 = 50.0;

/// Data-quality signal raised while building a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum PlanIssue {
    /// The wall has no positive thickness; it hosts nothing and has no pieces
    InvalidWallThickness {
        wall_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        thickness_mm: f64,
    },
    /// The opening touches no wall and is placed at its raw endpoints
    NoMatchingWall {
        opening_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    /// The opening has no usable height and cuts nothing
    InvalidHeightBand {
        opening_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        bottom_mm: f64,
        top_mm: f64,
    },
}

impl PlanIssue {
    /// The error this issue stands for
    pub fn error(&self) -> Error {
        match self {
            PlanIssue::InvalidWallThickness { thickness_mm, .. } => Error::InvalidThickness {
                thickness_mm: *thickness_mm,
            },
            PlanIssue::NoMatchingWall { .. } => Error::NoMatchingWall,
            PlanIssue::InvalidHeightBand {
                bottom_mm, top_mm, ..
            } => Error::InvalidHeightBand {
                bottom_mm: *bottom_mm,
                top_mm: *top_mm,
            },
        }
    }
}

/// Plan-view door swing indicator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SwingArc {
    pub center: Point2D,
    pub radius: f64,
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
}

impl SwingArc {
    /// Arc of a door leaf hinged on the segment `start`-`end`
    pub fn new(swing: DoorSwing, start: &Point2D, end: &Point2D) -> Self {
        let base = CoordinateMapper::rotation_of(start, end).to_degrees();
        let width = start.distance_to(end);

        match swing {
            DoorSwing::Left => Self {
                center: *start,
                radius: width,
                start_angle_deg: base,
                end_angle_deg: base + 90.0,
            },
            DoorSwing::Right => Self {
                center: *end,
                radius: width,
                start_angle_deg: base + 90.0,
                end_angle_deg: base + 180.0,
            },
            DoorSwing::Double => Self {
                center: start.midpoint(end),
                radius: width / 2.0,
                start_angle_deg: base,
                end_angle_deg: base + 180.0,
            },
        }
    }
}

/// Window symbol for the plan view: three parallel lines along `start`-`end`
///
/// The middle line is the segment itself, the outer ones are offset by
/// [`GLASS_LINE_OFFSET_MM`] to either side. `None` for a degenerate segment.
pub fn glass_lines(start: &Point2D, end: &Point2D) -> Option<[(Point2D, Point2D); 3]> {
    let dir = primitives::unit_direction(start, end).ok()?;
    let normal = nalgebra::Vector2::new(-dir.y, dir.x) * GLASS_LINE_OFFSET_MM;

    let line = |side: f64| {
        let shift = normal * side;
        (
            Point2D::from_nalgebra(&(start.to_nalgebra() + shift)),
            Point2D::from_nalgebra(&(end.to_nalgebra() + shift)),
        )
    };
    Some([line(-1.0), line(0.0), line(1.0)])
}

/// Where a door or window frame goes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpeningPose {
    pub opening_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: OpeningKind,
    /// Host wall, `None` when the opening fell back to its raw endpoints
    pub wall_index: Option<usize>,
    /// Fitted endpoints in plan millimeters, in the opening's drawn direction
    pub start: Point2D,
    pub end: Point2D,
    pub pose: Pose,
    /// `None` when the opening has no usable height
    pub band: Option<HeightBand>,
    /// Frame or leaf depth
    pub depth_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swing_arc: Option<SwingArc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glass_lines: Option<[(Point2D, Point2D); 3]>,
}

impl OpeningPose {
    pub fn is_anchored(&self) -> bool {
        self.wall_index.is_some()
    }
}

/// Renderer-ready geometry of a whole plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanGeometry {
    pub bounds: PlanBounds,
    pub wall_height_mm: f64,
    pub pieces: Vec<PlacedPiece>,
    pub openings: Vec<OpeningPose>,
    pub issues: Vec<PlanIssue>,
}

impl PlanGeometry {
    pub fn pieces_for_wall(&self, wall_index: usize) -> impl Iterator<Item = &PlacedPiece> {
        self.pieces
            .iter()
            .filter(move |p| p.piece.wall_index == wall_index)
    }

    pub fn anchored_count(&self) -> usize {
        self.openings.iter().filter(|o| o.is_anchored()).count()
    }
}

impl PlanSnapshot {
    pub fn new(walls: Vec<WallSegment>, openings: Vec<OpeningSegment>) -> Self {
        Self {
            unit: LengthUnit::Mm,
            walls,
            openings,
        }
    }

    /// Copy of this snapshot with every length in millimeters
    pub fn normalized(&self) -> Self {
        if self.unit == LengthUnit::Mm {
            return self.clone();
        }

        let unit = self.unit;
        let point = |p: &Point2D| Point2D::new(unit.to_mm(p.x), unit.to_mm(p.y));

        Self {
            unit: LengthUnit::Mm,
            walls: self
                .walls
                .iter()
                .map(|w| WallSegment {
                    id: w.id.clone(),
                    start: point(&w.start),
                    end: point(&w.end),
                    thickness_mm: unit.to_mm(w.thickness_mm),
                })
                .collect(),
            openings: self
                .openings
                .iter()
                .map(|o| OpeningSegment {
                    id: o.id.clone(),
                    kind: o.kind,
                    start: point(&o.start),
                    end: point(&o.end),
                    height_mm: o.height_mm.map(|h| unit.to_mm(h)),
                    sill_mm: o.sill_mm.map(|s| unit.to_mm(s)),
                })
                .collect(),
        }
    }

    /// Bounds of every wall and opening endpoint
    pub fn bounds(&self) -> PlanBounds {
        PlanBounds::from_points(
            self.walls
                .iter()
                .flat_map(|w| [&w.start, &w.end])
                .chain(self.openings.iter().flat_map(|o| [&o.start, &o.end])),
        )
    }

    /// Build with scene units in meters
    pub fn build(&self, settings: &RenderSettings, projector: &OpeningProjector) -> PlanGeometry {
        self.build_with_scale(settings, projector, SCENE_UNITS_PER_MM)
    }

    pub fn build_with_scale(
        &self,
        settings: &RenderSettings,
        projector: &OpeningProjector,
        scene_scale: f64,
    ) -> PlanGeometry {
        let plan = self.normalized();
        let settings = settings.clamped();
        let bounds = plan.bounds();
        let mapper = CoordinateMapper::with_scale(&bounds, scene_scale);

        let mut issues = Vec::new();
        for (wall_index, wall) in plan.walls.iter().enumerate() {
            if !wall.has_valid_thickness() {
                tracing::warn!(
                    wall_index,
                    id = wall.id.as_deref().unwrap_or(""),
                    thickness_mm = wall.thickness_mm,
                    "Wall has no positive thickness, skipped"
                );
                issues.push(PlanIssue::InvalidWallThickness {
                    wall_index,
                    id: wall.id.clone(),
                    thickness_mm: wall.thickness_mm,
                });
            }
        }

        let mut poses = Vec::with_capacity(plan.openings.len());
        let mut by_wall: FxHashMap<usize, Vec<AnchoredOpening>> = FxHashMap::default();

        for (opening_index, opening) in plan.openings.iter().enumerate() {
            let band = match settings.height_band(opening) {
                Ok(band) => Some(band),
                Err(Error::InvalidHeightBand { bottom_mm, top_mm }) => {
                    tracing::warn!(
                        opening_index,
                        id = opening.id.as_deref().unwrap_or(""),
                        bottom_mm,
                        top_mm,
                        "Opening has no usable height, excluded from wall cuts"
                    );
                    issues.push(PlanIssue::InvalidHeightBand {
                        opening_index,
                        id: opening.id.clone(),
                        bottom_mm,
                        top_mm,
                    });
                    None
                }
                Err(_) => None,
            };

            let fit = projector.best_fit(&opening.segment(), &plan.walls);
            let (start, end) = match &fit {
                Some(fit) => fitted_endpoints(fit, &plan.walls[fit.wall_index]),
                None => {
                    tracing::warn!(
                        opening_index,
                        id = opening.id.as_deref().unwrap_or(""),
                        "Opening matches no wall, using raw endpoints"
                    );
                    issues.push(PlanIssue::NoMatchingWall {
                        opening_index,
                        id: opening.id.clone(),
                    });
                    (opening.start, opening.end)
                }
            };

            if let (Some(fit), Some(band)) = (&fit, band) {
                by_wall
                    .entry(fit.wall_index)
                    .or_default()
                    .push(fit.to_anchored(&plan.walls[fit.wall_index], band));
            }

            poses.push(OpeningPose {
                opening_index,
                id: opening.id.clone(),
                kind: opening.kind,
                wall_index: fit.map(|f| f.wall_index),
                start,
                end,
                pose: mapper.pose_of(&start, &end),
                band,
                depth_mm: settings.opening_depth(&opening.kind),
                swing_arc: match opening.kind {
                    OpeningKind::Door { swing } => Some(SwingArc::new(swing, &start, &end)),
                    OpeningKind::Window => None,
                },
                glass_lines: match opening.kind {
                    OpeningKind::Window => glass_lines(&start, &end),
                    OpeningKind::Door { .. } => None,
                },
            });
        }

        let mut pieces = Vec::new();
        for (wall_index, wall) in plan.walls.iter().enumerate() {
            let anchored = by_wall.get(&wall_index).map(Vec::as_slice).unwrap_or(&[]);
            pieces.extend(
                segmenter::segment(wall_index, wall, anchored, settings.wall_height_mm)
                    .iter()
                    .map(|piece| mapper.place_piece(wall, piece)),
            );
        }

        tracing::info!(
            walls = plan.walls.len(),
            openings = plan.openings.len(),
            anchored = poses.iter().filter(|p| p.is_anchored()).count(),
            pieces = pieces.len(),
            issues = issues.len(),
            "Built plan geometry"
        );

        PlanGeometry {
            bounds,
            wall_height_mm: settings.wall_height_mm,
            pieces,
            openings: poses,
            issues,
        }
    }
}

/// Clipped endpoints of a fitted opening, kept in the direction it was drawn
fn fitted_endpoints(fit: &WallFit, wall: &WallSegment) -> (Point2D, Point2D) {
    let p = &fit.projection;
    let (from, to) = if p.raw_start_mm <= p.raw_end_mm {
        (p.span_start_mm, p.span_end_mm)
    } else {
        (p.span_end_mm, p.span_start_mm)
    };
    (
        CoordinateMapper::advance(&wall.start, &wall.end, from),
        CoordinateMapper::advance(&wall.start, &wall.end, to),
    )
}
