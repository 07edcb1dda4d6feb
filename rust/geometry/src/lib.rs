// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SKAD Geometry
//!
//! Opening anchoring and wall segmentation for floor plan models. Given the
//! walls and openings of a plan, this crate:
//! 1. Picks the host wall of every door and window and clips it onto the
//!    wall's centerline
//! 2. Splits every wall into solid pieces with the openings cut out at their
//!    height bands
//! 3. Maps pieces and opening frames into a centered, Y-up scene
//!
//! Every operation is a pure function of its inputs. Callers rebuild from a
//! fresh [`PlanSnapshot`] after each edit.
//!
//! # Usage
//!
//! ```rust,ignore
//! use skad_geometry::{OpeningProjector, OpeningSegment, PlanSnapshot, Point2D, RenderSettings, WallSegment};
//!
//! let walls = vec![WallSegment::new(Point2D::new(0.0, 0.0), Point2D::new(4000.0, 0.0), 200.0)];
//! let doors = vec![OpeningSegment::door(Point2D::new(1000.0, 0.0), Point2D::new(1900.0, 0.0))];
//!
//! let geometry = PlanSnapshot::new(walls, doors)
//!     .build(&RenderSettings::default(), &OpeningProjector::reconstruction());
//! ```

pub mod coords;
pub mod error;
pub mod interval;
pub mod model;
pub mod plan;
pub mod primitives;
pub mod projector;
pub mod segmenter;
pub mod settings;
pub mod units;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use coords::{CoordinateMapper, PlacedPiece, PlanBounds, Pose, ScenePoint};
pub use error::{Error, Result};
pub use interval::{dedupe_sorted, subtract, Interval, IntervalSet};
pub use model::{
    AnchoredOpening, DoorSwing, HeightBand, OpeningKind, OpeningSegment, WallPiece, WallSegment,
};
pub use plan::{glass_lines, OpeningPose, PlanGeometry, PlanIssue, PlanSnapshot, SwingArc};
pub use primitives::{Point2D, Segment2D};
pub use projector::{project, FitProfile, OpeningProjector, Projection, ProjectorConfig, WallFit};
pub use segmenter::segment;
pub use settings::RenderSettings;
pub use units::LengthUnit;
