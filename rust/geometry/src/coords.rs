// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-space to scene-space mapping
//!
//! The scene is Y-up. Plan X maps to scene X, plan Y maps to scene -Z, and
//! elevation maps to scene Y. Positions are centered on the plan bounds so the
//! model sits around the origin. With this convention a yaw about +Y equals
//! the plan-space angle of a segment, so [`CoordinateMapper::rotation_of`] is
//! used unchanged for both the 2D and 3D views.
//!
//! All scene positions and rotations go through this module.

use crate::model::{WallPiece, WallSegment};
use crate::primitives::{self, Point2D};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Scene units per plan millimeter (scene is in meters)
pub const SCENE_UNITS_PER_MM: f64 = 0.001;

/// Sign applied when plan Y becomes scene Z
const DEPTH_SIGN: f64 = -1.0;

/// A point in scene space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ScenePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_nalgebra(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }
}

/// Axis-aligned bounds of a plan in millimeters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlanBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PlanBounds {
    /// Bounds of the given points; an empty plan gets zero bounds at the origin
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2D>) -> Self {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        if min_x > max_x || min_y > max_y {
            return Self {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            };
        }

        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Placement of a segment-shaped element in the scene
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    pub width_mm: f64,
    /// Yaw about the scene up axis (radians)
    pub angle: f64,
    pub mid_scene: ScenePoint,
}

/// A wall piece positioned in the scene
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedPiece {
    pub piece: WallPiece,
    /// Center of the piece box
    pub center: ScenePoint,
    /// Box size along the wall, vertically, and across the wall (scene units)
    pub size: [f64; 3],
    pub rotation_y: f64,
}

/// Converts plan millimeters into scene units around the plan center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    center: Point2D,
    scale: f64,
}

impl CoordinateMapper {
    /// Mapper centered on `bounds`, producing meters
    pub fn new(bounds: &PlanBounds) -> Self {
        Self::with_scale(bounds, SCENE_UNITS_PER_MM)
    }

    /// Mapper with a custom scene scale; a non-positive or non-finite scale
    /// falls back to [`SCENE_UNITS_PER_MM`]
    pub fn with_scale(bounds: &PlanBounds, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            tracing::warn!(scale, "Invalid scene scale, using meters");
            SCENE_UNITS_PER_MM
        };
        Self {
            center: bounds.center(),
            scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_meters(mm: f64) -> f64 {
        mm / 1000.0
    }

    pub fn scene_length(&self, mm: f64) -> f64 {
        mm * self.scale
    }

    pub fn to_scene(&self, point: &Point2D) -> ScenePoint {
        self.to_scene_at(point, 0.0)
    }

    pub fn to_scene_at(&self, point: &Point2D, elevation_mm: f64) -> ScenePoint {
        ScenePoint::new(
            (point.x - self.center.x) * self.scale,
            elevation_mm * self.scale,
            (point.y - self.center.y) * self.scale * DEPTH_SIGN,
        )
    }

    /// Inverse of [`CoordinateMapper::to_scene`]; elevation is dropped
    pub fn from_scene(&self, point: &ScenePoint) -> Point2D {
        Point2D::new(
            point.x / self.scale + self.center.x,
            point.z / (self.scale * DEPTH_SIGN) + self.center.y,
        )
    }

    /// Angle of `start`-`end`; zero for a degenerate segment
    pub fn rotation_of(start: &Point2D, end: &Point2D) -> f64 {
        match primitives::unit_direction(start, end) {
            Ok(dir) => dir.y.atan2(dir.x),
            Err(_) => 0.0,
        }
    }

    /// Walk `distance_mm` from `start` toward `end`
    ///
    /// Returns `start` unchanged when the segment is degenerate.
    pub fn advance(start: &Point2D, end: &Point2D, distance_mm: f64) -> Point2D {
        match primitives::unit_direction(start, end) {
            Ok(dir) => Point2D::from_nalgebra(&(start.to_nalgebra() + dir * distance_mm)),
            Err(_) => *start,
        }
    }

    pub fn pose_of(&self, start: &Point2D, end: &Point2D) -> Pose {
        Pose {
            width_mm: primitives::length(start, end),
            angle: Self::rotation_of(start, end),
            mid_scene: self.to_scene(&start.midpoint(end)),
        }
    }

    /// Box placement of a piece cut from `wall`
    pub fn place_piece(&self, wall: &WallSegment, piece: &WallPiece) -> PlacedPiece {
        let mid = Self::advance(&wall.start, &wall.end, piece.mid_mm());
        let elevation = (piece.bottom_mm + piece.top_mm) / 2.0;

        PlacedPiece {
            piece: piece.clone(),
            center: self.to_scene_at(&mid, elevation),
            size: [
                self.scene_length(piece.length()),
                self.scene_length(piece.height()),
                self.scene_length(piece.thickness_mm),
            ],
            rotation_y: piece.angle,
        }
    }
}
