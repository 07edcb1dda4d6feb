// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-space vector and segment math
//!
//! Everything here works in plan millimeters. Segments shorter than
//! [`MIN_SEGMENT_LENGTH_MM`] have no direction; callers treat them as
//! non-matches.

use crate::error::{Error, Result};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Segments shorter than this are degenerate
pub const MIN_SEGMENT_LENGTH_MM: f64 = 1.0;

/// A 2D point in plan millimeters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (other.to_nalgebra() - self.to_nalgebra()).norm()
    }

    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A raw plan segment, e.g. an opening as drawn before anchoring
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment2D {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment2D {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        length(&self.start, &self.end)
    }

    pub fn unit_direction(&self) -> Result<Vector2<f64>> {
        unit_direction(&self.start, &self.end)
    }

    pub fn midpoint(&self) -> Point2D {
        self.start.midpoint(&self.end)
    }
}

/// Euclidean length of the segment `start`-`end`
pub fn length(start: &Point2D, end: &Point2D) -> f64 {
    start.distance_to(end)
}

/// Unit direction from `start` to `end`
///
/// Fails with [`Error::DegenerateSegment`] when the segment is shorter than
/// [`MIN_SEGMENT_LENGTH_MM`].
pub fn unit_direction(start: &Point2D, end: &Point2D) -> Result<Vector2<f64>> {
    let delta = end.to_nalgebra() - start.to_nalgebra();
    let length_mm = delta.norm();
    if length_mm < MIN_SEGMENT_LENGTH_MM {
        return Err(Error::DegenerateSegment { length_mm });
    }
    Ok(delta / length_mm)
}

/// Signed distance of `point` along the axis through `start` with direction `dir`
pub fn project_scalar(point: &Point2D, start: &Point2D, dir: &Vector2<f64>) -> f64 {
    (point.to_nalgebra() - start.to_nalgebra()).dot(dir)
}

/// Distance of `point` from the infinite line through `start` with direction `dir`
pub fn lateral_distance(point: &Point2D, start: &Point2D, dir: &Vector2<f64>) -> f64 {
    (point.to_nalgebra() - start.to_nalgebra()).perp(dir).abs()
}
