// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-adjustable rendering settings and opening height bands
//!
//! Every setting is clamped to sane bounds before use. Height bands for
//! doors and windows are derived from the clamped settings and the opening's
//! own overrides.

use crate::error::{Error, Result};
use crate::model::{HeightBand, OpeningKind, OpeningSegment};
use serde::{Deserialize, Serialize};

pub const MIN_WALL_HEIGHT_MM: f64 = 1800.0;
pub const MAX_WALL_HEIGHT_MM: f64 = 6000.0;
pub const MIN_DOOR_HEIGHT_MM: f64 = 1000.0;
/// Doors stop at least this far below the wall top
pub const DOOR_HEAD_CLEARANCE_MM: f64 = 40.0;
/// Windows stop at least this far below the wall top
pub const WINDOW_HEAD_CLEARANCE_MM: f64 = 50.0;
pub const MIN_DOOR_THICKNESS_MM: f64 = 20.0;
pub const MAX_DOOR_THICKNESS_MM: f64 = 120.0;
pub const MIN_FRAME_DEPTH_MM: f64 = 20.0;
pub const MAX_FRAME_DEPTH_MM: f64 = 300.0;

/// Global settings consumed by the wall segmenter and opening placement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    /// Floor-to-top height of every wall
    pub wall_height_mm: f64,
    /// Door height; the default reaches the wall top and is clamped below it
    pub door_height_mm: f64,
    /// Thickness of a door leaf
    pub door_thickness_mm: f64,
    /// Window sill height above the floor
    pub window_sill_mm: f64,
    /// Nominal window height used when an opening carries none
    pub window_height_mm: f64,
    /// Depth of a window frame
    pub window_frame_depth_mm: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            wall_height_mm: 2700.0,
            door_height_mm: 2700.0,
            door_thickness_mm: 40.0,
            window_sill_mm: 900.0,
            window_height_mm: 1200.0,
            window_frame_depth_mm: 70.0,
        }
    }
}

/// Clamp `value` into `[min, max]`, using `fallback` for non-finite input
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback.clamp(min, max)
    }
}

impl RenderSettings {
    /// Copy of these settings with every value inside its valid range
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let wall_height_mm = clamp_or(
            self.wall_height_mm,
            MIN_WALL_HEIGHT_MM,
            MAX_WALL_HEIGHT_MM,
            defaults.wall_height_mm,
        );
        let window_sill_mm = clamp_or(
            self.window_sill_mm,
            0.0,
            wall_height_mm - WINDOW_HEAD_CLEARANCE_MM,
            defaults.window_sill_mm,
        );

        Self {
            wall_height_mm,
            door_height_mm: clamp_or(
                self.door_height_mm,
                MIN_DOOR_HEIGHT_MM,
                wall_height_mm - DOOR_HEAD_CLEARANCE_MM,
                defaults.door_height_mm,
            ),
            door_thickness_mm: clamp_or(
                self.door_thickness_mm,
                MIN_DOOR_THICKNESS_MM,
                MAX_DOOR_THICKNESS_MM,
                defaults.door_thickness_mm,
            ),
            window_sill_mm,
            window_height_mm: clamp_or(
                self.window_height_mm,
                0.0,
                wall_height_mm - WINDOW_HEAD_CLEARANCE_MM - window_sill_mm,
                defaults.window_height_mm,
            ),
            window_frame_depth_mm: clamp_or(
                self.window_frame_depth_mm,
                MIN_FRAME_DEPTH_MM,
                MAX_FRAME_DEPTH_MM,
                defaults.window_frame_depth_mm,
            ),
        }
    }

    /// Vertical band an opening cuts out of its wall
    ///
    /// Doors run from the floor to the (clamped) door height. Windows start at
    /// the sill and are cut off below the window head clearance. Fails with
    /// [`Error::InvalidHeightBand`] when nothing usable remains.
    pub fn height_band(&self, opening: &OpeningSegment) -> Result<HeightBand> {
        let settings = self.clamped();
        let wall_height = settings.wall_height_mm;

        let band = match opening.kind {
            OpeningKind::Door { .. } => {
                let height = clamp_or(
                    opening.height_mm.unwrap_or(settings.door_height_mm),
                    MIN_DOOR_HEIGHT_MM,
                    wall_height - DOOR_HEAD_CLEARANCE_MM,
                    settings.door_height_mm,
                );
                HeightBand::new(0.0, height)
            }
            OpeningKind::Window => {
                let head_limit = wall_height - WINDOW_HEAD_CLEARANCE_MM;
                let sill = clamp_or(
                    opening.sill_mm.unwrap_or(settings.window_sill_mm),
                    0.0,
                    head_limit,
                    settings.window_sill_mm,
                );
                let height = opening.height_mm.unwrap_or(settings.window_height_mm);
                let height = if height.is_finite() { height } else { 0.0 };
                HeightBand::new(sill, (sill + height).min(head_limit))
            }
        };

        if band.height() <= 0.0 {
            return Err(Error::InvalidHeightBand {
                bottom_mm: band.bottom_mm,
                top_mm: band.top_mm,
            });
        }
        Ok(band)
    }

    /// Depth of the frame/leaf placed in an opening of the given kind
    pub fn opening_depth(&self, kind: &OpeningKind) -> f64 {
        let settings = self.clamped();
        match kind {
            OpeningKind::Door { .. } => settings.door_thickness_mm,
            OpeningKind::Window => settings.window_frame_depth_mm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2D;
    use approx::assert_relative_eq;

    fn door() -> OpeningSegment {
        OpeningSegment::door(Point2D::new(0.0, 0.0), Point2D::new(900.0, 0.0))
    }

    fn window() -> OpeningSegment {
        OpeningSegment::window(Point2D::new(0.0, 0.0), Point2D::new(1200.0, 0.0))
    }

    #[test]
    fn test_wall_height_clamp() {
        let low = RenderSettings {
            wall_height_mm: 1000.0,
            ..Default::default()
        };
        assert_relative_eq!(low.clamped().wall_height_mm, MIN_WALL_HEIGHT_MM);

        let high = RenderSettings {
            wall_height_mm: 9000.0,
            ..Default::default()
        };
        assert_relative_eq!(high.clamped().wall_height_mm, MAX_WALL_HEIGHT_MM);

        let nan = RenderSettings {
            wall_height_mm: f64::NAN,
            ..Default::default()
        };
        assert_relative_eq!(nan.clamped().wall_height_mm, 2700.0);
    }

    #[test]
    fn test_default_door_reaches_below_wall_top() {
        let band = RenderSettings::default().height_band(&door()).unwrap();
        assert_relative_eq!(band.bottom_mm, 0.0);
        assert_relative_eq!(band.top_mm, 2660.0);
    }

    #[test]
    fn test_short_door_clamped_up() {
        let band = RenderSettings::default()
            .height_band(&door().with_height(600.0))
            .unwrap();
        assert_relative_eq!(band.top_mm, MIN_DOOR_HEIGHT_MM);
    }

    #[test]
    fn test_window_band_uses_sill() {
        let band = RenderSettings::default().height_band(&window()).unwrap();
        assert_relative_eq!(band.bottom_mm, 900.0);
        assert_relative_eq!(band.top_mm, 2100.0);
    }

    #[test]
    fn test_tall_window_cut_below_head() {
        let band = RenderSettings::default()
            .height_band(&window().with_sill(1500.0).with_height(2000.0))
            .unwrap();
        assert_relative_eq!(band.top_mm, 2650.0);
    }

    #[test]
    fn test_window_without_usable_height() {
        let settings = RenderSettings::default();

        let at_head = window().with_sill(3000.0);
        assert!(matches!(
            settings.height_band(&at_head),
            Err(Error::InvalidHeightBand { .. })
        ));

        let zero = window().with_height(0.0);
        assert!(matches!(
            settings.height_band(&zero),
            Err(Error::InvalidHeightBand { .. })
        ));
    }

    #[test]
    fn test_opening_depth() {
        let settings = RenderSettings {
            door_thickness_mm: 500.0,
            ..Default::default()
        };
        assert_relative_eq!(settings.opening_depth(&door().kind), MAX_DOOR_THICKNESS_MM);
        assert_relative_eq!(settings.opening_depth(&OpeningKind::Window), 70.0);
    }
}
