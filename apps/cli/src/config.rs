// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use skad_geometry::coords::SCENE_UNITS_PER_MM;
use skad_geometry::{FitProfile, RenderSettings};

/// Generator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Heights and thicknesses used for cutting and placing openings.
    pub settings: RenderSettings,
    /// Which caller preset drives wall matching.
    pub profile: FitProfile,
    /// Scene units per plan millimeter.
    pub scene_scale: f64,
    /// Emit JSON log lines instead of human readable ones.
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup; unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = RenderSettings::default();
        let number = |key: &str, default: f64| {
            lookup(key)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            settings: RenderSettings {
                wall_height_mm: number("SKAD_WALL_HEIGHT_MM", defaults.wall_height_mm),
                door_height_mm: number("SKAD_DOOR_HEIGHT_MM", defaults.door_height_mm),
                door_thickness_mm: number("SKAD_DOOR_THICKNESS_MM", defaults.door_thickness_mm),
                window_sill_mm: number("SKAD_WINDOW_SILL_MM", defaults.window_sill_mm),
                window_height_mm: number("SKAD_WINDOW_HEIGHT_MM", defaults.window_height_mm),
                window_frame_depth_mm: number(
                    "SKAD_WINDOW_FRAME_DEPTH_MM",
                    defaults.window_frame_depth_mm,
                ),
            },
            profile: lookup("SKAD_FIT_PROFILE")
                .and_then(|value| value.parse().ok())
                .unwrap_or_default(),
            scene_scale: lookup("SKAD_SCENE_SCALE")
                .and_then(|value| value.trim().parse().ok())
                .filter(|scale: &f64| scale.is_finite() && *scale > 0.0)
                .unwrap_or(SCENE_UNITS_PER_MM),
            json_logs: lookup("SKAD_LOG_JSON")
                .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
