// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Cut the walls of a floor plan snapshot into solid pieces
//!
//! Reads a plan snapshot (walls + doors + windows) as JSON, anchors every
//! opening to its host wall and writes the placed wall pieces, opening poses
//! and data quality issues as JSON.
//!
//! Usage:
//!   skad-pieces <plan.json | -> [options]

mod config;

use anyhow::{bail, Context, Result};
use config::Config;
use skad_geometry::{FitProfile, OpeningProjector, PlanGeometry, PlanSnapshot};
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
struct Options {
    input: String,
    output: Option<String>,
    pretty: bool,
    config: Config,
}

fn print_usage() {
    eprintln!("Usage: skad-pieces <plan.json | -> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --output <path>        Write geometry JSON to a file (default: stdout)");
    eprintln!("  --profile <name>       Wall matching preset: plan | reconstruction");
    eprintln!("  --wall-height <mm>     Wall height, clamped to 1800..6000");
    eprintln!("  --door-height <mm>     Door height, clamped below the wall top");
    eprintln!("  --window-sill <mm>     Default window sill height");
    eprintln!("  --window-height <mm>   Default window height");
    eprintln!("  --scene-scale <f>      Scene units per millimeter (default: 0.001)");
    eprintln!("  --pretty               Pretty-print the output");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SKAD_WALL_HEIGHT_MM, SKAD_DOOR_HEIGHT_MM, SKAD_DOOR_THICKNESS_MM,");
    eprintln!("  SKAD_WINDOW_SILL_MM, SKAD_WINDOW_HEIGHT_MM, SKAD_WINDOW_FRAME_DEPTH_MM,");
    eprintln!("  SKAD_FIT_PROFILE, SKAD_SCENE_SCALE, SKAD_LOG_JSON, RUST_LOG");
}

fn parse_number(flag: &str, value: Option<&String>) -> Result<f64> {
    let value = value.with_context(|| format!("{} expects a value", flag))?;
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {} value '{}'", flag, value))
}

/// Apply command line flags on top of `config`
fn parse_args(args: &[String], config: Config) -> Result<Options> {
    let Some(input) = args.first() else {
        bail!("Missing plan path");
    };

    let mut options = Options {
        input: input.clone(),
        output: None,
        pretty: false,
        config,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match flag {
            "--output" => {
                options.output = Some(value.context("--output expects a path")?.clone());
                i += 1;
            }
            "--profile" => {
                let name = value.context("--profile expects a name")?;
                options.config.profile = name
                    .parse::<FitProfile>()
                    .map_err(anyhow::Error::msg)?;
                i += 1;
            }
            "--wall-height" => {
                options.config.settings.wall_height_mm = parse_number(flag, value)?;
                i += 1;
            }
            "--door-height" => {
                options.config.settings.door_height_mm = parse_number(flag, value)?;
                i += 1;
            }
            "--window-sill" => {
                options.config.settings.window_sill_mm = parse_number(flag, value)?;
                i += 1;
            }
            "--window-height" => {
                options.config.settings.window_height_mm = parse_number(flag, value)?;
                i += 1;
            }
            "--scene-scale" => {
                let scale = parse_number(flag, value)?;
                if !(scale.is_finite() && scale > 0.0) {
                    bail!("--scene-scale must be positive, got {}", scale);
                }
                options.config.scene_scale = scale;
                i += 1;
            }
            "--pretty" => options.pretty = true,
            other => bail!("Unknown option: {}", other),
        }
        i += 1;
    }

    Ok(options)
}

fn read_plan(input: &str) -> Result<PlanSnapshot> {
    let text = if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read plan from stdin")?;
        text
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read plan {}", input))?
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid plan JSON in {}", input))
}

fn write_geometry(geometry: &PlanGeometry, options: &Options) -> Result<()> {
    let json = if options.pretty {
        serde_json::to_string_pretty(geometry)?
    } else {
        serde_json::to_string(geometry)?
    };

    match &options.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(options: &Options) -> Result<()> {
    let plan = read_plan(&options.input)?;
    let projector = OpeningProjector::new(options.config.profile.into());

    tracing::debug!(
        profile = %options.config.profile,
        unit = %plan.unit,
        walls = plan.walls.len(),
        openings = plan.openings.len(),
        "Loaded plan"
    );

    let geometry = plan.build_with_scale(
        &options.config.settings,
        &projector,
        options.config.scene_scale,
    );

    write_geometry(&geometry, options)?;

    for issue in &geometry.issues {
        tracing::warn!(problem = %issue.error(), "Plan issue");
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return;
    }

    let options = match parse_args(&args, Config::from_env()) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            print_usage();
            std::process::exit(1);
        }
    };

    init_logging(options.config.json_logs);

    if let Err(err) = run(&options) {
        tracing::error!("{:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skad_geometry::RenderSettings;

    fn base_config() -> Config {
        Config {
            settings: RenderSettings::default(),
            profile: FitProfile::Reconstruction,
            scene_scale: 0.001,
            json_logs: false,
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flags_override_config() {
        let options = parse_args(
            &args(&[
                "plan.json",
                "--profile",
                "2d",
                "--wall-height",
                "3000",
                "--output",
                "out.json",
                "--pretty",
            ]),
            base_config(),
        )
        .unwrap();

        assert_eq!(options.input, "plan.json");
        assert_eq!(options.output.as_deref(), Some("out.json"));
        assert!(options.pretty);
        assert_eq!(options.config.profile, FitProfile::Plan);
        assert_eq!(options.config.settings.wall_height_mm, 3000.0);
        assert_eq!(options.config.settings.door_height_mm, 2700.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_args(&[], base_config()).is_err());
        assert!(parse_args(&args(&["-", "--wall-height"]), base_config()).is_err());
        assert!(parse_args(&args(&["-", "--wall-height", "tall"]), base_config()).is_err());
        assert!(parse_args(&args(&["-", "--scene-scale", "0"]), base_config()).is_err());
        assert!(parse_args(&args(&["-", "--profile", "iso"]), base_config()).is_err());
        assert!(parse_args(&args(&["-", "--bogus"]), base_config()).is_err());
    }

    #[test]
    fn test_plan_json_round_trip_through_pipeline() {
        let json = r#"{
            "unit": "cm",
            "walls": [{ "start": { "x": 0, "y": 0 }, "end": { "x": 400, "y": 0 }, "thickness_mm": 20 }],
            "openings": [{ "type": "door", "start": { "x": 100, "y": 0 }, "end": { "x": 190, "y": 0 } }]
        }"#;
        let plan: PlanSnapshot = serde_json::from_str(json).unwrap();
        let geometry = plan.build(
            &RenderSettings::default(),
            &OpeningProjector::new(FitProfile::Reconstruction.into()),
        );

        assert_eq!(geometry.pieces.len(), 2);
        assert!(geometry.issues.is_empty());
        let text = serde_json::to_string(&geometry).unwrap();
        assert!(text.contains("\"pieces\""));
    }
}
