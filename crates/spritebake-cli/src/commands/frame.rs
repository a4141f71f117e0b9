//! Frame command implementation
//!
//! Prints where the export camera goes for a given bound.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use spritebake_core::{
    apply_flip, place_camera, Aabb, AnglePreset, CameraFrame, ExportConfig, Padding,
};
use std::path::Path;
use std::process::ExitCode;

use super::args::{parse_angle, parse_orientation, parse_vec3};

/// Options for the frame command.
#[derive(Debug, Clone, Default)]
pub struct FrameOptions {
    /// Minimum corner, `x,y,z`.
    pub min: String,
    /// Maximum corner, `x,y,z`.
    pub max: String,
    /// Base configuration file.
    pub config: Option<String>,
    /// Angle preset name, overriding the configuration.
    pub angle: Option<String>,
    /// Orbit orientation for the custom preset.
    pub orientation: Option<String>,
    /// Orbit degrees for the custom preset.
    pub degrees: Option<i32>,
    /// Padding percent, overriding the configuration.
    pub padding: Option<f64>,
    /// Disable padding.
    pub no_padding: bool,
    /// Disable the camera flip.
    pub no_flip: bool,
    /// Print JSON instead of text.
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct FrameOutput {
    angle: AnglePreset,
    flipped: bool,
    padding: Padding,
    size: f64,
    distance: f64,
    camera: CameraFrame,
}

/// Resolves the effective configuration: the file (if any), then flags.
pub fn resolve_config(opts: &FrameOptions) -> Result<ExportConfig> {
    let mut config = match &opts.config {
        Some(path) => ExportConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => ExportConfig::default(),
    };
    config.angle = resolve_angle(opts, config.angle)?;
    if let Some(percent) = opts.padding {
        config.padding = Padding::percent(percent);
    }
    if opts.no_padding {
        config.padding.enabled = false;
    }
    if opts.no_flip {
        config.flip = false;
    }
    config.validate()?;
    Ok(config)
}

/// Applies `--angle`, `--orientation` and `--degrees` over `current`.
///
/// Orbit flags adjust a custom preset, either the one named by `--angle` or
/// the one from the configuration file. They are rejected for any other preset.
fn resolve_angle(opts: &FrameOptions, current: AnglePreset) -> Result<AnglePreset> {
    let orbit_flags = opts.orientation.is_some() || opts.degrees.is_some();
    match opts.angle.as_deref() {
        Some("custom") => parse_angle(
            "custom",
            opts.orientation.as_deref(),
            opts.degrees.unwrap_or(0),
        ),
        Some(name) if orbit_flags => {
            bail!("--orientation and --degrees need --angle custom, not {}", name)
        }
        Some(name) => parse_angle(name, None, 0),
        None => match current {
            AnglePreset::Custom {
                orientation,
                degrees,
            } if orbit_flags => {
                let orientation = match opts.orientation.as_deref() {
                    Some(name) => parse_orientation(name)?,
                    None => orientation,
                };
                Ok(AnglePreset::custom(
                    orientation,
                    opts.degrees.unwrap_or(degrees),
                )?)
            }
            _ if orbit_flags => bail!(
                "--orientation and --degrees need a custom angle preset, not {}",
                current.as_str()
            ),
            _ => Ok(current),
        },
    }
}

/// Run the frame command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(opts: &FrameOptions) -> Result<ExitCode> {
    let config = resolve_config(opts)?;
    let bound = Aabb::new(parse_vec3(&opts.min)?, parse_vec3(&opts.max)?);

    let mut camera = place_camera(&bound, config.angle, config.padding);
    if config.flip {
        camera = apply_flip(&camera, &bound, config.angle);
    }
    let size = config.padding.apply(bound.size());

    if opts.json {
        let output = FrameOutput {
            angle: config.angle,
            flipped: config.flip,
            padding: config.padding,
            size,
            distance: camera.distance(),
            camera,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} {}",
        "Framing:".cyan().bold(),
        config.angle.as_str(),
        if config.flip {
            "(flipped)".dimmed().to_string()
        } else {
            String::new()
        }
    );
    println!("  {:<12} {}", "center", fmt_vec(bound.center()));
    println!("  {:<12} {:.4}", "size", size);
    println!("  {:<12} {}", "position", fmt_vec(camera.position));
    println!("  {:<12} {:.4}", "distance", camera.distance());
    println!("  {:<12} {:.4}", "ortho scale", camera.ortho_half_height);

    Ok(ExitCode::SUCCESS)
}

fn fmt_vec(v: glam::DVec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}
