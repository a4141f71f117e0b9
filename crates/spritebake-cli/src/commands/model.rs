//! Model command implementation
//!
//! Checks that a model file can be imported and shows the scale the import
//! will be normalized to.

use anyhow::Result;
use colored::Colorize;
use glam::DVec3;
use serde::Serialize;
use spritebake_core::{normalize_import_scale, ModelFormat};
use std::path::Path;
use std::process::ExitCode;

use super::args::parse_vec3;

#[derive(Debug, Serialize)]
struct ModelReport {
    path: String,
    format: ModelFormat,
    scale: DVec3,
    normalized_scale: DVec3,
}

/// Run the model command
///
/// # Arguments
/// * `path` - Model file (`.fbx`, `.glb` or `.gltf`)
/// * `scale` - Scale the exporter wrote, `x,y,z`
/// * `json_output` - Whether to print JSON
///
/// # Returns
/// Exit code: 0 on success
pub fn run(path: &str, scale: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let format = ModelFormat::from_path(Path::new(path))?;
    let scale = match scale {
        Some(value) => parse_vec3(value)?,
        None => DVec3::ONE,
    };
    let normalized = normalize_import_scale(scale);

    if json_output {
        let report = ModelReport {
            path: path.to_string(),
            format,
            scale,
            normalized_scale: normalized,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Model:".cyan().bold(), path);
    println!("  {:<12} {}", "format", format.extension());
    if normalized == scale {
        println!("  {:<12} {}", "scale", scale);
    } else {
        println!(
            "  {:<12} {} -> {}",
            "scale",
            scale,
            normalized.to_string().yellow()
        );
    }

    Ok(ExitCode::SUCCESS)
}
