//! Validate command implementation
//!
//! Loads an export configuration file and checks every value.

use anyhow::{Context, Result};
use colored::Colorize;
use spritebake_core::{ExportConfig, SpriteError};
use std::fs;
use std::process::ExitCode;

/// Parses and validates a configuration file's contents.
pub fn check(contents: &str) -> Result<ExportConfig, SpriteError> {
    let config = ExportConfig::from_json(contents)?;
    config.validate()?;
    Ok(config)
}

/// Run the validate command
///
/// # Arguments
/// * `config_path` - Path to the export configuration (JSON)
/// * `json_output` - Whether to print JSON
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(config_path: &str, json_output: bool) -> Result<ExitCode> {
    let contents = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path))?;
    let result = check(&contents);

    if json_output {
        let output = match &result {
            Ok(config) => serde_json::json!({ "ok": true, "config": config }),
            Err(e) => serde_json::json!({
                "ok": false,
                "error_code": e.code(),
                "message": e.to_string(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Validating:".cyan().bold(), config_path);
        match &result {
            Ok(config) => {
                println!(
                    "{} {}px {} frames, {} camera, output {}",
                    "Valid:".green().bold(),
                    config.frame_size.pixels(),
                    config.format,
                    config.angle.as_str(),
                    config.output_path.display()
                );
            }
            Err(e) => {
                println!("{} [{}] {}", "Invalid:".red().bold(), e.code(), e);
            }
        }
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
