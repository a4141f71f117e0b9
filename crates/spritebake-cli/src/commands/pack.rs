//! Pack command implementation
//!
//! Packs an existing frame sequence from disk into a spritesheet.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use log::debug;
use spritebake_core::naming::parse_frame_file_name;
use spritebake_core::sheet::collect_frame_files;
use spritebake_core::{pack_directory, write_sheet, ExportConfig, SheetMetadata};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::args::{grid_mode, parse_format, parse_origin};

/// Options for the pack command.
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Directory holding `{base}_frame_NNNN.{ext}` files.
    pub dir: String,
    /// Base name of the sequence. Detected when the directory holds one.
    pub base: Option<String>,
    /// Output directory (defaults to `dir`).
    pub out: Option<String>,
    /// Base configuration file.
    pub config: Option<String>,
    /// Image format name, overriding the configuration.
    pub format: Option<String>,
    /// Manual grid columns.
    pub columns: Option<u32>,
    /// Manual grid rows.
    pub rows: Option<u32>,
    /// Row origin name, overriding the configuration.
    pub origin: Option<String>,
    /// Write the JSON metadata sidecar.
    pub metadata: bool,
    /// Print JSON instead of text.
    pub json: bool,
}

/// Resolves the effective configuration: the file (if any), then flags.
pub fn resolve_config(opts: &PackOptions) -> Result<ExportConfig> {
    let mut config = match &opts.config {
        Some(path) => ExportConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => ExportConfig::default(),
    };
    if let Some(format) = opts.format.as_deref() {
        config.format = parse_format(format)?;
    }
    if let Some(grid) = grid_mode(opts.columns, opts.rows)? {
        config.grid = grid;
    }
    if let Some(origin) = opts.origin.as_deref() {
        config.row_origin = parse_origin(origin)?;
    }
    if opts.metadata {
        config.write_metadata = true;
    }
    if let Some(base) = &opts.base {
        config.base_name = Some(base.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Base name of the only frame sequence in `dir`.
fn detect_base(dir: &Path, config: &ExportConfig) -> Result<String> {
    let files = collect_frame_files(dir, None, config.format)?;
    let first = files.first().and_then(|p| p.file_name()).and_then(|n| n.to_str());
    match first.and_then(|name| parse_frame_file_name(name, config.format)) {
        Some((base, _)) => Ok(base.to_string()),
        None => bail!(
            "no {} frame files found in {}",
            config.format.extension(),
            dir.display()
        ),
    }
}

/// Run the pack command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(opts: &PackOptions) -> Result<ExitCode> {
    let config = resolve_config(opts)?;
    let dir = PathBuf::from(&opts.dir);
    let out_dir = opts.out.as_ref().map(PathBuf::from).unwrap_or_else(|| dir.clone());

    let base = match &config.base_name {
        Some(base) => base.clone(),
        None => detect_base(&dir, &config)?,
    };
    debug!("packing '{}' frames from {}", base, dir.display());

    let packed = pack_directory(
        &dir,
        Some(&base),
        config.format,
        config.grid,
        config.row_origin,
        None,
    )
    .with_context(|| format!("Failed to pack frames from {}", dir.display()))?;

    let output = write_sheet(
        &packed,
        &out_dir,
        &base,
        config.format,
        config.row_origin,
        config.write_metadata,
    )?;

    if opts.json {
        let file_name = output
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let metadata = SheetMetadata::new(
            file_name,
            &packed.layout,
            config.row_origin,
            packed.frame_count,
            &output.hash,
        );
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} ({}x{}, {} frame(s))",
        "Packed:".green().bold(),
        output.path.display(),
        packed.layout.columns,
        packed.layout.rows,
        packed.frame_count
    );
    if let Some(meta) = &output.metadata_path {
        println!("  {:<12} {}", "metadata", meta.display());
    }
    println!("  {:<12} {}", "hash", output.hash.dimmed());

    Ok(ExitCode::SUCCESS)
}
