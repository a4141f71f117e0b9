//! Grid command implementation
//!
//! Prints the spritesheet layout a frame count would produce.

use anyhow::{bail, Result};
use colored::Colorize;
use spritebake_core::{FrameSize, GridMode, SpritesheetLayout};
use std::process::ExitCode;

use super::args::grid_mode;

/// Layout for `frames` frames of `cell_size` pixels.
pub fn layout_for(
    frames: u32,
    cell_size: u32,
    columns: Option<u32>,
    rows: Option<u32>,
) -> Result<SpritesheetLayout> {
    if frames == 0 {
        bail!("frame count must be at least 1");
    }
    let cell = FrameSize::try_from(cell_size)?;
    let grid = grid_mode(columns, rows)?.unwrap_or(GridMode::Auto);
    Ok(SpritesheetLayout::for_grid(grid, frames, cell.pixels()))
}

/// Run the grid command
///
/// # Arguments
/// * `frames` - Number of frames to place
/// * `cell_size` - Frame size in pixels
/// * `columns` / `rows` - Manual grid dimensions (auto grid when both are absent)
/// * `json_output` - Whether to print JSON
pub fn run(
    frames: u32,
    cell_size: u32,
    columns: Option<u32>,
    rows: Option<u32>,
    json_output: bool,
) -> Result<ExitCode> {
    let layout = layout_for(frames, cell_size, columns, rows)?;
    let dropped = (frames as usize).saturating_sub(layout.capacity());

    if json_output {
        let output = serde_json::json!({
            "columns": layout.columns,
            "rows": layout.rows,
            "cell_size": layout.cell_size,
            "sheet_size": [layout.sheet_width(), layout.sheet_height()],
            "capacity": layout.capacity(),
            "dropped": dropped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}x{} ({} rows of {} columns)",
        "Grid:".cyan().bold(),
        layout.columns,
        layout.rows,
        layout.rows,
        layout.columns
    );
    println!(
        "  {:<12} {}x{} px",
        "sheet",
        layout.sheet_width(),
        layout.sheet_height()
    );
    println!("  {:<12} {}", "capacity", layout.capacity());
    if dropped > 0 {
        println!(
            "  {} {} frame(s) do not fit and will be dropped",
            "!".yellow(),
            dropped
        );
    }

    Ok(ExitCode::SUCCESS)
}
