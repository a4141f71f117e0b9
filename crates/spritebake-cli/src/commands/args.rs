//! Parsing of command-line values into core types.

use anyhow::{bail, Context, Result};
use glam::DVec3;
use spritebake_core::{AnglePreset, GridMode, ImageFormat, OrbitOrientation, RowOrigin};

/// Parses `x,y,z`.
pub fn parse_vec3(value: &str) -> Result<DVec3> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("expected three comma-separated numbers, got '{}'", value);
    }
    let mut xyz = [0.0; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .with_context(|| format!("invalid coordinate '{}' in '{}'", part, value))?;
    }
    Ok(DVec3::from_array(xyz))
}

/// Parses an angle preset name, using `orientation` and `degrees` for
/// `custom`.
pub fn parse_angle(name: &str, orientation: Option<&str>, degrees: i32) -> Result<AnglePreset> {
    let preset = match name {
        "front" => AnglePreset::Front,
        "isometric" => AnglePreset::Isometric,
        "side" => AnglePreset::Side,
        "custom" => {
            let orientation = parse_orientation(orientation.unwrap_or("side"))?;
            AnglePreset::custom(orientation, degrees)?
        }
        other => bail!(
            "unknown angle preset: {} (expected front, isometric, side or custom)",
            other
        ),
    };
    Ok(preset)
}

/// Parses an orbit orientation name.
pub fn parse_orientation(name: &str) -> Result<OrbitOrientation> {
    match name {
        "side" => Ok(OrbitOrientation::Side),
        "up" => Ok(OrbitOrientation::Up),
        "down" => Ok(OrbitOrientation::Down),
        other => bail!(
            "unknown orbit orientation: {} (expected side, up or down)",
            other
        ),
    }
}

/// Parses an image format name or extension.
pub fn parse_format(name: &str) -> Result<ImageFormat> {
    Ok(name.parse::<ImageFormat>()?)
}

/// Parses a row origin name.
pub fn parse_origin(name: &str) -> Result<RowOrigin> {
    match name {
        "top_down" => Ok(RowOrigin::TopDown),
        "bottom_up" => Ok(RowOrigin::BottomUp),
        other => bail!(
            "unknown row origin: {} (expected top_down or bottom_up)",
            other
        ),
    }
}

/// Builds a grid mode from optional manual dimensions.
///
/// Giving only one dimension fills the other with the manual default of 4.
pub fn grid_mode(columns: Option<u32>, rows: Option<u32>) -> Result<Option<GridMode>> {
    let grid = match (columns, rows) {
        (None, None) => return Ok(None),
        (columns, rows) => GridMode::Manual {
            columns: columns.unwrap_or(4),
            rows: rows.unwrap_or(4),
        },
    };
    grid.validate()?;
    Ok(Some(grid))
}
