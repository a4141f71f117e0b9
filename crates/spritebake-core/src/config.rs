//! Export configuration.
//!
//! Everything a caller can set for one export, deserializable from JSON:
//!
//! ```json
//! {
//!   "frame_size": 256,
//!   "frame_range": { "start": 1, "end": 24 },
//!   "angle": { "preset": "custom", "orientation": "up", "degrees": 45 },
//!   "padding": { "enabled": true, "percent": 10 },
//!   "format": "webp",
//!   "output_path": "sprites/hero",
//!   "grid": { "mode": "manual", "columns": 6, "rows": 4 }
//! }
//! ```
//!
//! Omitted fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bounds::Padding;
use crate::camera::AnglePreset;
use crate::context::AnimationClip;
use crate::error::{SpriteError, SpriteResult};
use crate::frame::{FrameSize, ImageFormat};
use crate::sequence::ExportRange;
use crate::sheet::{GridMode, RowOrigin};

/// Valid padding percentages when padding is enabled.
pub const PADDING_PERCENT_LIMITS: std::ops::RangeInclusive<f64> = 1.0..=100.0;

/// Settings for a frame or spritesheet export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Square frame resolution in pixels.
    #[serde(default)]
    pub frame_size: FrameSize,

    /// Frames to export. Defaults to the whole clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_range: Option<ExportRange>,

    /// Maximum number of frames, spread evenly over the range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<u32>,

    /// Camera angle.
    #[serde(default)]
    pub angle: AnglePreset,

    /// Room around the object.
    #[serde(default)]
    pub padding: Padding,

    /// Mirror the camera through the object center.
    #[serde(default = "default_flip")]
    pub flip: bool,

    /// Output image format.
    #[serde(default)]
    pub format: ImageFormat,

    /// Output directory.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Spritesheet grid.
    #[serde(default)]
    pub grid: GridMode,

    /// Spritesheet row origin.
    #[serde(default)]
    pub row_origin: RowOrigin,

    /// File base name. Defaults to the animation name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,

    /// Animation to export. Defaults to the active, then the first, clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,

    /// Write a JSON sidecar next to spritesheets.
    #[serde(default)]
    pub write_metadata: bool,
}

fn default_flip() -> bool {
    true
}

fn default_output_path() -> PathBuf {
    PathBuf::from("sprites")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            frame_size: FrameSize::default(),
            frame_range: None,
            frame_count: None,
            angle: AnglePreset::default(),
            padding: Padding::default(),
            flip: default_flip(),
            format: ImageFormat::default(),
            output_path: default_output_path(),
            grid: GridMode::default(),
            row_origin: RowOrigin::default(),
            base_name: None,
            animation: None,
            write_metadata: false,
        }
    }
}

impl ExportConfig {
    /// Creates a default configuration writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Set the frame size.
    pub fn with_frame_size(mut self, frame_size: FrameSize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Set the frame range.
    pub fn with_frame_range(mut self, start: i32, end: i32) -> Self {
        self.frame_range = Some(ExportRange::new(start, end));
        self
    }

    /// Cap the number of exported frames.
    pub fn with_frame_count(mut self, count: u32) -> Self {
        self.frame_count = Some(count);
        self
    }

    /// Set the camera angle.
    pub fn with_angle(mut self, angle: AnglePreset) -> Self {
        self.angle = angle;
        self
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Enable or disable the camera flip.
    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the spritesheet grid.
    pub fn with_grid(mut self, grid: GridMode) -> Self {
        self.grid = grid;
        self
    }

    /// Set the spritesheet row origin.
    pub fn with_row_origin(mut self, row_origin: RowOrigin) -> Self {
        self.row_origin = row_origin;
        self
    }

    /// Override the file base name.
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = Some(base_name.into());
        self
    }

    /// Export a specific animation.
    pub fn with_animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    /// Write a metadata sidecar next to spritesheets.
    pub fn with_metadata(mut self, write_metadata: bool) -> Self {
        self.write_metadata = write_metadata;
        self
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> SpriteResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> SpriteResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> SpriteResult<Self> {
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> SpriteResult<()> {
        if self.padding.enabled && !PADDING_PERCENT_LIMITS.contains(&self.padding.percent) {
            return Err(SpriteError::invalid_config(format!(
                "padding percent must be between 1 and 100, got {}",
                self.padding.percent
            )));
        }
        self.angle.validate()?;
        self.grid.validate()?;
        if self.frame_count == Some(0) {
            return Err(SpriteError::invalid_config("frame count must be at least 1"));
        }
        if let Some(base) = &self.base_name {
            if base.trim().is_empty() {
                return Err(SpriteError::invalid_config("base name must not be empty"));
            }
        }
        Ok(())
    }

    /// The configured range, clamped and ordered for `clip`.
    pub fn range_for(&self, clip: &AnimationClip) -> ExportRange {
        self.frame_range
            .unwrap_or_else(|| ExportRange::full(clip))
            .clamp_to(clip)
    }

    /// Number of frames an export of `clip` will produce.
    pub fn frame_count_for(&self, clip: &AnimationClip) -> u32 {
        let total = self.range_for(clip).frame_total();
        self.frame_count.map_or(total, |n| n.clamp(1, total))
    }

    /// File base name for `clip`.
    pub fn base_name_for<'a>(&'a self, clip: &'a AnimationClip) -> &'a str {
        self.base_name.as_deref().unwrap_or(&clip.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitOrientation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.frame_size.pixels(), 512);
        assert_eq!(config.angle, AnglePreset::Side);
        assert!(config.padding.enabled);
        assert_eq!(config.padding.percent, 20.0);
        assert!(config.flip);
        assert_eq!(config.format, ImageFormat::Png);
        assert_eq!(config.grid, GridMode::Auto);
        assert_eq!(config.row_origin, RowOrigin::TopDown);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ExportConfig::from_json("{}").unwrap(), ExportConfig::default());
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "frame_size": 256,
            "frame_range": { "start": 1, "end": 24 },
            "frame_count": 8,
            "angle": { "preset": "custom", "orientation": "up", "degrees": 45 },
            "padding": { "enabled": true, "percent": 10 },
            "flip": false,
            "format": "webp",
            "output_path": "sprites/hero",
            "grid": { "mode": "manual", "columns": 6, "rows": 4 },
            "row_origin": "bottom_up",
            "base_name": "hero_walk",
            "animation": "Walk",
            "write_metadata": true
        }"#;
        let config = ExportConfig::from_json(json).unwrap();
        let expected = ExportConfig::new("sprites/hero")
            .with_frame_size(FrameSize::S256)
            .with_frame_range(1, 24)
            .with_frame_count(8)
            .with_angle(AnglePreset::Custom {
                orientation: OrbitOrientation::Up,
                degrees: 45,
            })
            .with_padding(Padding::percent(10.0))
            .with_flip(false)
            .with_format(ImageFormat::Webp)
            .with_grid(GridMode::Manual {
                columns: 6,
                rows: 4,
            })
            .with_row_origin(RowOrigin::BottomUp)
            .with_base_name("hero_walk")
            .with_animation("Walk")
            .with_metadata(true);
        assert_eq!(config, expected);

        let reparsed = ExportConfig::from_json(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(ExportConfig::from_json(r#"{"fps": 12}"#).is_err());
        assert!(ExportConfig::from_json(r#"{"frame_size": 300}"#).is_err());
    }

    #[test]
    fn test_validation_limits() {
        let bad = [
            ExportConfig::default().with_padding(Padding::percent(0.0)),
            ExportConfig::default().with_padding(Padding::percent(150.0)),
            ExportConfig::default().with_angle(AnglePreset::Custom {
                orientation: OrbitOrientation::Side,
                degrees: 181,
            }),
            ExportConfig::default().with_grid(GridMode::Manual {
                columns: 21,
                rows: 1,
            }),
            ExportConfig::default().with_frame_count(0),
            ExportConfig::default().with_base_name("  "),
        ];
        for config in bad {
            let err = config.validate().unwrap_err();
            assert_eq!(err.code(), "SPRITE_006");
        }

        let disabled = ExportConfig::default().with_padding(Padding {
            enabled: false,
            percent: 0.0,
        });
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn test_range_and_count_for_clip() {
        let clip = AnimationClip::new("Walk", 1, 24);
        let config = ExportConfig::default();
        assert_eq!(config.range_for(&clip), ExportRange::new(1, 24));
        assert_eq!(config.frame_count_for(&clip), 24);

        let config = config.with_frame_range(10, 7).with_frame_count(100);
        assert_eq!(config.range_for(&clip), ExportRange::new(7, 10));
        assert_eq!(config.frame_count_for(&clip), 4);

        let config = config.with_frame_count(2);
        assert_eq!(config.frame_count_for(&clip), 2);
    }

    #[test]
    fn test_base_name_falls_back_to_clip() {
        let clip = AnimationClip::new("Run", 0, 10);
        assert_eq!(ExportConfig::default().base_name_for(&clip), "Run");
        assert_eq!(
            ExportConfig::default()
                .with_base_name("hero")
                .base_name_for(&clip),
            "hero"
        );
    }
}
