//! Error types for the sprite export pipeline.

use thiserror::Error;

/// Result type for sprite export operations.
pub type SpriteResult<T> = Result<T, SpriteError>;

/// Errors that can occur while framing, rendering or packing sprites.
///
/// Every variant is terminal for the operation that produced it. None of them
/// are retried, since missing data or bad configuration will not resolve on a
/// second attempt.
#[derive(Debug, Error)]
pub enum SpriteError {
    /// No armature, and no mesh with vertices, exists in the scene.
    #[error("No eligible target object found (expected an armature or a mesh with vertices)")]
    NoTarget,

    /// The scene has no animation clips at all.
    #[error("No animations found in the scene")]
    NoAnimations,

    /// A named animation clip does not exist.
    #[error("Animation '{name}' not found")]
    AnimationNotFound { name: String },

    /// Fewer rendered frame images exist than packing requires.
    #[error("Spritesheet needs {required} frame image(s) but only {found} were rendered")]
    InsufficientFrames { required: usize, found: usize },

    /// A file extension is not recognised for import or export.
    #[error("Unsupported file format: '{extension}'")]
    UnsupportedFormat { extension: String },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A frame image does not match the spritesheet cell size.
    #[error("Frame {index} is {width}x{height}, expected {expected}x{expected}")]
    FrameSizeMismatch {
        index: usize,
        expected: u32,
        width: u32,
        height: u32,
    },

    /// The host rasterizer failed to capture a frame.
    #[error("Render failed at frame {frame}: {message}")]
    Render { frame: i32, message: String },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or WebP encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpriteError {
    /// Creates a new animation-not-found error.
    pub fn animation_not_found(name: impl Into<String>) -> Self {
        Self::AnimationNotFound { name: name.into() }
    }

    /// Creates a new unsupported format error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Creates a new invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a new render error.
    pub fn render(frame: i32, message: impl Into<String>) -> Self {
        Self::Render {
            frame,
            message: message.into(),
        }
    }

    /// Stable error code, suitable for machine-readable reports.
    pub fn code(&self) -> &'static str {
        match self {
            SpriteError::NoTarget => "SPRITE_001",
            SpriteError::NoAnimations => "SPRITE_002",
            SpriteError::AnimationNotFound { .. } => "SPRITE_003",
            SpriteError::InsufficientFrames { .. } => "SPRITE_004",
            SpriteError::UnsupportedFormat { .. } => "SPRITE_005",
            SpriteError::InvalidConfig { .. } => "SPRITE_006",
            SpriteError::FrameSizeMismatch { .. } => "SPRITE_007",
            SpriteError::Render { .. } => "SPRITE_008",
            SpriteError::Io(_) => "SPRITE_009",
            SpriteError::Image(_) => "SPRITE_010",
            SpriteError::PngEncoding(_) => "SPRITE_011",
            SpriteError::Json(_) => "SPRITE_012",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpriteError::NoTarget;
        assert!(err.to_string().contains("No eligible target"));

        let err = SpriteError::animation_not_found("Walk");
        assert!(err.to_string().contains("'Walk'"));

        let err = SpriteError::InsufficientFrames {
            required: 8,
            found: 5,
        };
        assert!(err.to_string().contains("8"));
        assert!(err.to_string().contains("5"));
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            SpriteError::NoTarget,
            SpriteError::NoAnimations,
            SpriteError::animation_not_found("a"),
            SpriteError::InsufficientFrames {
                required: 1,
                found: 0,
            },
            SpriteError::unsupported_format("obj"),
            SpriteError::invalid_config("x"),
            SpriteError::render(3, "gpu lost"),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
