//! In-memory frame images and the enumerations that describe them on disk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SpriteError, SpriteResult};

/// Output image file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// PNG (deterministic encoder).
    #[default]
    Png,
    /// Lossless WebP.
    Webp,
}

impl ImageFormat {
    /// Returns the file extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }

    /// Parses a file extension (case-insensitive, leading dot allowed).
    pub fn from_extension(ext: &str) -> SpriteResult<Self> {
        let ext = ext.trim_start_matches('.');
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            _ => Err(SpriteError::unsupported_format(ext)),
        }
    }

    /// Detects the format from a path's extension.
    pub fn from_path(path: &Path) -> SpriteResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}

/// Square frame resolution. Only these sizes are offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FrameSize {
    S64,
    S128,
    S256,
    #[default]
    S512,
    S1024,
    S2048,
}

impl FrameSize {
    /// Every supported size, smallest first.
    pub const ALL: [FrameSize; 6] = [
        FrameSize::S64,
        FrameSize::S128,
        FrameSize::S256,
        FrameSize::S512,
        FrameSize::S1024,
        FrameSize::S2048,
    ];

    /// Edge length in pixels.
    pub fn pixels(&self) -> u32 {
        match self {
            FrameSize::S64 => 64,
            FrameSize::S128 => 128,
            FrameSize::S256 => 256,
            FrameSize::S512 => 512,
            FrameSize::S1024 => 1024,
            FrameSize::S2048 => 2048,
        }
    }
}

impl TryFrom<u32> for FrameSize {
    type Error = SpriteError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        FrameSize::ALL
            .into_iter()
            .find(|s| s.pixels() == value)
            .ok_or_else(|| {
                SpriteError::invalid_config(format!(
                    "frame size {} is not one of 64, 128, 256, 512, 1024, 2048",
                    value
                ))
            })
    }
}

impl From<FrameSize> for u32 {
    fn from(size: FrameSize) -> Self {
        size.pixels()
    }
}

/// An RGBA8 image, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl FrameImage {
    /// Creates a fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Creates an image filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wraps raw RGBA8 bytes, checking the buffer length.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> SpriteResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(SpriteError::invalid_config(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Copies `src` into this image with its top-left corner at `(x, y)`.
    ///
    /// Straight overwrite: source alpha is copied, not composited. Parts of
    /// `src` that fall outside this image are clipped.
    pub fn blit(&mut self, src: &FrameImage, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let copy_w = src.width.min(self.width - x) as usize;
        let copy_h = src.height.min(self.height - y);
        let row_bytes = copy_w * 4;

        for row in 0..copy_h {
            let src_start = src.offset(0, row);
            let dst_start = self.offset(x, y + row);
            self.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src.pixels[src_start..src_start + row_bytes]);
        }
    }
}
