//! Reading and writing frame images.
//!
//! PNG output uses fixed compression settings so the same pixels always produce
//! the same bytes, which keeps sheet hashes stable across runs. WebP output is
//! lossless.

use std::fs;
use std::io::Write;
use std::path::Path;

use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

use crate::error::SpriteResult;
use crate::frame::{FrameImage, ImageFormat};

/// PNG encoder settings. Frames and sheets are always written with
/// [`PngConfig::default`].
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// zlib compression level.
    pub compression: Compression,
    /// Per-row filter.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write an RGBA frame as PNG to any writer.
pub fn write_png_to_writer<W: Write>(
    image: &FrameImage,
    writer: W,
    config: &PngConfig,
) -> SpriteResult<()> {
    let mut encoder = Encoder::new(writer, image.width, image.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&image.pixels)?;
    png_writer.finish()?;

    Ok(())
}

/// Write an RGBA frame as lossless WebP to any writer.
pub fn write_webp_to_writer<W: Write>(image: &FrameImage, writer: W) -> SpriteResult<()> {
    WebPEncoder::new_lossless(writer).encode(
        &image.pixels,
        image.width,
        image.height,
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

/// Encode a frame into memory.
pub fn encode_frame(image: &FrameImage, format: ImageFormat) -> SpriteResult<Vec<u8>> {
    let mut data = Vec::new();
    match format {
        ImageFormat::Png => write_png_to_writer(image, &mut data, &PngConfig::default())?,
        ImageFormat::Webp => write_webp_to_writer(image, &mut data)?,
    }
    Ok(data)
}

/// Write a frame to `path`, creating the parent directory if needed.
///
/// Returns the BLAKE3 hash of the written bytes.
pub fn write_frame(image: &FrameImage, path: &Path, format: ImageFormat) -> SpriteResult<String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let data = encode_frame(image, format)?;
    fs::write(path, &data)?;
    Ok(hash_bytes(&data))
}

/// Load any PNG or WebP file as an RGBA frame.
pub fn read_frame(path: &Path) -> SpriteResult<FrameImage> {
    let rgba = image::open(path)?.into_rgba8();
    let (width, height) = rgba.dimensions();
    FrameImage::from_rgba(width, height, rgba.into_raw())
}

/// Compute the BLAKE3 hash of encoded image data.
pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
