//! Frame sequence rendering.
//!
//! Drives the rasterizer once per frame of a closed range and writes every
//! capture to `{base}_frame_{index:04}.{ext}`, where `index` counts emitted
//! frames from zero.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::camera::CameraFrame;
use crate::codec::write_frame;
use crate::context::{AnimationClip, RenderContext};
use crate::error::{SpriteError, SpriteResult};
use crate::frame::{FrameSize, ImageFormat};
use crate::naming::frame_file_name;

/// Inclusive range of scene frames to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRange {
    /// First frame.
    pub start: i32,
    /// Last frame.
    pub end: i32,
}

impl ExportRange {
    /// Creates a range exactly as given. Use [`ExportRange::clamp_to`] before
    /// rendering.
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// The clip's whole native range.
    pub fn full(clip: &AnimationClip) -> Self {
        Self::new(clip.frame_start, clip.frame_end)
    }

    /// Clamps both ends into the clip's native range, then orders them.
    ///
    /// A clip stored with `frame_start > frame_end` is treated as its ordered
    /// equivalent.
    pub fn clamp_to(&self, clip: &AnimationClip) -> Self {
        let lo = clip.frame_start.min(clip.frame_end);
        let hi = clip.frame_start.max(clip.frame_end);
        let start = self.start.clamp(lo, hi);
        let end = self.end.clamp(lo, hi);
        if start > end {
            Self::new(end, start)
        } else {
            Self::new(start, end)
        }
    }

    /// Number of frames in the range, counting both ends.
    pub fn frame_total(&self) -> u32 {
        (self.end - self.start).unsigned_abs() + 1
    }

    /// Frames to render, in increasing order.
    ///
    /// With `max_frames = Some(n)` the range is subsampled to at most `n`
    /// frames spaced `max(1, len / n)` apart, starting at `start`.
    pub fn frames(&self, max_frames: Option<u32>) -> Vec<i32> {
        let total = self.frame_total();
        match max_frames {
            None => (self.start..=self.end).collect(),
            Some(n) => {
                let count = n.clamp(1, total);
                let step = (total / count).max(1) as i32;
                (0..count as i32).map(|i| self.start + i * step).collect()
            }
        }
    }
}

/// Where and how frames are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRequest {
    /// Square output resolution.
    pub frame_size: FrameSize,
    /// Image format of every frame.
    pub format: ImageFormat,
    /// Target directory, created if absent.
    pub output_dir: PathBuf,
    /// Base name (sanitized when the file name is built).
    pub base_name: String,
    /// Optional cap on the number of frames, see [`ExportRange::frames`].
    pub max_frames: Option<u32>,
}

impl FrameRequest {
    /// Creates a request with the default size and format and no frame cap.
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            frame_size: FrameSize::default(),
            format: ImageFormat::default(),
            output_dir: output_dir.into(),
            base_name: base_name.into(),
            max_frames: None,
        }
    }

    /// Set the frame size.
    pub fn with_frame_size(mut self, frame_size: FrameSize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Set the image format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Cap the number of frames.
    pub fn with_max_frames(mut self, max_frames: Option<u32>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Output path of the frame emitted at `index`.
    pub fn path_for(&self, index: u32) -> PathBuf {
        self.output_dir
            .join(frame_file_name(&self.base_name, index, self.format))
    }
}

/// One written frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFrame {
    /// Emission index.
    pub index: u32,
    /// Scene frame that was rendered.
    pub scene_frame: i32,
    /// File written.
    pub path: PathBuf,
    /// BLAKE3 hash of the file contents.
    pub hash: String,
}

/// Result of rendering a sequence.
#[derive(Debug, Clone, Default)]
pub struct SequenceOutput {
    /// Frames in emission order.
    pub frames: Vec<WrittenFrame>,
}

impl SequenceOutput {
    /// Number of frames emitted.
    pub fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }

    /// Paths of the written frames, in emission order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.frames.iter().map(|f| f.path.as_path())
    }
}

/// Renders `range` (clamped to `clip`) through `camera` and writes every frame.
///
/// Installs the camera and resolution once, then for each frame moves scene
/// time, captures in `request.format` and writes the image. The first failure
/// aborts the sequence; frames already written stay on disk.
pub fn render_sequence<C: RenderContext + ?Sized>(
    ctx: &mut C,
    range: ExportRange,
    clip: &AnimationClip,
    camera: &CameraFrame,
    request: &FrameRequest,
) -> SpriteResult<SequenceOutput> {
    let range = range.clamp_to(clip);
    let frames = range.frames(request.max_frames);
    let size = request.frame_size.pixels();

    debug!(
        "rendering {} frame(s) of '{}' ({}..={}) at {}px",
        frames.len(),
        clip.name,
        range.start,
        range.end,
        size
    );

    ctx.install_camera(camera);
    ctx.set_resolution(size, size);
    fs::create_dir_all(&request.output_dir)?;

    let mut output = SequenceOutput {
        frames: Vec::with_capacity(frames.len()),
    };
    for (index, scene_frame) in (0u32..).zip(frames) {
        ctx.set_time(scene_frame);
        let image = ctx
            .capture(request.format)
            .map_err(|message| SpriteError::render(scene_frame, message))?;
        if image.width != size || image.height != size {
            return Err(SpriteError::FrameSizeMismatch {
                index: index as usize,
                expected: size,
                width: image.width,
                height: image.height,
            });
        }

        let path = request.path_for(index);
        let hash = write_frame(&image, &path, request.format)?;
        debug!("frame {} -> {}", scene_frame, path.display());
        output.frames.push(WrittenFrame {
            index,
            scene_frame,
            path,
            hash,
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(start: i32, end: i32) -> AnimationClip {
        AnimationClip::new("Walk", start, end)
    }

    #[test]
    fn test_single_frame_range() {
        let range = ExportRange::new(5, 5).clamp_to(&clip(1, 24));
        assert_eq!(range.frame_total(), 1);
        assert_eq!(range.frames(None), vec![5]);
    }

    #[test]
    fn test_reversed_range_is_normalized() {
        let range = ExportRange::new(10, 7).clamp_to(&clip(1, 24));
        assert_eq!(range, ExportRange::new(7, 10));
        assert_eq!(range.frames(None), vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_range_is_clamped_to_clip() {
        assert_eq!(
            ExportRange::new(-5, 100).clamp_to(&clip(1, 24)),
            ExportRange::new(1, 24)
        );
        assert_eq!(
            ExportRange::new(30, 40).clamp_to(&clip(1, 24)),
            ExportRange::new(24, 24)
        );
    }

    #[test]
    fn test_clamp_to_reversed_clip() {
        let reversed: AnimationClip =
            serde_json::from_str(r#"{"name":"Walk","frame_start":24,"frame_end":1}"#).unwrap();
        assert_eq!(
            ExportRange::new(3, 5).clamp_to(&reversed),
            ExportRange::new(3, 5)
        );
        assert_eq!(
            ExportRange::new(-5, 100).clamp_to(&reversed),
            ExportRange::new(1, 24)
        );
        assert_eq!(ExportRange::full(&reversed).clamp_to(&reversed).frame_total(), 24);
    }

    #[test]
    fn test_subsampled_frames() {
        let range = ExportRange::new(1, 24);
        assert_eq!(range.frames(Some(4)), vec![1, 7, 13, 19]);
        assert_eq!(range.frames(Some(100)).len(), 24);
        assert_eq!(range.frames(Some(0)), vec![1]);

        let range = ExportRange::new(0, 9);
        assert_eq!(range.frames(Some(3)), vec![0, 3, 6]);
    }

    #[test]
    fn test_request_paths() {
        let request = FrameRequest::new("/out", "Walk:Loop*").with_format(ImageFormat::Webp);
        assert_eq!(
            request.path_for(3),
            Path::new("/out").join("Walk_Loop__frame_0003.webp")
        );
    }
}
