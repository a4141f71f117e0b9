//! Export entry points.
//!
//! [`export_frames`] writes one image per frame; [`export_spritesheet`]
//! renders the same frames into a scratch directory and packs them into a
//! single sheet. Both resolve the target and the animation before anything is
//! written, so a scene without either leaves the output directory untouched.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::bounds::static_bounds_of;
use crate::camera::{apply_flip, place_camera, CameraFrame};
use crate::config::ExportConfig;
use crate::context::{AnimationClip, ObjectKind, RenderContext, SceneObject};
use crate::error::SpriteResult;
use crate::sequence::{render_sequence, FrameRequest, SequenceOutput};
use crate::sheet::{pack_directory, write_sheet, GridMode, SheetOutput, SpritesheetLayout};
use crate::target::{resolve_target, select_animation};

/// Prefix of the scratch directory used while building a spritesheet.
pub const TEMP_FRAMES_PREFIX: &str = "temp_frames";

/// Target, clip and camera chosen for an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    /// Object being rendered.
    pub target: SceneObject,
    /// Animation being rendered.
    pub clip: AnimationClip,
    /// Camera used for every frame.
    pub camera: CameraFrame,
}

/// Resolves the target and animation and places the camera.
///
/// Binds the clip to the target when the target is an armature. Writes
/// nothing to disk.
pub fn plan_export<C: RenderContext + ?Sized>(
    ctx: &mut C,
    config: &ExportConfig,
) -> SpriteResult<ExportPlan> {
    config.validate()?;
    let target = resolve_target(&*ctx)?;
    let clip = select_animation(&*ctx, config.animation.as_deref())?;

    if target.kind == ObjectKind::Armature {
        ctx.bind_animation(&target, &clip);
    }

    let bound = static_bounds_of(&*ctx, &target);
    let mut camera = place_camera(&bound, config.angle, config.padding);
    if config.flip {
        camera = apply_flip(&camera, &bound, config.angle);
    }

    Ok(ExportPlan {
        target,
        clip,
        camera,
    })
}

fn frame_request(config: &ExportConfig, clip: &AnimationClip, dir: &Path) -> FrameRequest {
    FrameRequest::new(dir, config.base_name_for(clip))
        .with_frame_size(config.frame_size)
        .with_format(config.format)
        .with_max_frames(config.frame_count)
}

/// Frame cap for a sheet: a manual grid holds at most `columns * rows`
/// frames, spread over the whole range rather than cut from its start.
fn sheet_frame_cap(config: &ExportConfig, clip: &AnimationClip) -> Option<u32> {
    match config.grid {
        GridMode::Auto => config.frame_count,
        GridMode::Manual { columns, rows } => {
            Some(config.frame_count_for(clip).min(columns * rows))
        }
    }
}

/// Result of [`export_frames`].
#[derive(Debug, Clone)]
pub struct FramesExport {
    /// What was rendered and from where.
    pub plan: ExportPlan,
    /// Directory the frames were written to.
    pub output_dir: PathBuf,
    /// The written frames.
    pub sequence: SequenceOutput,
}

/// Renders the configured range as individual frame files.
pub fn export_frames<C: RenderContext + ?Sized>(
    ctx: &mut C,
    config: &ExportConfig,
) -> SpriteResult<FramesExport> {
    let plan = plan_export(ctx, config)?;
    let request = frame_request(config, &plan.clip, &config.output_path);
    let sequence = render_sequence(
        ctx,
        config.range_for(&plan.clip),
        &plan.clip,
        &plan.camera,
        &request,
    )?;

    info!(
        "exported {} frame(s) of '{}' to {}",
        sequence.frame_count(),
        plan.clip.name,
        config.output_path.display()
    );

    Ok(FramesExport {
        plan,
        output_dir: config.output_path.clone(),
        sequence,
    })
}

/// Result of [`export_spritesheet`].
#[derive(Debug, Clone)]
pub struct SpritesheetExport {
    /// What was rendered and from where.
    pub plan: ExportPlan,
    /// Grid of the written sheet.
    pub layout: SpritesheetLayout,
    /// Frames placed on the sheet.
    pub frame_count: usize,
    /// The written sheet and optional metadata.
    pub sheet: SheetOutput,
}

/// Renders the configured range and packs it into one sheet.
///
/// Intermediate frames live in a `temp_frames*` directory inside the output
/// directory, removed whether or not the export succeeds.
pub fn export_spritesheet<C: RenderContext + ?Sized>(
    ctx: &mut C,
    config: &ExportConfig,
) -> SpriteResult<SpritesheetExport> {
    let plan = plan_export(ctx, config)?;

    fs::create_dir_all(&config.output_path)?;
    let scratch = tempfile::Builder::new()
        .prefix(TEMP_FRAMES_PREFIX)
        .tempdir_in(&config.output_path)?;

    let result = render_and_pack(ctx, config, plan, scratch.path());

    match scratch.close() {
        Ok(()) => result,
        Err(e) if result.is_ok() => Err(e.into()),
        Err(e) => {
            warn!("failed to remove scratch frames directory: {}", e);
            result
        }
    }
}

fn render_and_pack<C: RenderContext + ?Sized>(
    ctx: &mut C,
    config: &ExportConfig,
    plan: ExportPlan,
    scratch: &Path,
) -> SpriteResult<SpritesheetExport> {
    let request = frame_request(config, &plan.clip, scratch)
        .with_max_frames(sheet_frame_cap(config, &plan.clip));
    let sequence = render_sequence(
        ctx,
        config.range_for(&plan.clip),
        &plan.clip,
        &plan.camera,
        &request,
    )?;

    let packed = pack_directory(
        scratch,
        Some(&request.base_name),
        config.format,
        config.grid,
        config.row_origin,
        Some(sequence.frame_count() as usize),
    )?;
    let sheet = write_sheet(
        &packed,
        &config.output_path,
        &request.base_name,
        config.format,
        config.row_origin,
        config.write_metadata,
    )?;

    info!(
        "exported spritesheet {} ({}x{}, {} frame(s))",
        sheet.path.display(),
        packed.layout.columns,
        packed.layout.rows,
        packed.frame_count
    );

    Ok(SpritesheetExport {
        plan,
        layout: packed.layout,
        frame_count: packed.frame_count,
        sheet,
    })
}

/// Summary of a successful export, for boundary reporting.
pub trait ExportSummary {
    /// One-line human readable description.
    fn message(&self) -> String;

    /// Files the export produced.
    fn outputs(&self) -> Vec<PathBuf>;

    /// Number of frames rendered into the outputs.
    fn frame_count(&self) -> usize;
}

impl ExportSummary for FramesExport {
    fn message(&self) -> String {
        format!(
            "Exported {} frames to: {}",
            self.sequence.frame_count(),
            self.output_dir.display()
        )
    }

    fn outputs(&self) -> Vec<PathBuf> {
        self.sequence.paths().map(Path::to_path_buf).collect()
    }

    fn frame_count(&self) -> usize {
        self.sequence.frames.len()
    }
}

impl ExportSummary for SpritesheetExport {
    fn message(&self) -> String {
        format!(
            "Exported spritesheet: {} ({}x{})",
            self.sheet.path.display(),
            self.layout.columns,
            self.layout.rows
        )
    }

    fn outputs(&self) -> Vec<PathBuf> {
        let mut outputs = vec![self.sheet.path.clone()];
        outputs.extend(self.sheet.metadata_path.clone());
        outputs
    }

    fn frame_count(&self) -> usize {
        self.frame_count
    }
}

/// Flat ok/failed status of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Whether the export succeeded.
    pub ok: bool,
    /// Human readable status line.
    pub message: String,
    /// Stable error code on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Files produced.
    pub outputs: Vec<PathBuf>,
    /// Frames rendered.
    pub frame_count: usize,
}

impl ExportReport {
    /// Builds a report from an export result.
    pub fn from_result<T: ExportSummary>(result: &SpriteResult<T>) -> Self {
        match result {
            Ok(summary) => Self {
                ok: true,
                message: summary.message(),
                error_code: None,
                outputs: summary.outputs(),
                frame_count: summary.frame_count(),
            },
            Err(e) => Self {
                ok: false,
                message: format!("Export failed: {}", e),
                error_code: Some(e.code().to_string()),
                outputs: Vec::new(),
                frame_count: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpriteError;

    #[test]
    fn test_manual_grid_caps_sheet_frames() {
        let clip = AnimationClip::new("Walk", 1, 24);
        let manual = ExportConfig::default().with_grid(GridMode::Manual {
            columns: 2,
            rows: 2,
        });
        assert_eq!(sheet_frame_cap(&manual, &clip), Some(4));
        assert_eq!(
            sheet_frame_cap(&manual.clone().with_frame_count(3), &clip),
            Some(3)
        );
        assert_eq!(sheet_frame_cap(&ExportConfig::default(), &clip), None);
        assert_eq!(
            sheet_frame_cap(&ExportConfig::default().with_frame_count(16), &clip),
            Some(16)
        );
    }

    #[test]
    fn test_failed_report() {
        let result: SpriteResult<FramesExport> = Err(SpriteError::NoTarget);
        let report = ExportReport::from_result(&result);
        assert!(!report.ok);
        assert!(report.message.starts_with("Export failed: "));
        assert_eq!(report.error_code.as_deref(), Some("SPRITE_001"));
        assert!(report.outputs.is_empty());
    }

    #[test]
    fn test_report_serializes_without_code_on_success() {
        let report = ExportReport {
            ok: true,
            message: "Exported 2 frames to: out".to_string(),
            error_code: None,
            outputs: vec![PathBuf::from("out/a_frame_0000.png")],
            frame_count: 2,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ok"], true);
        assert!(json.get("error_code").is_none());
    }
}
