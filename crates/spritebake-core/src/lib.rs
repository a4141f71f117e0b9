//! spritebake core
//!
//! Turns an animated 3D object into a fixed-camera sprite sequence or a packed
//! spritesheet. The host application owns the scene, animation playback and
//! rasterization; this crate decides where the camera goes, which frames are
//! rendered, what the files are called and how frames are laid out on a sheet.
//!
//! # Pipeline
//!
//! - **Bounds**: world-space AABB of the target, at one pose or sampled over a
//!   clip
//! - **Camera**: orthographic placement from a bound and an angle preset, with
//!   an optional mirror through the object center
//! - **Sequence**: one capture per frame of a closed range, written as
//!   `{base}_frame_{index:04}.{ext}`
//! - **Sheet**: near-square grid packing into `{base}_sh_{rows}x{cols}.{ext}`
//!
//! [`import`] holds the import policy a host applies before exporting:
//! accepted model formats and scale normalization of imported objects.
//!
//! # Example
//!
//! ```no_run
//! use spritebake_core::{export_spritesheet, ExportConfig, ExportReport, RenderContext};
//!
//! fn bake(host: &mut dyn RenderContext) {
//!     let config = ExportConfig::new("sprites").with_frame_count(16);
//!     let result = export_spritesheet(host, &config);
//!     let report = ExportReport::from_result(&result);
//!     println!("{}", report.message);
//! }
//! ```
//!
//! # Determinism
//!
//! For the same captured pixels, PNG output is byte-identical: encoding uses
//! fixed compression and filter settings, and every written file is hashed
//! with BLAKE3.

pub mod bounds;
pub mod camera;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod frame;
pub mod import;
pub mod naming;
pub mod sequence;
pub mod sheet;
pub mod target;

// Re-export main types for convenience
pub use bounds::{animated_bounds, static_bounds, static_bounds_of, Aabb, Padding};
pub use camera::{apply_flip, place_camera, AnglePreset, CameraFrame, OrbitOrientation};
pub use codec::{read_frame, write_frame, PngConfig};
pub use config::ExportConfig;
pub use context::{AnimationClip, ObjectKind, Rasterizer, RenderContext, SceneHost, SceneObject};
pub use error::{SpriteError, SpriteResult};
pub use export::{
    export_frames, export_spritesheet, plan_export, ExportPlan, ExportReport, ExportSummary,
    FramesExport, SpritesheetExport,
};
pub use frame::{FrameImage, FrameSize, ImageFormat};
pub use import::{normalize_import_scale, normalize_scene_scales, ModelFormat};
pub use naming::sanitize_base_name;
pub use sequence::{render_sequence, ExportRange, FrameRequest, SequenceOutput};
pub use sheet::{
    pack, pack_directory, write_sheet, GridMode, PackedSheet, RowOrigin, SheetMetadata,
    SpritesheetLayout,
};
pub use target::{find_target, resolve_target, select_animation};
