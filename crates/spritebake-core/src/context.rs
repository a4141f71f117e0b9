//! Host-facing contracts.
//!
//! The host application owns the scene graph, animation playback and the
//! rasterizer. The pipeline only talks to it through the two traits in this
//! module, passed by `&mut` into each stage so the sequential dependency on
//! shared scene state (current time, installed camera, resolution) is explicit.
//!
//! | Stage | Reads | Writes |
//! |-------|-------|--------|
//! | target resolution | `objects`, `animations`, `active_animation` | - |
//! | bounds sampling | `world_bounding_corners` | `set_time` |
//! | frame sequencing | - | `bind_animation`, `install_camera`, `set_resolution`, `set_time`, `capture` |

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraFrame;
use crate::frame::{FrameImage, ImageFormat};

/// Kind of a scene object, as far as target resolution is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A skeleton driving skinned meshes.
    Armature,
    /// Plain mesh geometry.
    Mesh,
    /// Lights, cameras, empties and anything else.
    Other,
}

/// A scene object as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Host-side object name.
    pub name: String,
    /// Object kind.
    pub kind: ObjectKind,
    /// Number of mesh vertices (zero for non-mesh objects).
    #[serde(default)]
    pub vertex_count: u32,
    /// Object scale.
    #[serde(default = "default_scale")]
    pub scale: DVec3,
}

fn default_scale() -> DVec3 {
    DVec3::ONE
}

impl SceneObject {
    /// Creates an armature object.
    pub fn armature(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Armature,
            vertex_count: 0,
            scale: DVec3::ONE,
        }
    }

    /// Creates a mesh object with the given vertex count.
    pub fn mesh(name: impl Into<String>, vertex_count: u32) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Mesh,
            vertex_count,
            scale: DVec3::ONE,
        }
    }

    /// Creates an object of a kind the pipeline never targets.
    pub fn other(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Other,
            vertex_count: 0,
            scale: DVec3::ONE,
        }
    }

    /// Sets the object scale.
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }
}

/// An animation clip and its native frame range (inclusive on both ends).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name.
    pub name: String,
    /// First frame of the clip.
    pub frame_start: i32,
    /// Last frame of the clip.
    pub frame_end: i32,
}

impl AnimationClip {
    /// Creates a clip. The range is stored ordered.
    pub fn new(name: impl Into<String>, frame_start: i32, frame_end: i32) -> Self {
        Self {
            name: name.into(),
            frame_start: frame_start.min(frame_end),
            frame_end: frame_start.max(frame_end),
        }
    }

    /// Distance between the first and last frame.
    pub fn frame_span(&self) -> i32 {
        (self.frame_end - self.frame_start).abs()
    }

    /// Number of frames in the clip.
    pub fn frame_total(&self) -> u32 {
        self.frame_span().unsigned_abs() + 1
    }
}

/// Scene queries and animation-time control.
pub trait SceneHost {
    /// All objects in the scene, in host order.
    fn objects(&self) -> Vec<SceneObject>;

    /// All animation clips known to the host, in host order.
    fn animations(&self) -> Vec<AnimationClip>;

    /// Name of the clip currently assigned to the active object, if any.
    fn active_animation(&self) -> Option<String> {
        None
    }

    /// Assigns a clip to an object so that `set_time` poses it.
    fn bind_animation(&mut self, object: &SceneObject, clip: &AnimationClip);

    /// Advances scene time to `frame`. The host must recompute any derived
    /// pose before returning.
    fn set_time(&mut self, frame: i32);

    /// The eight world-space corners of the object's local bounding box at the
    /// current pose.
    fn world_bounding_corners(&self, object: &SceneObject) -> [DVec3; 8];
}

/// The external rasterizer.
pub trait Rasterizer {
    /// Makes `camera` the active camera for subsequent captures.
    fn install_camera(&mut self, camera: &CameraFrame);

    /// Sets the output resolution in pixels.
    fn set_resolution(&mut self, width: u32, height: u32);

    /// Renders the current scene state through the installed camera.
    ///
    /// `format` is the format the frame will be written in; hosts that render
    /// straight to encoded output use it instead of a shared render setting.
    fn capture(&mut self, format: ImageFormat) -> Result<FrameImage, String>;
}

/// Everything the export pipeline needs from the host.
pub trait RenderContext: SceneHost + Rasterizer {}

impl<T: SceneHost + Rasterizer + ?Sized> RenderContext for T {}
