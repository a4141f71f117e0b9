//! Test fixtures: an in-memory host scene and scratch output directories.

use std::path::{Path, PathBuf};

use glam::DVec3;
use spritebake_core::{
    AnimationClip, CameraFrame, FrameImage, ImageFormat, Rasterizer, SceneHost, SceneObject,
};
use tempfile::TempDir;

/// Color a [`FakeScene`] fills a capture of scene frame `frame` with.
///
/// Low and high byte of the frame number in red and green, so packed sheets
/// can be checked cell by cell.
pub fn frame_color(frame: i32) -> [u8; 4] {
    [(frame & 0xff) as u8, ((frame >> 8) & 0xff) as u8, 0x80, 255]
}

/// One call made by the pipeline into a [`FakeScene`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Bind { object: String, clip: String },
    SetTime(i32),
    InstallCamera(CameraFrame),
    SetResolution(u32, u32),
    Capture { frame: i32, format: ImageFormat },
}

/// A scripted host: a box-shaped target that moves linearly with time and a
/// rasterizer that paints each frame a solid, frame-dependent color.
#[derive(Debug, Clone)]
pub struct FakeScene {
    pub objects: Vec<SceneObject>,
    pub clips: Vec<AnimationClip>,
    pub active: Option<String>,
    /// Target bound at time zero.
    pub base_min: DVec3,
    pub base_max: DVec3,
    /// Translation per frame.
    pub velocity: DVec3,
    pub time: i32,
    pub resolution: (u32, u32),
    /// Every call in order.
    pub calls: Vec<HostCall>,
    /// Capture fails at this frame.
    pub fail_at: Option<i32>,
    /// Captures use this edge length instead of the requested resolution.
    pub capture_size: Option<u32>,
}

impl Default for FakeScene {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeScene {
    /// An empty scene with a unit-ish box bound and no motion.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            clips: Vec::new(),
            active: None,
            base_min: DVec3::new(-1.0, -1.0, 0.0),
            base_max: DVec3::new(1.0, 1.0, 2.0),
            velocity: DVec3::ZERO,
            time: 0,
            resolution: (0, 0),
            calls: Vec::new(),
            fail_at: None,
            capture_size: None,
        }
    }

    /// A rigged character with a mesh, an armature and a `Walk` clip over
    /// frames 1..=24.
    pub fn rigged() -> Self {
        Self::new()
            .with_object(SceneObject::mesh("Body", 1200))
            .with_object(SceneObject::armature("Rig"))
            .with_clip(AnimationClip::new("Walk", 1, 24))
    }

    pub fn with_object(mut self, object: SceneObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_clip(mut self, clip: AnimationClip) -> Self {
        self.clips.push(clip);
        self
    }

    pub fn with_active(mut self, name: &str) -> Self {
        self.active = Some(name.to_string());
        self
    }

    pub fn with_bounds(mut self, min: DVec3, max: DVec3) -> Self {
        self.base_min = min;
        self.base_max = max;
        self
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn failing_at(mut self, frame: i32) -> Self {
        self.fail_at = Some(frame);
        self
    }

    pub fn capturing_size(mut self, size: u32) -> Self {
        self.capture_size = Some(size);
        self
    }

    /// Scene frames captured, in call order.
    pub fn captured_frames(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Capture { frame, .. } => Some(*frame),
                _ => None,
            })
            .collect()
    }

    /// Cameras installed, in call order.
    pub fn installed_cameras(&self) -> Vec<CameraFrame> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::InstallCamera(camera) => Some(*camera),
                _ => None,
            })
            .collect()
    }

    /// `(object, clip)` bindings, in call order.
    pub fn bindings(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Bind { object, clip } => Some((object.clone(), clip.clone())),
                _ => None,
            })
            .collect()
    }
}

impl SceneHost for FakeScene {
    fn objects(&self) -> Vec<SceneObject> {
        self.objects.clone()
    }

    fn animations(&self) -> Vec<AnimationClip> {
        self.clips.clone()
    }

    fn active_animation(&self) -> Option<String> {
        self.active.clone()
    }

    fn bind_animation(&mut self, object: &SceneObject, clip: &AnimationClip) {
        self.calls.push(HostCall::Bind {
            object: object.name.clone(),
            clip: clip.name.clone(),
        });
    }

    fn set_time(&mut self, frame: i32) {
        self.time = frame;
        self.calls.push(HostCall::SetTime(frame));
    }

    fn world_bounding_corners(&self, _object: &SceneObject) -> [DVec3; 8] {
        let offset = self.velocity * f64::from(self.time);
        let (min, max) = (self.base_min + offset, self.base_max + offset);
        [
            DVec3::new(min.x, min.y, min.z),
            DVec3::new(max.x, min.y, min.z),
            DVec3::new(min.x, max.y, min.z),
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(min.x, min.y, max.z),
            DVec3::new(max.x, min.y, max.z),
            DVec3::new(min.x, max.y, max.z),
            DVec3::new(max.x, max.y, max.z),
        ]
    }
}

impl Rasterizer for FakeScene {
    fn install_camera(&mut self, camera: &CameraFrame) {
        self.calls.push(HostCall::InstallCamera(*camera));
    }

    fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = (width, height);
        self.calls.push(HostCall::SetResolution(width, height));
    }

    fn capture(&mut self, format: ImageFormat) -> Result<FrameImage, String> {
        let frame = self.time;
        self.calls.push(HostCall::Capture { frame, format });
        if self.fail_at == Some(frame) {
            return Err(format!("device lost at frame {}", frame));
        }
        let (width, height) = match self.capture_size {
            Some(size) => (size, size),
            None => self.resolution,
        };
        Ok(FrameImage::filled(width, height, frame_color(frame)))
    }
}

/// A scratch output directory.
pub struct OutputFixture {
    pub root: TempDir,
}

impl OutputFixture {
    /// Create a new empty output directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// A not-yet-created subdirectory.
    pub fn subdir(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Sorted file names directly inside `dir`.
    pub fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to read dir")
            .map(|e| {
                e.expect("Failed to read dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

impl Default for OutputFixture {
    fn default() -> Self {
        Self::new()
    }
}
