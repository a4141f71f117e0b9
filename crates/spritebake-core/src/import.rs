//! Model import policy.
//!
//! Model files are parsed by the host. This module only decides which files
//! are accepted and how freshly imported objects are rescaled.

use std::path::Path;

use glam::DVec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::context::{ObjectKind, SceneObject};
use crate::error::{SpriteError, SpriteResult};

/// Importable model file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    /// Autodesk FBX.
    Fbx,
    /// Binary glTF.
    Glb,
    /// JSON glTF.
    Gltf,
}

impl ModelFormat {
    /// Returns the file extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Fbx => "fbx",
            ModelFormat::Glb => "glb",
            ModelFormat::Gltf => "gltf",
        }
    }

    /// Detects the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> SpriteResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "fbx" => Ok(ModelFormat::Fbx),
            "glb" => Ok(ModelFormat::Glb),
            "gltf" => Ok(ModelFormat::Gltf),
            _ => Err(SpriteError::unsupported_format(ext)),
        }
    }
}

/// Raises every scale component below 1.0 to exactly 1.0.
///
/// Exporters frequently write centimetre-scaled rigs as 0.01; this brings them
/// back to unit scale without shrinking objects that are already large.
pub fn normalize_import_scale(scale: DVec3) -> DVec3 {
    scale.max(DVec3::ONE)
}

/// Applies [`normalize_import_scale`] to meshes and armatures in place.
///
/// Hosts call this on the objects they just imported, before the first
/// export. Returns how many objects changed.
pub fn normalize_scene_scales(objects: &mut [SceneObject]) -> usize {
    let mut changed = 0;
    for object in objects
        .iter_mut()
        .filter(|o| matches!(o.kind, ObjectKind::Mesh | ObjectKind::Armature))
    {
        let scale = normalize_import_scale(object.scale);
        if scale != object.scale {
            debug!(
                "normalized scale of '{}' from {} to {}",
                object.name, object.scale, scale
            );
            object.scale = scale;
            changed += 1;
        }
    }
    changed
}
