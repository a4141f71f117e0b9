//! Choosing what to render.

use log::debug;

use crate::context::{AnimationClip, ObjectKind, SceneHost, SceneObject};
use crate::error::{SpriteError, SpriteResult};

/// Picks the export target: the first armature, otherwise the first mesh that
/// has vertices.
pub fn find_target(objects: &[SceneObject]) -> SpriteResult<SceneObject> {
    objects
        .iter()
        .find(|o| o.kind == ObjectKind::Armature)
        .or_else(|| {
            objects
                .iter()
                .find(|o| o.kind == ObjectKind::Mesh && o.vertex_count > 0)
        })
        .cloned()
        .ok_or(SpriteError::NoTarget)
}

/// [`find_target`] over the host's objects.
pub fn resolve_target<H: SceneHost + ?Sized>(host: &H) -> SpriteResult<SceneObject> {
    let target = find_target(&host.objects())?;
    debug!("resolved target '{}' ({:?})", target.name, target.kind);
    Ok(target)
}

/// Picks the clip to export.
///
/// An explicit name must exist. Without one, the host's active clip wins,
/// then the first clip in host order.
pub fn select_animation<H: SceneHost + ?Sized>(
    host: &H,
    requested: Option<&str>,
) -> SpriteResult<AnimationClip> {
    let clips = host.animations();
    if clips.is_empty() {
        return Err(SpriteError::NoAnimations);
    }

    if let Some(name) = requested {
        return clips
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SpriteError::animation_not_found(name));
    }

    let active = host
        .active_animation()
        .and_then(|name| clips.iter().position(|c| c.name == name));
    let index = active.unwrap_or(0);
    Ok(clips[index].clone())
}
