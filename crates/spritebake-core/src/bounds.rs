//! World-space bounds of the export target.
//!
//! Two flavours are provided:
//!
//! - [`static_bounds_of`] measures the target at whatever pose it is currently
//!   in. The export pipeline sizes its camera from this so the framing scale is
//!   the same for every animation exported from one object.
//! - [`animated_bounds`] samples the pose across a clip and returns a bound that
//!   encloses the whole motion. It is available for callers that prefer a tight
//!   per-animation framing.

use glam::DVec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::context::{AnimationClip, SceneHost, SceneObject};

/// At most this many intervals are sampled across a clip.
pub const MAX_SAMPLE_INTERVALS: i32 = 20;

/// Axis-aligned bounding box. `min[i] <= max[i]` on every axis; a single point
/// is a valid (degenerate) bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Creates a bound from two opposite corners, in any order.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A zero-volume bound at `p`.
    pub fn from_point(p: DVec3) -> Self {
        Self { min: p, max: p }
    }

    /// The smallest bound enclosing every point, or `None` for no points.
    pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = Self::from_point(iter.next()?);
        Some(iter.fold(first, |acc, p| acc.union(&Self::from_point(p))))
    }

    /// `(min + max) / 2`.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// `max - min`.
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    /// Largest extent over the three axes.
    pub fn size(&self) -> f64 {
        self.extent().max_element()
    }

    /// The smallest bound enclosing both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Extra room added around the framed object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    /// Whether padding is applied at all.
    #[serde(default = "default_padding_enabled")]
    pub enabled: bool,
    /// Padding as a percentage of the object size.
    #[serde(default = "default_padding_percent")]
    pub percent: f64,
}

fn default_padding_enabled() -> bool {
    true
}

fn default_padding_percent() -> f64 {
    20.0
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            enabled: default_padding_enabled(),
            percent: default_padding_percent(),
        }
    }
}

impl Padding {
    /// No padding.
    pub fn none() -> Self {
        Self {
            enabled: false,
            percent: default_padding_percent(),
        }
    }

    /// Padding of `percent` percent.
    pub fn percent(percent: f64) -> Self {
        Self {
            enabled: true,
            percent,
        }
    }

    /// Multiplier applied to a size.
    pub fn factor(&self) -> f64 {
        if self.enabled {
            1.0 + self.percent / 100.0
        } else {
            1.0
        }
    }

    /// `size` with padding applied.
    pub fn apply(&self, size: f64) -> f64 {
        size * self.factor()
    }
}

/// Bound of eight world-space corners.
pub fn static_bounds(corners: &[DVec3; 8]) -> Aabb {
    let first = Aabb::from_point(corners[0]);
    corners[1..]
        .iter()
        .fold(first, |acc, &c| acc.union(&Aabb::from_point(c)))
}

/// Bound of `object` at the host's current pose.
pub fn static_bounds_of<H: SceneHost + ?Sized>(host: &H, object: &SceneObject) -> Aabb {
    static_bounds(&host.world_bounding_corners(object))
}

/// Distance between consecutive sampled frames of `clip`.
pub fn sampling_step(clip: &AnimationClip) -> i32 {
    (clip.frame_span() / MAX_SAMPLE_INTERVALS).max(1)
}

/// Frames sampled when measuring `clip`: `start, start + step, ...` up to and
/// including `end` when it falls on the step.
///
/// An extreme pose between two samples can be missed; this keeps the cost at
/// roughly twenty evaluations whatever the clip length.
pub fn sample_frames(clip: &AnimationClip) -> Vec<i32> {
    let step = sampling_step(clip) as usize;
    let lo = clip.frame_start.min(clip.frame_end);
    let hi = clip.frame_start.max(clip.frame_end);
    (lo..=hi).step_by(step).collect()
}

/// Enclosing bound of `object` over the sampled frames of `clip`, unpadded.
///
/// Moves the host's scene time; the caller owns restoring it if that matters.
pub fn sampled_bounds<H: SceneHost + ?Sized>(
    host: &mut H,
    object: &SceneObject,
    clip: &AnimationClip,
) -> Aabb {
    let frames = sample_frames(clip);
    debug!(
        "sampling bounds of '{}' over {} frame(s) of '{}'",
        object.name,
        frames.len(),
        clip.name
    );

    let mut bound: Option<Aabb> = None;
    for frame in frames {
        host.set_time(frame);
        let sample = static_bounds_of(&*host, object);
        bound = Some(match bound {
            Some(acc) => acc.union(&sample),
            None => sample,
        });
    }

    // sample_frames always yields clip.frame_start
    bound.unwrap_or_else(|| static_bounds_of(&*host, object))
}

/// Center and (padded) size covering `object` across `clip`.
///
/// Without a clip this falls back to the current pose. Padding is applied in
/// both cases, unlike [`static_bounds_of`], which is always unpadded.
pub fn animated_bounds<H: SceneHost + ?Sized>(
    host: &mut H,
    object: &SceneObject,
    clip: Option<&AnimationClip>,
    padding: Padding,
) -> (DVec3, f64) {
    let bound = match clip {
        Some(clip) => sampled_bounds(host, object, clip),
        None => static_bounds_of(&*host, object),
    };
    (bound.center(), padding.apply(bound.size()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ObjectKind;

    fn box_corners(min: DVec3, max: DVec3) -> [DVec3; 8] {
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

    /// A unit cube that slides along +X by one unit per frame.
    struct SlidingCube {
        time: i32,
        times_seen: Vec<i32>,
    }

    impl SceneHost for SlidingCube {
        fn objects(&self) -> Vec<SceneObject> {
            vec![SceneObject::mesh("Cube", 8)]
        }

        fn animations(&self) -> Vec<AnimationClip> {
            vec![AnimationClip::new("Slide", 0, 40)]
        }

        fn bind_animation(&mut self, _object: &SceneObject, _clip: &AnimationClip) {}

        fn set_time(&mut self, frame: i32) {
            self.time = frame;
            self.times_seen.push(frame);
        }

        fn world_bounding_corners(&self, object: &SceneObject) -> [DVec3; 8] {
            assert_eq!(object.kind, ObjectKind::Mesh);
            let offset = DVec3::new(self.time as f64, 0.0, 0.0);
            box_corners(offset, offset + DVec3::ONE)
        }
    }

    #[test]
    fn test_center_and_size() {
        let b = Aabb::new(DVec3::ZERO, DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.center(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.extent(), DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.size(), 6.0);
    }

    #[test]
    fn test_new_orders_corners() {
        let b = Aabb::new(DVec3::new(1.0, -1.0, 5.0), DVec3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, DVec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, DVec3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn test_degenerate_point_bound() {
        let p = DVec3::new(3.0, 3.0, 3.0);
        let b = static_bounds(&[p; 8]);
        assert_eq!(b.center(), p);
        assert_eq!(b.size(), 0.0);
    }

    #[test]
    fn test_from_points() {
        assert!(Aabb::from_points(Vec::new()).is_none());
        let b = Aabb::from_points([DVec3::X, DVec3::NEG_Y, DVec3::Z * 3.0]).unwrap();
        assert_eq!(b.min, DVec3::new(0.0, -1.0, 0.0));
        assert_eq!(b.max, DVec3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn test_static_bounds_of_rotated_corners() {
        // corners of a box rotated 45 degrees about Z
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let mut corners = [DVec3::ZERO; 8];
        let ring = [
            DVec3::new(h, 0.0, 0.0),
            DVec3::new(0.0, h, 0.0),
            DVec3::new(-h, 0.0, 0.0),
            DVec3::new(0.0, -h, 0.0),
        ];
        for (i, p) in ring.iter().enumerate() {
            corners[i] = *p;
            corners[i + 4] = *p + DVec3::Z;
        }
        let b = static_bounds(&corners);
        assert!((b.size() - 1.0).abs() < 1e-12);
        assert!((b.extent().x - 2.0 * h).abs() < 1e-12);
    }

    #[test]
    fn test_sampling_step() {
        assert_eq!(sampling_step(&AnimationClip::new("a", 0, 10)), 1);
        assert_eq!(sampling_step(&AnimationClip::new("a", 0, 40)), 2);
        assert_eq!(sampling_step(&AnimationClip::new("a", 1, 250)), 12);
        assert_eq!(sample_frames(&AnimationClip::new("a", 7, 7)), vec![7]);
        assert_eq!(sample_frames(&AnimationClip::new("a", 0, 40)).len(), 21);

        let reversed = AnimationClip {
            name: "a".to_string(),
            frame_start: 40,
            frame_end: 0,
        };
        assert_eq!(sample_frames(&reversed), sample_frames(&AnimationClip::new("a", 0, 40)));
    }

    #[test]
    fn test_sampled_bounds_cover_motion() {
        let mut host = SlidingCube {
            time: 0,
            times_seen: Vec::new(),
        };
        let cube = SceneObject::mesh("Cube", 8);
        let clip = AnimationClip::new("Slide", 0, 40);

        let b = sampled_bounds(&mut host, &cube, &clip);
        assert_eq!(b.min, DVec3::ZERO);
        assert_eq!(b.max, DVec3::new(41.0, 1.0, 1.0));
        assert_eq!(host.times_seen.first(), Some(&0));
        assert_eq!(host.times_seen.last(), Some(&40));
        assert!(host.times_seen.len() <= 21);
    }

    #[test]
    fn test_animated_bounds_pads_size() {
        let mut host = SlidingCube {
            time: 0,
            times_seen: Vec::new(),
        };
        let cube = SceneObject::mesh("Cube", 8);
        let clip = AnimationClip::new("Slide", 0, 40);

        let (center, size) = animated_bounds(&mut host, &cube, Some(&clip), Padding::percent(50.0));
        assert_eq!(center, DVec3::new(20.5, 0.5, 0.5));
        assert!((size - 61.5).abs() < 1e-9);
    }

    #[test]
    fn test_animated_bounds_without_clip_uses_current_pose() {
        let mut host = SlidingCube {
            time: 3,
            times_seen: Vec::new(),
        };
        let cube = SceneObject::mesh("Cube", 8);
        let (center, size) = animated_bounds(&mut host, &cube, None, Padding::none());
        assert_eq!(center, DVec3::new(3.5, 0.5, 0.5));
        assert_eq!(size, 1.0);
        assert!(host.times_seen.is_empty());
    }

    #[test]
    fn test_padding_is_monotonic() {
        let base = 2.0;
        let mut last = Padding::none().apply(base);
        for pct in [1.0, 5.0, 20.0, 50.0, 100.0] {
            let padded = Padding::percent(pct).apply(base);
            assert!(padded > last, "{}% should exceed the previous size", pct);
            last = padded;
        }
    }

    #[test]
    fn test_padding_defaults() {
        let p = Padding::default();
        assert!(p.enabled);
        assert_eq!(p.percent, 20.0);
        assert!((p.factor() - 1.2).abs() < 1e-12);
        assert_eq!(Padding::none().factor(), 1.0);
    }
}
