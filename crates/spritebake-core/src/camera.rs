//! Orthographic camera placement.
//!
//! The camera always looks at the center of the framed bound, keeps world +Z
//! as its up direction (no roll) and sits `2.5 * size` away from the center in
//! the direction given by the angle preset.

use glam::{DMat3, DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::bounds::{Aabb, Padding};
use crate::error::{SpriteError, SpriteResult};

/// Camera distance as a multiple of the framed size.
pub const DISTANCE_FACTOR: f64 = 2.5;

/// Orthographic scale as a multiple of the framed size.
pub const ORTHO_MARGIN: f64 = 1.2;

/// Per-axis offset factor of the isometric preset.
pub const ISOMETRIC_FACTOR: f64 = 0.7;

/// Fixed world up axis.
pub const WORLD_UP: DVec3 = DVec3::Z;

/// Valid range of custom orbit angles, in degrees.
pub const ORBIT_DEGREES: std::ops::RangeInclusive<i32> = -180..=180;

/// Starting side of a custom orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitOrientation {
    /// Start on +X and orbit around the vertical axis.
    #[default]
    Side,
    /// Start above the object and tilt around the X axis.
    Up,
    /// Start below the object and tilt around the X axis.
    Down,
}

impl OrbitOrientation {
    /// Returns the orientation as a string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrbitOrientation::Side => "side",
            OrbitOrientation::Up => "up",
            OrbitOrientation::Down => "down",
        }
    }

    fn base_offset(&self, distance: f64) -> DVec3 {
        match self {
            OrbitOrientation::Side => DVec3::new(distance, 0.0, 0.0),
            OrbitOrientation::Up => DVec3::new(0.0, 0.0, distance),
            OrbitOrientation::Down => DVec3::new(0.0, 0.0, -distance),
        }
    }

    fn rotation_axis(&self) -> DVec3 {
        match self {
            OrbitOrientation::Side => WORLD_UP,
            OrbitOrientation::Up | OrbitOrientation::Down => DVec3::X,
        }
    }
}

/// Named viewing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum AnglePreset {
    /// Looking along +Y from the front.
    Front,
    /// Elevated three-quarter view from front-right.
    Isometric,
    /// Looking along -X from the right.
    #[default]
    Side,
    /// Orbit of `degrees` from the side, top or bottom view.
    Custom {
        #[serde(default)]
        orientation: OrbitOrientation,
        #[serde(default)]
        degrees: i32,
    },
}

impl AnglePreset {
    /// Creates a custom orbit preset, checking the angle range.
    pub fn custom(orientation: OrbitOrientation, degrees: i32) -> SpriteResult<Self> {
        let preset = AnglePreset::Custom {
            orientation,
            degrees,
        };
        preset.validate()?;
        Ok(preset)
    }

    /// Checks that custom orbit angles are within [-180, 180].
    pub fn validate(&self) -> SpriteResult<()> {
        if let AnglePreset::Custom { degrees, .. } = self {
            if !ORBIT_DEGREES.contains(degrees) {
                return Err(SpriteError::invalid_config(format!(
                    "custom orbit angle {} is outside [-180, 180]",
                    degrees
                )));
            }
        }
        Ok(())
    }

    /// Returns the preset as a string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnglePreset::Front => "front",
            AnglePreset::Isometric => "isometric",
            AnglePreset::Side => "side",
            AnglePreset::Custom { .. } => "custom",
        }
    }

    /// Camera position relative to the framed center.
    pub fn offset(&self, distance: f64) -> DVec3 {
        match *self {
            AnglePreset::Front => DVec3::new(0.0, -distance, 0.0),
            AnglePreset::Side => DVec3::new(distance, 0.0, 0.0),
            AnglePreset::Isometric => DVec3::new(
                ISOMETRIC_FACTOR * distance,
                -ISOMETRIC_FACTOR * distance,
                ISOMETRIC_FACTOR * distance,
            ),
            AnglePreset::Custom {
                orientation,
                degrees,
            } => {
                let rotation = DQuat::from_axis_angle(
                    orientation.rotation_axis(),
                    f64::from(degrees).to_radians(),
                );
                rotation * orientation.base_offset(distance)
            }
        }
    }
}

/// A fully placed orthographic camera.
///
/// Orientation is not stored: it follows from `position`, `look_at` and
/// `up_hint`. A new frame is computed whenever framing inputs change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    /// Camera location in world space.
    pub position: DVec3,
    /// Point the camera looks at (the framed center).
    pub look_at: DVec3,
    /// World axis kept as "up".
    pub up_hint: DVec3,
    /// Orthographic scale.
    pub ortho_half_height: f64,
}

impl CameraFrame {
    /// A camera at `position` looking at `target` with the world up hint.
    pub fn looking_at(position: DVec3, target: DVec3, ortho_half_height: f64) -> Self {
        Self {
            position,
            look_at: target,
            up_hint: WORLD_UP,
            ortho_half_height,
        }
    }

    /// Distance from the camera to its target.
    pub fn distance(&self) -> f64 {
        self.position.distance(self.look_at)
    }

    /// Unit view direction. Falls back to +Y when the camera sits on its target.
    pub fn forward(&self) -> DVec3 {
        let dir = (self.look_at - self.position).normalize_or_zero();
        if dir == DVec3::ZERO {
            DVec3::Y
        } else {
            dir
        }
    }

    /// Orthonormal `(right, up, forward)` basis.
    ///
    /// When the view direction is parallel to the up hint (straight top or
    /// bottom views) +Y stands in as the secondary axis.
    pub fn basis(&self) -> (DVec3, DVec3, DVec3) {
        let forward = self.forward();
        let mut right = forward.cross(self.up_hint);
        if right.length_squared() < 1e-12 {
            right = forward.cross(DVec3::Y);
        }
        let right = right.normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Camera rotation, with the camera looking down its local -Z and local +Y
    /// as up.
    pub fn rotation(&self) -> DQuat {
        let (right, up, forward) = self.basis();
        DQuat::from_mat3(&DMat3::from_cols(right, up, -forward))
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation(), self.position).inverse()
    }
}

/// Size used for framing: the bound's largest extent, padded.
pub fn framing_size(bound: &Aabb, padding: Padding) -> f64 {
    padding.apply(bound.size())
}

/// Places an orthographic camera covering `bound` from `angle`.
pub fn place_camera(bound: &Aabb, angle: AnglePreset, padding: Padding) -> CameraFrame {
    let center = bound.center();
    let size = framing_size(bound, padding);
    let distance = size * DISTANCE_FACTOR;

    CameraFrame::looking_at(center + angle.offset(distance), center, size * ORTHO_MARGIN)
}

/// Mirrors the camera through the bound center.
///
/// Front mirrors along Y, Side along X, Isometric along both horizontal axes
/// and Custom through the center point itself. The orthographic scale is kept
/// and applying the flip twice restores the original camera.
pub fn apply_flip(frame: &CameraFrame, bound: &Aabb, angle: AnglePreset) -> CameraFrame {
    let center = bound.center();
    let p = frame.position;
    let mirrored = 2.0 * center - p;

    let position = match angle {
        AnglePreset::Front => DVec3::new(p.x, mirrored.y, p.z),
        AnglePreset::Side => DVec3::new(mirrored.x, p.y, p.z),
        AnglePreset::Isometric => DVec3::new(mirrored.x, mirrored.y, p.z),
        AnglePreset::Custom { .. } => mirrored,
    };

    CameraFrame {
        position,
        look_at: center,
        up_hint: frame.up_hint,
        ortho_half_height: frame.ortho_half_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_vec_eq(a: DVec3, b: DVec3) {
        assert!(a.abs_diff_eq(b, EPS), "{:?} != {:?}", a, b);
    }

    fn sample_bound() -> Aabb {
        Aabb::new(DVec3::new(-1.0, -1.0, 0.0), DVec3::new(1.0, 1.0, 2.0))
    }

    fn all_presets() -> Vec<AnglePreset> {
        let mut presets = vec![AnglePreset::Front, AnglePreset::Isometric, AnglePreset::Side];
        for orientation in [
            OrbitOrientation::Side,
            OrbitOrientation::Up,
            OrbitOrientation::Down,
        ] {
            for degrees in [-180, -45, 0, 30, 90, 180] {
                presets.push(AnglePreset::Custom {
                    orientation,
                    degrees,
                });
            }
        }
        presets
    }

    #[test]
    fn test_side_preset_without_padding() {
        let cam = place_camera(&sample_bound(), AnglePreset::Side, Padding::none());
        assert_vec_eq(cam.look_at, DVec3::new(0.0, 0.0, 1.0));
        assert_vec_eq(cam.position, DVec3::new(5.0, 0.0, 1.0));
        assert!((cam.distance() - 5.0).abs() < EPS);
        assert!((cam.ortho_half_height - 2.4).abs() < EPS);
    }

    #[test]
    fn test_side_preset_with_default_padding() {
        let cam = place_camera(&sample_bound(), AnglePreset::Side, Padding::default());
        assert_vec_eq(cam.position, DVec3::new(6.0, 0.0, 1.0));
        assert!((cam.ortho_half_height - 2.88).abs() < EPS);
    }

    #[test]
    fn test_front_and_isometric_positions() {
        let bound = sample_bound();
        let front = place_camera(&bound, AnglePreset::Front, Padding::none());
        assert_vec_eq(front.position, DVec3::new(0.0, -5.0, 1.0));

        let iso = place_camera(&bound, AnglePreset::Isometric, Padding::none());
        assert_vec_eq(iso.position, DVec3::new(3.5, -3.5, 4.5));
    }

    #[test]
    fn test_custom_side_orbit_rotates_about_vertical() {
        let bound = sample_bound();
        let zero = place_camera(
            &bound,
            AnglePreset::custom(OrbitOrientation::Side, 0).unwrap(),
            Padding::none(),
        );
        assert_vec_eq(zero.position, DVec3::new(5.0, 0.0, 1.0));

        let quarter = place_camera(
            &bound,
            AnglePreset::custom(OrbitOrientation::Side, 90).unwrap(),
            Padding::none(),
        );
        assert_vec_eq(quarter.position, DVec3::new(0.0, 5.0, 1.0));
    }

    #[test]
    fn test_custom_up_and_down_tilt_about_x() {
        let bound = sample_bound();
        let up = place_camera(
            &bound,
            AnglePreset::custom(OrbitOrientation::Up, 0).unwrap(),
            Padding::none(),
        );
        assert_vec_eq(up.position, DVec3::new(0.0, 0.0, 6.0));

        let tilted = place_camera(
            &bound,
            AnglePreset::custom(OrbitOrientation::Up, 90).unwrap(),
            Padding::none(),
        );
        assert_vec_eq(tilted.position, DVec3::new(0.0, -5.0, 1.0));

        let down = place_camera(
            &bound,
            AnglePreset::custom(OrbitOrientation::Down, 0).unwrap(),
            Padding::none(),
        );
        assert_vec_eq(down.position, DVec3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn test_custom_angle_range_is_checked() {
        assert!(AnglePreset::custom(OrbitOrientation::Side, 180).is_ok());
        assert!(AnglePreset::custom(OrbitOrientation::Side, -180).is_ok());
        assert!(AnglePreset::custom(OrbitOrientation::Up, 181).is_err());
        assert!(AnglePreset::custom(OrbitOrientation::Down, -181).is_err());
    }

    #[test]
    fn test_distance_scales_linearly_with_size() {
        let small = Aabb::new(DVec3::ZERO, DVec3::splat(1.0));
        let large = Aabb::new(DVec3::ZERO, DVec3::splat(2.0));
        for angle in all_presets() {
            let a = place_camera(&small, angle, Padding::percent(10.0));
            let b = place_camera(&large, angle, Padding::percent(10.0));
            assert!((b.distance() - 2.0 * a.distance()).abs() < EPS);
            assert!((b.ortho_half_height - 2.0 * a.ortho_half_height).abs() < EPS);
        }
    }

    #[test]
    fn test_flip_is_an_involution() {
        let bound = Aabb::new(DVec3::new(-0.3, 2.0, 1.0), DVec3::new(1.7, 3.5, 4.0));
        for angle in all_presets() {
            let cam = place_camera(&bound, angle, Padding::default());
            let twice = apply_flip(&apply_flip(&cam, &bound, angle), &bound, angle);
            assert_vec_eq(twice.position, cam.position);
            assert_eq!(twice.ortho_half_height, cam.ortho_half_height);
        }
    }

    #[test]
    fn test_flip_axes_per_preset() {
        let bound = sample_bound();
        let padding = Padding::none();

        let front = place_camera(&bound, AnglePreset::Front, padding);
        let flipped = apply_flip(&front, &bound, AnglePreset::Front);
        assert_vec_eq(flipped.position, DVec3::new(0.0, 5.0, 1.0));

        let side = place_camera(&bound, AnglePreset::Side, padding);
        let flipped = apply_flip(&side, &bound, AnglePreset::Side);
        assert_vec_eq(flipped.position, DVec3::new(-5.0, 0.0, 1.0));

        let iso = place_camera(&bound, AnglePreset::Isometric, padding);
        let flipped = apply_flip(&iso, &bound, AnglePreset::Isometric);
        assert_vec_eq(flipped.position, DVec3::new(-3.5, 3.5, 4.5));

        let custom = AnglePreset::custom(OrbitOrientation::Up, 0).unwrap();
        let up = place_camera(&bound, custom, padding);
        let flipped = apply_flip(&up, &bound, custom);
        assert_vec_eq(flipped.position, DVec3::new(0.0, 0.0, -4.0));
        assert_vec_eq(flipped.look_at, bound.center());
    }

    #[test]
    fn test_orientation_has_no_roll() {
        let bound = sample_bound();
        for angle in all_presets() {
            let cam = place_camera(&bound, angle, Padding::default());
            let (right, up, forward) = cam.basis();

            assert!((right.length() - 1.0).abs() < EPS);
            assert!((up.length() - 1.0).abs() < EPS);
            assert!(right.dot(forward).abs() < EPS);
            assert!(up.dot(forward).abs() < EPS);
            // no roll: the horizontal axis never tilts out of the world XY plane
            if forward.cross(WORLD_UP).length_squared() > 1e-12 {
                assert!(right.z.abs() < EPS, "{:?} has roll", angle);
            }

            let looking = cam.rotation() * DVec3::NEG_Z;
            assert_vec_eq(looking, forward);
        }
    }

    #[test]
    fn test_view_matrix_maps_target_onto_axis() {
        let cam = place_camera(&sample_bound(), AnglePreset::Isometric, Padding::none());
        let target_in_view = cam.view_matrix().transform_point3(cam.look_at);
        assert!(target_in_view.x.abs() < EPS);
        assert!(target_in_view.y.abs() < EPS);
        assert!((target_in_view.z + cam.distance()).abs() < EPS);
    }

    #[test]
    fn test_preset_serde_shape() {
        let json = serde_json::to_string(&AnglePreset::Front).unwrap();
        assert_eq!(json, r#"{"preset":"front"}"#);

        let custom: AnglePreset =
            serde_json::from_str(r#"{"preset":"custom","orientation":"up","degrees":-30}"#)
                .unwrap();
        assert_eq!(
            custom,
            AnglePreset::Custom {
                orientation: OrbitOrientation::Up,
                degrees: -30
            }
        );
    }
}
