//! Transform helpers over `glam`.
//!
//! `glam` multiplies column vectors (`v' = M * v`), so the "scale, then rotate,
//! then translate" pose reads right-to-left: `T * R * S`. That is the same
//! transform as the row-vector product `S · R · T`.

use glam::{Mat4, Vec2, Vec3};

pub const PI: f32 = std::f32::consts::PI;
pub const TWO_PI: f32 = std::f32::consts::TAU;
pub const PI_OVER_TWO: f32 = std::f32::consts::FRAC_PI_2;

/// World transform of a 2D pose: uniform scale, rotation about Z, translation in the XY plane.
pub fn scale_rotate_translate(scale: f32, rotation: f32, position: Vec2) -> Mat4 {
    Mat4::from_translation(position.extend(0.0))
        * Mat4::from_rotation_z(rotation)
        * Mat4::from_scale(Vec3::splat(scale))
}

/// Orthographic projection with the origin in the middle of a `width` x `height` view.
pub fn simple_view_projection(width: f32, height: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(2.0 / width, 2.0 / height, 1.0))
}

/// Unit vector on the unit circle for `angle` radians.
pub fn forward_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_srt_applies_scale_first_then_rotation_then_translation() {
        let m = scale_rotate_translate(2.0, PI_OVER_TWO, Vec2::new(10.0, 20.0));
        // (1, 0) -> scale (2, 0) -> rotate 90° (0, 2) -> translate (10, 22)
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p.x - 10.0).abs() < EPSILON);
        assert!((p.y - 22.0).abs() < EPSILON);
    }

    #[test]
    fn test_srt_identity_pose() {
        let m = scale_rotate_translate(1.0, 0.0, Vec2::ZERO);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, EPSILON));
    }

    #[test]
    fn test_forward_is_unit_length() {
        for i in 0..16 {
            let angle = i as f32 * TWO_PI / 16.0;
            assert!((forward_from_angle(angle).length() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_view_projection_maps_corners_to_ndc() {
        let vp = simple_view_projection(1024.0, 768.0);
        let p = vp.transform_point3(Vec3::new(512.0, 384.0, 0.0));
        assert!((p.x - 1.0).abs() < EPSILON);
        assert!((p.y - 1.0).abs() < EPSILON);
    }
}
