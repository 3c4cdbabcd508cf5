// Rotation utilities for Mat3
//
// Extends glam::Mat3 with the bounding-box helper the rotation wrappers need.
// Note: glam::Mat3 already provides mul_vec3() and transpose()

use glam::{Mat3, Vec3};

use crate::{Aabb, Axis};

/// Extension trait for Mat3 used by instance rotations.
pub trait Mat3Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for Mat3 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners();

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for corner in corners {
            let rotated = self.mul_vec3(corner);
            result_min = result_min.min(rotated);
            result_max = result_max.max(rotated);
        }

        Aabb::from_points(result_min, result_max)
    }
}

/// Right-handed rotation of `degrees` about a coordinate axis.
pub fn rotation_about(axis: Axis, degrees: f32) -> Mat3 {
    let radians = degrees.to_radians();
    match axis {
        Axis::X => Mat3::from_rotation_x(radians),
        Axis::Y => Mat3::from_rotation_y(radians),
        Axis::Z => Mat3::from_rotation_z(radians),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_about_z_quarter_turn() {
        let mat = rotation_about(Axis::Z, 90.0);
        let transformed = mat.mul_vec3(Vec3::X);

        assert!((transformed - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_rotation_about_y_right_handed() {
        // x' = cos*x + sin*z, z' = -sin*x + cos*z
        let mat = rotation_about(Axis::Y, 30.0);
        let p = Vec3::new(2.0, 1.0, -1.0);
        let (s, c) = 30f32.to_radians().sin_cos();
        let expected = Vec3::new(c * p.x + s * p.z, p.y, -s * p.x + c * p.z);

        assert!((mat.mul_vec3(p) - expected).length() < 1e-5);
    }

    #[test]
    fn test_rotation_transpose_is_inverse() {
        let mat = rotation_about(Axis::X, 37.0);
        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = mat.transpose().mul_vec3(mat.mul_vec3(point));

        assert!((back - point).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = Mat3::IDENTITY.transform_aabb(&aabb);

        assert!((transformed.min() - aabb.min()).length() < 0.001);
        assert!((transformed.max() - aabb.max()).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotated_unit_cube_grows() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = rotation_about(Axis::Y, 45.0).transform_aabb(&aabb);
        let half_diag = std::f32::consts::FRAC_1_SQRT_2;

        // Corner (1, _, 1) lands on +x, corner (0, _, 0) stays put.
        assert!((transformed.x.max - 2.0 * half_diag).abs() < 1e-5);
        assert!(transformed.x.min.abs() < 1e-5);
        assert!((transformed.z.min + half_diag).abs() < 1e-5);
        assert!((transformed.z.max - half_diag).abs() < 1e-5);
        assert_eq!(transformed.y, aabb.y);
    }
}
