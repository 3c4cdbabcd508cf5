//! Math primitives shared by every penumbra crate.
//!
//! Vectors come straight from glam (f32). Points, directions and colors are
//! all `Vec3`; the aliases below only document intent.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod axis;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use axis::Axis;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{rotation_about, Mat3Ext};

/// A position in world or object space.
pub type Point3 = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_index_read_write() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);

        v[1] = 7.5;
        assert_eq!(v, Vec3::new(1.0, 7.5, 3.0));
    }

    #[test]
    fn test_vec3_normalize_is_unit() {
        let v = Vec3::new(3.0, -4.0, 12.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }
}
