//! Instance transforms: wrap a hittable to move or rotate it.
//!
//! Rays are carried into the object's local frame, intersected there, and
//! the hit is mapped back to world space. The wrapped object is shared, so
//! one prototype can appear many times under different transforms.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::Ray;
use penumbra_math::{rotation_about, Aabb, Axis, Interval, Mat3, Mat3Ext, Vec3};
use rand::RngCore;

/// Offsets a hittable by a fixed vector.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        Self { object, offset }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let local_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;

        let outward = rec.outward_normal();
        rec.p += self.offset;
        rec.set_face_normal(ray, outward);
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// Rotates a hittable about one coordinate axis through the origin.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    /// Object-to-world
    rotation: Mat3,
    /// World-to-object (the transpose)
    inverse: Mat3,
}

impl Rotate {
    /// Rotate by `degrees`, right-handed, about `axis`.
    pub fn new(object: Arc<dyn Hittable>, axis: Axis, degrees: f32) -> Self {
        let rotation = rotation_about(axis, degrees);
        Self {
            object,
            rotation,
            inverse: rotation.transpose(),
        }
    }

    pub fn x(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::X, degrees)
    }

    pub fn y(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::Y, degrees)
    }

    pub fn z(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::Z, degrees)
    }
}

impl Hittable for Rotate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let local_ray = Ray::new(
            self.inverse.mul_vec3(ray.origin()),
            self.inverse.mul_vec3(ray.direction()),
            ray.time(),
        );
        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;

        let outward = self.rotation.mul_vec3(rec.outward_normal());
        rec.p = self.rotation.mul_vec3(rec.p);
        rec.set_face_normal(ray, outward);
        Some(rec)
    }

    /// Box around all eight rotated corners of the inner box.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| self.rotation.transform_aabb(&bbox))
    }
}
