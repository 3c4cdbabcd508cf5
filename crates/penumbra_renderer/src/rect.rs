//! Axis-aligned rectangles and boxes built from them.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use penumbra_math::{Aabb, Axis, Interval, Vec3};
use rand::RngCore;

/// Half-thickness given to a rectangle's bounding box along its normal.
/// In-plane extents narrower than twice this are padded too.
const RECT_PADDING: f32 = 0.0001;

/// A rectangle lying in the plane `normal_axis = k`, spanning `a` on the
/// first in-plane axis and `b` on the second.
///
/// The outward normal is `+normal_axis` unless the rectangle was
/// [`flipped`](Rect::flipped).
pub struct Rect {
    normal_axis: Axis,
    a_axis: Axis,
    b_axis: Axis,
    a: Interval,
    b: Interval,
    k: f32,
    flipped: bool,
    material: Arc<dyn Material>,
}

impl Rect {
    fn new(
        (normal_axis, a_axis, b_axis): (Axis, Axis, Axis),
        a: Interval,
        b: Interval,
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            normal_axis,
            a_axis,
            b_axis,
            a,
            b,
            k,
            flipped: false,
            material,
        }
    }

    /// Rectangle in the plane z = k.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(
            (Axis::Z, Axis::X, Axis::Y),
            Interval::new(x0, x1),
            Interval::new(y0, y1),
            k,
            material,
        )
    }

    /// Rectangle in the plane y = k.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(
            (Axis::Y, Axis::X, Axis::Z),
            Interval::new(x0, x1),
            Interval::new(z0, z1),
            k,
            material,
        )
    }

    /// Rectangle in the plane x = k.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(
            (Axis::X, Axis::Y, Axis::Z),
            Interval::new(y0, y1),
            Interval::new(z0, z1),
            k,
            material,
        )
    }

    /// Same rectangle with its outward normal pointing the other way.
    pub fn flipped(mut self) -> Self {
        self.flipped = !self.flipped;
        self
    }

    pub fn outward_normal(&self) -> Vec3 {
        let mut n = Vec3::ZERO;
        n[self.normal_axis.index()] = if self.flipped { -1.0 } else { 1.0 };
        n
    }
}

impl Hittable for Rect {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let n = self.normal_axis.index();
        let t = (self.k - ray.origin[n]) / ray.direction[n];
        // Parallel rays give inf or NaN, which never lands strictly inside
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let a = p[self.a_axis.index()];
        let b = p[self.b_axis.index()];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let u = (a - self.a.min) / self.a.size();
        let v = (b - self.b.min) / self.b.size();

        Some(HitRecord::new(
            ray,
            t,
            self.outward_normal(),
            (u, v),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let mut lo = Vec3::ZERO;
        let mut hi = Vec3::ZERO;

        lo[self.a_axis.index()] = self.a.min;
        hi[self.a_axis.index()] = self.a.max;
        lo[self.b_axis.index()] = self.b.min;
        hi[self.b_axis.index()] = self.b.max;
        lo[self.normal_axis.index()] = self.k;
        hi[self.normal_axis.index()] = self.k;

        Some(Aabb::from_points(lo, hi).padded(2.0 * RECT_PADDING))
    }
}

/// Axis-aligned box made of six rectangles with outward-facing normals.
pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    sides: HittableList,
}

impl Cuboid {
    /// Box spanning the two corners, given in any order.
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        let min = p0.min(p1);
        let max = p0.max(p1);

        let mut sides = HittableList::new();
        let m = material;

        sides.add(Arc::new(Rect::xy(min.x, max.x, min.y, max.y, max.z, m.clone())));
        sides.add(Arc::new(Rect::xy(min.x, max.x, min.y, max.y, min.z, m.clone()).flipped()));

        sides.add(Arc::new(Rect::xz(min.x, max.x, min.z, max.z, max.y, m.clone())));
        sides.add(Arc::new(Rect::xz(min.x, max.x, min.z, max.z, min.y, m.clone()).flipped()));

        sides.add(Arc::new(Rect::yz(min.y, max.y, min.z, max.z, max.x, m.clone())));
        sides.add(Arc::new(Rect::yz(min.y, max.y, min.z, max.z, min.x, m).flipped()));

        Self { min, max, sides }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::from_points(self.min, self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn white() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::ONE))
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_xy_rect_hit_and_uv() {
        let rect = Rect::xy(0.0, 2.0, 0.0, 4.0, -5.0, white());
        let ray = Ray::new_simple(Vec3::new(0.5, 3.0, 0.0), Vec3::NEG_Z);
        let rec = rect.hit(&ray, forward(), &mut rng()).unwrap();

        assert!((rec.t - 5.0).abs() < 1e-6);
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.75).abs() < 1e-6);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_rect_edges_are_inclusive() {
        let rect = Rect::xz(-1.0, 1.0, -1.0, 1.0, 0.0, white());
        let ray = Ray::new_simple(Vec3::new(1.0, 2.0, -1.0), Vec3::NEG_Y);
        let rec = rect.hit(&ray, forward(), &mut rng()).unwrap();
        assert_eq!((rec.u, rec.v), (1.0, 0.0));

        let ray = Ray::new_simple(Vec3::new(1.01, 2.0, 0.0), Vec3::NEG_Y);
        assert!(rect.hit(&ray, forward(), &mut rng()).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let rect = Rect::yz(-1.0, 1.0, -1.0, 1.0, 0.0, white());
        let ray = Ray::new_simple(Vec3::new(1.0, 0.0, 0.0), Vec3::Y);
        assert!(rect.hit(&ray, forward(), &mut rng()).is_none());

        // In the plane itself: 0/0
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        assert!(rect.hit(&ray, forward(), &mut rng()).is_none());
    }

    #[test]
    fn test_rect_bbox_is_padded_on_normal_axis() {
        let rect = Rect::yz(0.0, 555.0, 0.0, 555.0, 555.0, white());
        let bbox = rect.bounding_box(0.0, 1.0).unwrap();
        assert!(bbox.x.size() > 0.0);
        assert!(bbox.x.contains(555.0));
        assert_eq!(bbox.y, Interval::new(0.0, 555.0));
        assert_eq!(bbox.z, Interval::new(0.0, 555.0));
    }

    #[test]
    fn test_flipped_rect_normal() {
        let rect = Rect::xy(-1.0, 1.0, -1.0, 1.0, 0.0, white()).flipped();
        assert_eq!(rect.outward_normal(), Vec3::NEG_Z);

        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let rec = rect.hit(&ray, forward(), &mut rng()).unwrap();
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_cuboid_entry_and_exit() {
        let cube = Cuboid::new(Vec3::splat(1.0), Vec3::splat(-1.0), white());
        let ray = Ray::new_simple(Vec3::new(0.2, 0.3, 5.0), Vec3::NEG_Z);

        let entry = cube.hit(&ray, forward(), &mut rng()).unwrap();
        assert!((entry.t - 4.0).abs() < 1e-5);
        assert!(entry.front_face);

        let inner = Ray::new_simple(entry.p, Vec3::NEG_Z);
        let exit = cube.hit(&inner, forward(), &mut rng()).unwrap();
        assert!((exit.t - 2.0).abs() < 1e-5);
        assert!(!exit.front_face);
        assert_eq!(exit.outward_normal(), Vec3::NEG_Z);
    }

    #[test]
    fn test_cuboid_bbox() {
        let cube = Cuboid::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(165.0, 330.0, 165.0), white());
        let bbox = cube.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::ZERO);
        assert_eq!(bbox.max(), Vec3::new(165.0, 330.0, 165.0));
    }
}
