//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree where every node owns exactly two children. Each level
//! sorts its primitives along a randomly chosen axis and splits at the
//! median, so construction is O(n log n) and queries descend O(log n) levels.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::sampling::gen_index;
use crate::Ray;
use penumbra_math::{Aabb, Axis, Interval};
use rand::RngCore;
use thiserror::Error;

/// Errors raised while building a BVH.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BvhError {
    #[error("primitive {index} has no bounding box")]
    MissingBoundingBox { index: usize },

    #[error("cannot build a BVH over zero primitives")]
    Empty,
}

pub type BvhResult<T> = Result<T, BvhError>;

/// A primitive together with its box over the shutter interval.
type Entry = (Aabb, Arc<dyn Hittable>);

/// BVH node. Children are either primitives or further nodes.
///
/// A node built over a single primitive stores that primitive as both
/// children; `duplicate` marks this so the right side is not queried twice.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
    duplicate: bool,
}

impl BvhNode {
    /// Build a hierarchy over `objects`, using boxes for `[time0, time1]`.
    ///
    /// Fails if the list is empty or any primitive is unbounded.
    pub fn new(
        objects: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> BvhResult<Self> {
        if objects.is_empty() {
            return Err(BvhError::Empty);
        }

        let mut entries = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| {
                object
                    .bounding_box(time0, time1)
                    .map(|bbox| (bbox, object))
                    .ok_or(BvhError::MissingBoundingBox { index })
            })
            .collect::<BvhResult<Vec<Entry>>>()?;

        log::debug!("Building BVH over {} primitives", entries.len());
        Ok(Self::build(&mut entries, rng))
    }

    /// Build over the members of a list. The list is left untouched.
    pub fn from_list(
        list: &HittableList,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> BvhResult<Self> {
        Self::new(list.objects().to_vec(), time0, time1, rng)
    }

    fn build(entries: &mut [Entry], rng: &mut dyn RngCore) -> Self {
        let axis = Axis::from_index(gen_index(rng, 2));
        let compare = |a: &Entry, b: &Entry| box_compare(&a.0, &b.0, axis);

        match entries.len() {
            1 => {
                let (bbox, only) = &entries[0];
                Self {
                    left: only.clone(),
                    right: only.clone(),
                    bbox: *bbox,
                    duplicate: true,
                }
            }
            2 => {
                if compare(&entries[0], &entries[1]) == Ordering::Greater {
                    entries.swap(0, 1);
                }
                let (first, second) = (&entries[0], &entries[1]);
                Self {
                    left: first.1.clone(),
                    right: second.1.clone(),
                    bbox: Aabb::surrounding(&first.0, &second.0),
                    duplicate: false,
                }
            }
            len => {
                entries.sort_by(compare);
                let (lower, upper) = entries.split_at_mut(len / 2);

                let left = Self::build(lower, rng);
                let right = Self::build(upper, rng);
                let bbox = Aabb::surrounding(&left.bbox, &right.bbox);

                Self {
                    left: Arc::new(left),
                    right: Arc::new(right),
                    bbox,
                    duplicate: false,
                }
            }
        }
    }

    pub fn bbox(&self) -> Aabb {
        self.bbox
    }
}

/// Order two boxes by their minimum along `axis`. NaN compares equal.
fn box_compare(a: &Aabb, b: &Aabb, axis: Axis) -> Ordering {
    let a_min = a.axis_interval(axis).min;
    let b_min = b.axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = self.left.hit(ray, ray_t, rng);
        if self.duplicate {
            return hit_left;
        }

        // The right side may only report something strictly closer
        let right_t = hit_left.as_ref().map_or(ray_t, |rec| ray_t.with_max(rec.t));
        let hit_right = self.right.hit(ray, right_t, rng);

        hit_right.or(hit_left)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{gen_range, random_unit_vector, random_vec3};
    use crate::{Color, Lambertian, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(center, radius, Arc::new(Lambertian::new(Color::splat(0.5)))))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    fn scattered_spheres(count: usize, seed: u64) -> HittableList {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let center = random_vec3(&mut rng, -10.0, 10.0);
                sphere(center, gen_range(&mut rng, 0.2, 1.5))
            })
            .collect()
    }

    #[test]
    fn test_bvh_empty_is_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = BvhNode::new(vec![], 0.0, 1.0, &mut rng);
        assert_eq!(result.err(), Some(BvhError::Empty));
    }

    #[test]
    fn test_bvh_missing_bounding_box() {
        let mut rng = StdRng::seed_from_u64(0);
        let objects: Vec<Arc<dyn Hittable>> = vec![
            sphere(Vec3::ZERO, 1.0),
            sphere(Vec3::X, 1.0),
            Arc::new(HittableList::new()),
        ];

        let result = BvhNode::new(objects, 0.0, 1.0, &mut rng);
        assert_eq!(result.err(), Some(BvhError::MissingBoundingBox { index: 2 }));
    }

    #[test]
    fn test_bvh_single_primitive_aliases_both_children() {
        let mut rng = StdRng::seed_from_u64(0);
        let bvh = BvhNode::new(vec![sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)], 0.0, 1.0, &mut rng)
            .unwrap();

        assert!(bvh.duplicate);
        assert!(Arc::ptr_eq(&bvh.left, &bvh.right));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        let rec = bvh.hit(&ray, forward(), &mut rng).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_two_primitives_sorted() {
        let mut rng = StdRng::seed_from_u64(9);
        let far = sphere(Vec3::splat(5.0), 1.0);
        let near = sphere(Vec3::splat(-5.0), 1.0);
        let bvh = BvhNode::new(vec![far.clone(), near.clone()], 0.0, 1.0, &mut rng).unwrap();

        // Lower minimum on every axis goes left
        assert!(Arc::ptr_eq(&bvh.left, &near));
        assert!(Arc::ptr_eq(&bvh.right, &far));
        assert_eq!(bvh.bbox().min(), Vec3::splat(-6.0));
        assert_eq!(bvh.bbox().max(), Vec3::splat(6.0));
    }

    #[test]
    fn test_bvh_bbox_matches_list() {
        let list = scattered_spheres(37, 3);
        let mut rng = StdRng::seed_from_u64(4);
        let bvh = BvhNode::from_list(&list, 0.0, 1.0, &mut rng).unwrap();

        assert_eq!(bvh.bounding_box(0.0, 1.0), list.bounding_box(0.0, 1.0));
    }

    #[test]
    fn test_bvh_matches_linear_search() {
        let list = scattered_spheres(60, 17);
        let mut ray_rng = StdRng::seed_from_u64(99);
        let rays: Vec<Ray> = (0..300)
            .map(|_| {
                let origin = random_vec3(&mut ray_rng, -15.0, 15.0);
                Ray::new_simple(origin, random_unit_vector(&mut ray_rng))
            })
            .collect();

        for build_seed in [1, 2, 3, 4] {
            let mut rng = StdRng::seed_from_u64(build_seed);
            let bvh = BvhNode::from_list(&list, 0.0, 1.0, &mut rng).unwrap();

            for ray in &rays {
                let expected = list.hit(ray, forward(), &mut rng);
                let actual = bvh.hit(ray, forward(), &mut rng);

                match (expected, actual) {
                    (None, None) => {}
                    (Some(e), Some(a)) => {
                        assert!((e.t - a.t).abs() < 1e-5, "t {} vs {}", e.t, a.t);
                        assert!((e.p - a.p).length() < 1e-4);
                        assert!((e.normal - a.normal).length() < 1e-4);
                    }
                    (e, a) => panic!(
                        "list hit {:?}, bvh hit {:?}",
                        e.map(|r| r.t),
                        a.map(|r| r.t)
                    ),
                }
            }
        }
    }
}
