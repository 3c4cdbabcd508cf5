//! Participating media of constant density.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::sampling::gen_f32;
use crate::texture::Texture;
use crate::{Color, Material, Ray};
use penumbra_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Offset past the entry point when searching for the exit boundary.
const EXIT_SEARCH_EPSILON: f32 = 0.0001;

/// Fog or smoke filling a closed, convex boundary shape.
///
/// A ray travelling through the volume scatters after an exponentially
/// distributed distance. Where the boundary is not convex the medium only
/// fills the span between the first entry and the next exit.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    density: f32,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Arc<dyn Texture>) -> Self {
        Self::with_phase_function(boundary, density, Arc::new(Isotropic::from_texture(albedo)))
    }

    pub fn with_color(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self::with_phase_function(boundary, density, Arc::new(Isotropic::new(albedo)))
    }

    fn with_phase_function(
        boundary: Arc<dyn Hittable>,
        density: f32,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        if !(density > 0.0) {
            log::warn!("Constant medium with density {density} will never scatter");
        }

        Self {
            boundary,
            density,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    /// True when no ray can ever scatter inside the volume.
    pub fn is_transparent(&self) -> bool {
        // Also catches NaN
        !(self.density > 0.0)
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        if self.is_transparent() {
            return None;
        }

        let rec1 = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let rec2 = self
            .boundary
            .hit(ray, Interval::new(rec1.t + EXIT_SEARCH_EPSILON, f32::INFINITY), rng)?;

        let mut enter = rec1.t.max(ray_t.min);
        let exit = rec2.t.min(ray_t.max);
        if enter >= exit {
            return None;
        }
        enter = enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (exit - enter) * ray_length;

        // 1 - [0, 1) keeps the log argument away from zero
        let u = 1.0 - gen_f32(rng);
        let hit_distance = self.neg_inv_density * u.ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = enter + hit_distance / ray_length;
        log::trace!("medium scatter at t={t} (enter={enter}, exit={exit})");

        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary; the phase function ignores it
            normal: Vec3::X,
            material: self.phase_function.as_ref(),
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}
