//! Material trait for surface scattering.

use std::sync::Arc;

use crate::sampling::{gen_f32, random_in_hemisphere, random_in_unit_sphere, random_unit_vector};
use crate::texture::{SolidColor, Texture};
use crate::{hittable::HitRecord, Ray};
use penumbra_math::Vec3;
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a scatter event that was not absorbed.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color multiplier applied to light arriving along `scattered`
    pub attenuation: Color,
    /// Outgoing ray, anchored at the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// How a diffuse surface picks its bounce direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffuseMode {
    /// normal + point in the unit ball (cos^3-ish falloff)
    InUnitSphere,
    /// normal + point on the unit sphere (true Lambertian)
    #[default]
    UnitVector,
    /// uniform over the hemisphere around the normal
    Hemisphere,
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
    mode: DiffuseMode,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    /// Albedo looked up from a texture at the hit's UV and point.
    pub fn from_texture(albedo: Arc<dyn Texture>) -> Self {
        Self {
            albedo,
            mode: DiffuseMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: DiffuseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> DiffuseMode {
        self.mode
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = match self.mode {
            DiffuseMode::InUnitSphere => rec.normal + random_in_unit_sphere(rng),
            DiffuseMode::UnitVector => rec.normal + random_unit_vector(rng),
            DiffuseMode::Hemisphere => random_in_hemisphere(rng, rec.normal),
        };

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the ray below the surface; those are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Phase function for participating media: scatters uniformly in all
/// directions, ignoring the incoming direction and the normal.
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn from_texture(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(emit)))
    }

    pub fn from_texture(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface (Snell's law).
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cuboid, Hittable, Sphere};
    use penumbra_math::Interval;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_at<'a>(material: &'a dyn Material, normal: Vec3, front_face: bool) -> HitRecord<'a> {
        HitRecord {
            p: Vec3::new(0.0, 1.0, 0.0),
            normal,
            material,
            u: 0.25,
            v: 0.75,
            t: 1.0,
            front_face,
        }
    }

    #[test]
    fn test_lambertian_modes_scatter_outward() {
        let mut rng = StdRng::seed_from_u64(7);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 0.25);

        for mode in [DiffuseMode::InUnitSphere, DiffuseMode::UnitVector, DiffuseMode::Hemisphere] {
            let mat = Lambertian::new(Color::new(0.2, 0.4, 0.6)).with_mode(mode);
            assert_eq!(mat.mode(), mode);
            let rec = hit_at(&mat, Vec3::Y, true);

            for _ in 0..200 {
                let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
                assert_eq!(result.attenuation, Color::new(0.2, 0.4, 0.6));
                assert_eq!(result.scattered.origin(), rec.p);
                assert_eq!(result.scattered.time(), 0.25);
                assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
                assert!(result.scattered.direction().is_finite());
            }
        }
    }

    #[test]
    fn test_lambertian_defaults_to_unit_vector() {
        assert_eq!(Lambertian::new(Color::ONE).mode(), DiffuseMode::UnitVector);
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mut rng = StdRng::seed_from_u64(1);
        let mat = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0);
        let rec = hit_at(&mat, Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-5);
        assert_eq!(result.attenuation, Color::splat(0.8));
    }

    #[test]
    fn test_metal_fuzz_is_clamped_and_absorbs_below_surface() {
        let mut rng = StdRng::seed_from_u64(2);
        let mat = Metal::new(Color::ONE, 5.0);
        assert_eq!(mat.fuzz, 1.0);

        // Grazing incidence: heavy fuzz pushes some rays under the surface
        let rec = hit_at(&mat, Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::new(-10.0, 1.01, 0.0), Vec3::new(1.0, -0.001, 0.0));
        let absorbed = (0..500)
            .filter(|_| mat.scatter(&ray, &rec, &mut rng).is_none())
            .count();
        assert!(absorbed > 0);

        for _ in 0..100 {
            if let Some(result) = mat.scatter(&ray, &rec, &mut rng) {
                assert!(result.scattered.direction().dot(rec.normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(3);
        let mat = Dielectric::new(1.5);
        // Inside the glass, steep angle to the surface
        let rec = hit_at(&mat, Vec3::NEG_Y, false);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(1.0, 0.2, 0.0));

        for _ in 0..50 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            // Always reflected back down
            assert!(result.scattered.direction().y < 0.0);
        }
    }

    #[test]
    fn test_schlick_reflectance() {
        assert!((reflectance(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-4);
        assert!((reflectance(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_refract_then_refract_back_restores_direction() {
        let incoming = Vec3::new(0.6, -0.8, 0.0);
        let inside = refract(incoming, Vec3::Y, 1.0 / 1.5);
        let out = refract(inside.normalize(), Vec3::Y, 1.5);

        assert!((out.normalize() - incoming).length() < 1e-4);
    }

    /// Refract through `hit`, retrying until the random draw picks refraction.
    fn refract_through(mat: &Dielectric, ray: &Ray, rec: &HitRecord, rng: &mut StdRng) -> Ray {
        let into_surface = -rec.normal;
        loop {
            let scattered = mat.scatter(ray, rec, rng).unwrap().scattered;
            if scattered.direction().dot(into_surface) > 0.0 {
                return scattered;
            }
        }
    }

    #[test]
    fn test_dielectric_slab_exit_parallel_to_entry() {
        let mut rng = StdRng::seed_from_u64(4);
        let glass = Arc::new(Dielectric::new(1.5));
        let slab = Cuboid::new(
            Vec3::new(-100.0, -100.0, -1.0),
            Vec3::new(100.0, 100.0, 0.0),
            glass.clone(),
        );
        let forward = Interval::new(0.001, f32::INFINITY);

        let incoming = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.3, -0.4, -1.0));
        let entry = slab.hit(&incoming, forward, &mut rng).unwrap();
        assert!(entry.front_face);
        let inside = refract_through(&glass, &incoming, &entry, &mut rng);

        let exit = slab.hit(&inside, forward, &mut rng).unwrap();
        assert!(!exit.front_face);
        let outgoing = refract_through(&glass, &inside, &exit, &mut rng);

        let a = incoming.direction().normalize();
        let b = outgoing.direction().normalize();
        assert!((a - b).length() < 1e-3, "entry {:?} exit {:?}", a, b);
    }

    #[test]
    fn test_dielectric_through_sphere_center_unbent() {
        let mut rng = StdRng::seed_from_u64(5);
        let glass = Arc::new(Dielectric::new(1.5));
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, glass.clone());
        let forward = Interval::new(0.001, f32::INFINITY);

        let incoming = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        let entry = sphere.hit(&incoming, forward, &mut rng).unwrap();
        let inside = refract_through(&glass, &incoming, &entry, &mut rng);
        let exit = sphere.hit(&inside, forward, &mut rng).unwrap();
        let outgoing = refract_through(&glass, &inside, &exit, &mut rng);

        assert!((outgoing.direction().normalize() - Vec3::NEG_Z).length() < 1e-4);
        assert!((exit.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_isotropic_ignores_normal() {
        let mut rng = StdRng::seed_from_u64(6);
        let mat = Isotropic::new(Color::new(0.1, 0.2, 0.3));
        let rec = hit_at(&mat, Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let mut below = 0;
        for _ in 0..400 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.1, 0.2, 0.3));
            assert!(result.scattered.direction().length_squared() < 1.0);
            if result.scattered.direction().y < 0.0 {
                below += 1;
            }
        }
        // Roughly half go against the normal
        assert!(below > 120 && below < 280);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let mut rng = StdRng::seed_from_u64(8);
        let light = DiffuseLight::new(Color::new(4.0, 4.0, 4.0));
        let rec = hit_at(&light, Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);

        assert!(light.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(light.emitted(0.0, 0.0, Vec3::ZERO), Color::splat(4.0));
        assert_eq!(Metal::new(Color::ONE, 0.0).emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
    }
}
