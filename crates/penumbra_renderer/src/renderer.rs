//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Parallel bucket rendering with per-bucket seeded generators

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use penumbra_core::RenderSettings;
use penumbra_math::Interval;
use rand::RngCore;
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Color, Hittable, Ray};

/// Lower bound on every bounce, so a ray doesn't re-hit the surface it left.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Errors that stop a render.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("render cancelled")]
    Cancelled,

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// What a ray that escapes the scene sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Constant radiance; the physically based path.
    Solid(Color),
    /// White-to-blue gradient. Emission is ignored in this mode.
    Sky,
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// What escaping rays return
    pub background: Background,
    /// Tile edge in pixels
    pub bucket_size: u32,
    /// Base seed; each bucket derives its own generator from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::default(),
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Quality and scheduling from loaded settings. The background is a
    /// property of the scene and is left at its default.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            samples_per_pixel: settings.samples_per_pixel,
            max_depth: settings.max_depth,
            bucket_size: settings.bucket_size,
            seed: settings.seed,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig("bucket_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Compute the radiance carried back along a ray.
///
/// Escaping rays return `background`. Each hit adds the material's
/// emission to its attenuated scattered contribution, recursing until the
/// ray is absorbed or `depth` bounces are spent.
pub fn ray_color(
    ray: &Ray,
    background: Color,
    world: &dyn Hittable,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY), rng) else {
        return background;
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, background, world, depth - 1, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Variant used by the sky-lit demo scenes: misses return the sky
/// gradient and emission is not collected.
pub fn ray_color_sky(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY), rng) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color_sky(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Linear blend from white (straight down) to light blue (straight up).
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.000, 0.999);
    let byte = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [byte(color.x), byte(color.y), byte(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// Samples that come back NaN or infinite count as black.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        let sample = match config.background {
            Background::Solid(background) => {
                ray_color(&ray, background, world, config.max_depth, rng)
            }
            Background::Sky => ray_color_sky(&ray, world, config.max_depth, rng),
        };

        if sample.is_finite() {
            pixel_color += sample;
        }
    }

    // Average the samples
    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// Linear color image, row-major from the top scanline.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Copy a finished bucket into place by pixel coordinate.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Gamma-corrected 8-bit pixels, ready for an image writer.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|c| color_to_rgb8(*c)).collect()
    }
}

/// Render the whole frame in parallel.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    render_with_cancel(camera, world, config, &AtomicBool::new(false))
}

/// Render the whole frame, stopping early once `cancel` becomes true.
///
/// Buckets run on the rayon pool. The output only depends on the scene,
/// camera and `config.seed`, never on thread count or scheduling.
pub fn render_with_cancel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let (width, height) = (camera.image_width, camera.image_height);
    let buckets = generate_buckets(width, height, config.bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}, {} buckets",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len()
    );
    let start = Instant::now();

    let results = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, world, config, cancel))
        .collect::<RenderResult<Vec<_>>>()?;

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2}s", start.elapsed().as_secs_f32());
    Ok(image)
}
