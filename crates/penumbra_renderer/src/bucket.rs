//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::renderer::{render_pixel, RenderConfig, RenderError};
use crate::{Camera, Color, Hittable};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's generator. Depends only on the render seed and
    /// the bucket's position, never on scheduling order.
    pub fn rng_seed(&self, render_seed: u64) -> u64 {
        let key = ((self.y as u64) << 32) | self.x as u64;
        render_seed ^ key.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets closer to the middle of the frame come first, so progress
/// logs describe the interesting part of the image early.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let step = bucket_size.max(1);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(step as usize)
        .flat_map(move |y| {
            (0..width).step_by(step as usize).map(move |x| {
                Bucket::new(x, y, step.min(width - x), step.min(height - y), 0)
            })
        })
        .collect();

    sort_spiral(&mut buckets, width, height);
    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }

    buckets
}

/// Order buckets by the squared distance from their middle to the image's.
/// The sort is stable, so ties keep scanline order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center = (width as f32 * 0.5, height as f32 * 0.5);
    let distance = |b: &Bucket| {
        let dx = b.x as f32 + b.width as f32 * 0.5 - center.0;
        let dy = b.y as f32 + b.height as f32 * 0.5 - center.1;
        dx * dx + dy * dy
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render a single bucket with its own seeded generator.
///
/// `cancel` is polled once per scanline.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> Result<BucketResult, RenderError> {
    let mut rng = StdRng::seed_from_u64(bucket.rng_seed(config.seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        if cancel.load(Ordering::Relaxed) {
            log::debug!("Bucket {} cancelled at row {}", bucket.index, local_y);
            return Err(RenderError::Cancelled);
        }

        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(camera, world, global_x, global_y, config, &mut rng));
        }
    }

    Ok(BucketResult::new(*bucket, pixels))
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 30, 64);
        assert_eq!(buckets.len(), 2);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 30);
        assert!(buckets.iter().all(|b| b.height == 30));
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_bucket_seeds_differ() {
        let buckets = generate_buckets(256, 256, 32);
        let mut seeds: Vec<u64> = buckets.iter().map(|b| b.rng_seed(7)).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), buckets.len());

        let b = buckets[0];
        assert_eq!(b.rng_seed(7), b.rng_seed(7));
        assert_ne!(b.rng_seed(7), b.rng_seed(8));
    }
}
