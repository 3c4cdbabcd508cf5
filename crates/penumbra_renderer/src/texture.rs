//! Textures: pure color lookups over (u, v, point).

use std::path::Path;
use std::sync::Arc;

use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
use crate::Color;
use penumbra_core::RasterImage;
use penumbra_math::Vec3;
use rand::RngCore;

/// Debug color returned by image textures with no pixel data.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// A color as a function of surface coordinates and world position.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern driven by the sign of a product of sines.
#[derive(Clone)]
pub struct CheckerTexture {
    odd: Arc<dyn Texture>,
    even: Arc<dyn Texture>,
    frequency: f32,
}

impl CheckerTexture {
    pub const DEFAULT_FREQUENCY: f32 = 10.0;

    pub fn new(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> Self {
        Self {
            odd,
            even,
            frequency: Self::DEFAULT_FREQUENCY,
        }
    }

    pub fn from_colors(odd: Color, even: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(odd)), Arc::new(SolidColor::new(even)))
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let f = self.frequency;
        let sines = (f * p.x).sin() * (f * p.y).sin() * (f * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like grayscale from phase-shifted turbulence.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(rng: &mut dyn RngCore, scale: f32) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let turb = self.noise.turb(p, DEFAULT_TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + (self.scale * p.z + 10.0 * turb).sin())
    }
}

/// Texture backed by a decoded RGB8 image, sampled by nearest texel.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: RasterImage,
}

impl ImageTexture {
    pub fn new(image: RasterImage) -> Self {
        Self { image }
    }

    /// Load from disk. A file that can't be decoded yields a texture that
    /// renders as [`MISSING_TEXTURE_COLOR`] instead of failing the scene.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match RasterImage::load(path) {
            Ok(image) => Self::new(image),
            Err(err) => {
                log::warn!("Could not load image texture {}: {}", path.display(), err);
                Self::new(RasterImage::empty())
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.image.is_empty() {
            return MISSING_TEXTURE_COLOR;
        }

        // Image rows run top to bottom, v runs bottom to top
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.image.width as f32) as u32).min(self.image.width - 1);
        let j = ((v * self.image.height as f32) as u32).min(self.image.height - 1);

        let [r, g, b] = self.image.pixel(i, j);
        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WHITE: Color = Color::ONE;
    const BLACK: Color = Color::ZERO;

    #[test]
    fn test_solid_color_ignores_inputs() {
        let tex = SolidColor::from_rgb(0.2, 0.4, 0.6);
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.2, 0.4, 0.6));
        assert_eq!(tex.value(0.9, 0.1, Vec3::splat(-7.0)), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_checker_picks_by_sine_sign() {
        let tex = CheckerTexture::from_colors(BLACK, WHITE);
        let step = std::f32::consts::PI / 10.0;

        // All three sines positive
        let p = Vec3::splat(step * 0.5);
        assert_eq!(tex.value(0.0, 0.0, p), WHITE);

        // Flip one sine negative
        let p = Vec3::new(step * 1.5, step * 0.5, step * 0.5);
        assert_eq!(tex.value(0.0, 0.0, p), BLACK);

        // Two negatives cancel
        let p = Vec3::new(step * 1.5, step * 1.5, step * 0.5);
        assert_eq!(tex.value(0.0, 0.0, p), WHITE);
    }

    #[test]
    fn test_checker_frequency() {
        let tex = CheckerTexture::from_colors(BLACK, WHITE).with_frequency(1.0);
        assert_eq!(tex.value(0.0, 0.0, Vec3::splat(0.5)), WHITE);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(4.0, 0.5, 0.5)), BLACK);
    }

    #[test]
    fn test_noise_texture_in_unit_range() {
        let tex = NoiseTexture::new(&mut StdRng::seed_from_u64(3), 4.0);
        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.13, i as f32 * 0.07, i as f32 * -0.29);
            let c = tex.value(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }

    #[test]
    fn test_noise_texture_is_pure() {
        let tex = NoiseTexture::new(&mut StdRng::seed_from_u64(3), 4.0);
        assert_eq!(tex.scale(), 4.0);
        let p = Vec3::new(1.5, -0.25, 3.75);
        assert_eq!(tex.value(0.0, 0.0, p), tex.value(0.7, 0.2, p));
    }

    fn two_by_two() -> ImageTexture {
        // top row: red, green; bottom row: blue, white
        let data = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        ImageTexture::new(RasterImage::from_rgb8(2, 2, data).unwrap())
    }

    #[test]
    fn test_image_texture_flips_v() {
        let tex = two_by_two();
        assert_eq!(tex.value(0.1, 0.9, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.9, 0.9, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.1, 0.1, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(0.9, 0.1, Vec3::ZERO), Color::ONE);
    }

    #[test]
    fn test_image_texture_clamps_uv() {
        let tex = two_by_two();
        assert_eq!(tex.value(1.0, 1.0, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(5.0, -3.0, Vec3::ZERO), Color::ONE);
        assert_eq!(tex.value(-1.0, 0.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_missing_image_is_cyan() {
        let tex = ImageTexture::load("/definitely/not/here.png");
        assert_eq!(tex.width(), 0);
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE_COLOR);
    }
}
