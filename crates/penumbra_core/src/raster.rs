//! Raster image loading for image-mapped textures.
//!
//! Images are decoded once into a packed 8-bit RGB buffer and are read-only
//! afterwards, so a single raster can back any number of textures.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading a raster image.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type RasterResult<T> = Result<T, RasterError>;

/// Bytes per pixel in a decoded raster.
pub const BYTES_PER_PIXEL: usize = 3;

/// A decoded 3-channel image.
///
/// Pixels are stored row-major from the top scanline, `[R, G, B]` per pixel,
/// exactly as found in the file (no color-space conversion).
#[derive(Clone, Debug, Default)]
pub struct RasterImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap an existing RGB byte buffer.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> RasterResult<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(RasterError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A zero-size raster. Texture lookups on it fall back to a debug color.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode an image file into RGB.
    pub fn load(path: impl AsRef<Path>) -> RasterResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| RasterError::Open {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        log::debug!(
            "Loaded raster: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            rgb.as_raw().len() as f32 / 1024.0
        );

        Self::from_rgb8(width, height, rgb.into_raw())
    }

    /// True if the raster holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get pixel at integer coordinates, (0, 0) being the top-left corner.
    ///
    /// Out-of-range coordinates are clamped to the nearest edge pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if self.is_empty() {
            return [0, 0, 0];
        }

        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> RasterImage {
        #[rustfmt::skip]
        let data = vec![
            255, 0, 0,    0, 255, 0,
            0, 0, 255,    255, 255, 255,
        ];
        RasterImage::from_rgb8(2, 2, data).unwrap()
    }

    #[test]
    fn test_pixel_lookup_row_major() {
        let raster = two_by_two();

        assert_eq!(raster.pixel(0, 0), [255, 0, 0]);
        assert_eq!(raster.pixel(1, 0), [0, 255, 0]);
        assert_eq!(raster.pixel(0, 1), [0, 0, 255]);
        assert_eq!(raster.pixel(1, 1), [255, 255, 255]);
    }

    #[test]
    fn test_pixel_lookup_clamps() {
        let raster = two_by_two();
        assert_eq!(raster.pixel(9, 9), [255, 255, 255]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = RasterImage::from_rgb8(2, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(err, RasterError::SizeMismatch { expected: 12, actual: 5, .. }));
    }

    #[test]
    fn test_empty_raster() {
        let raster = RasterImage::empty();
        assert!(raster.is_empty());
        assert_eq!(raster.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = RasterImage::load("definitely/not/here.png").unwrap_err();
        assert!(err.to_string().contains("definitely/not/here.png"));
    }

    #[test]
    fn test_load_round_trips_png() {
        let path = std::env::temp_dir().join("penumbra_raster_test.png");
        let img = image::RgbImage::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
        img.save(&path).unwrap();

        let raster = RasterImage::load(&path).unwrap();
        assert_eq!((raster.width, raster.height), (2, 1));
        assert_eq!(raster.pixel(1, 0), [40, 50, 60]);

        let _ = std::fs::remove_file(path);
    }
}
