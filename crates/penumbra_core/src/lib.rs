//! Penumbra Core - renderer-agnostic I/O and configuration.
//!
//! This crate provides:
//!
//! - **Raster images**: decoding texture images into 8-bit RGB buffers
//! - **PPM output**: the plain-text `P3` writer used for final frames
//! - **Settings**: serde-backed render settings loaded from JSON
//!
//! # Example
//!
//! ```ignore
//! use penumbra_core::{RenderSettings, write_ppm};
//!
//! let settings = RenderSettings::from_json_file("render.json")?;
//! println!("{}x{} @ {} spp",
//!     settings.width,
//!     settings.image_height(),
//!     settings.samples_per_pixel);
//! ```

pub mod ppm;
pub mod raster;
pub mod settings;

// Re-export commonly used types
pub use ppm::{save_ppm, write_ppm};
pub use raster::{RasterError, RasterImage, RasterResult};
pub use settings::{RenderSettings, SettingsError, SettingsResult};
