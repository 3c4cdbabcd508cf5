//! Render settings shared between the CLI and the renderer.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Image and sampling settings for one render.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Width / height
    pub aspect_ratio: f32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
    /// Seed for per-bucket random generators
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 400,
            aspect_ratio: 16.0 / 9.0,
            samples_per_pixel: 100,
            max_depth: 50,
            bucket_size: 64,
            seed: 0,
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON string.
    pub fn from_json_str(json: &str) -> SettingsResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Image height derived from width and aspect ratio (at least 1).
    pub fn image_height(&self) -> u32 {
        ((self.width as f32 / self.aspect_ratio) as u32).max(1)
    }

    /// Reject settings the renderer cannot work with.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.width == 0 {
            return Err(SettingsError::Invalid("width must be positive".into()));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(SettingsError::Invalid("samples_per_pixel must be positive".into()));
        }
        if self.bucket_size == 0 {
            return Err(SettingsError::Invalid("bucket_size must be positive".into()));
        }
        Ok(())
    }
}
