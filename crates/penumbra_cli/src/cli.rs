//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use penumbra_core::RenderSettings;

/// Log levels accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    RandomSpheres,
    TwoSpheres,
    TwoPerlinSpheres,
    Earth,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    Final,
}

#[derive(Debug, Parser)]
#[command(name = "penumbra")]
#[command(about = "A CPU path tracer that renders built-in scenes to PPM")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "random-spheres")]
    pub scene: SceneKind,

    /// JSON render settings; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bucket edge length in pixels
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Image used by the earth and final scenes
    #[arg(long, default_value = "earthmap.jpg")]
    pub earth_texture: PathBuf,

    /// Output file (plain PPM)
    #[arg(short, long, default_value = "image.ppm")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Overlay any flags the user passed onto `settings`.
    pub fn apply_overrides(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            settings.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(bucket_size) = self.bucket_size {
            settings.bucket_size = bucket_size;
        }
    }
}
