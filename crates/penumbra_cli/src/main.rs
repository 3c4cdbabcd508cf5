//! penumbra: render a built-in scene to a PPM file.

mod cli;
mod scenes;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use penumbra_core::{save_ppm, RenderSettings};
use penumbra_renderer::{render, BvhNode, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting penumbra");

    let mut settings = match &args.config {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };
    args.apply_overrides(&mut settings);

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let scene = scenes::build(args.scene, &args.earth_texture, &mut rng)?;

    if let Some(aspect_ratio) = scene.aspect_ratio {
        log::info!("Scene {:?} is framed at aspect ratio {}", args.scene, aspect_ratio);
        settings.aspect_ratio = aspect_ratio;
    }
    settings.validate().context("Invalid render settings")?;

    let width = settings.width;
    let height = settings.image_height();

    let mut camera = scene.camera.with_resolution(width, height);
    camera.initialize();

    let (time0, time1) = camera.shutter();
    let build_start = Instant::now();
    let world = BvhNode::from_list(&scene.world, time0, time1, &mut rng)
        .context("Failed to build BVH")?;
    log::info!("BVH built in {:.2}s", build_start.elapsed().as_secs_f32());

    let config = RenderConfig::from_settings(&settings).with_background(scene.background);
    let image = render(&camera, &world, &config)?;

    save_ppm(&args.output, width, height, &image.to_rgb8())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Wrote {}x{} image to {}", width, height, args.output.display());
    Ok(())
}
