use anyhow::{Context, Result};
use clap::Parser;
use lux_renderer::{render, RenderConfig};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let scene = lux_core::load_scene(&args.scene_file)
        .with_context(|| format!("failed to load scene {}", args.scene_file))?;

    let config = RenderConfig::default()
        .with_resolution(args.width, args.height)
        .with_seed(args.seed);

    let image = render(&scene, &config).context("render failed")?;

    image
        .save(&args.output_image)
        .with_context(|| format!("failed to save {}", args.output_image))?;

    Ok(())
}
