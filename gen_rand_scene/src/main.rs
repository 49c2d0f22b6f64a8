use std::{error::Error, path::PathBuf};

use clap::Parser;
use log::LevelFilter;
use rayfan::{Scene, Viewport};
use rayfan_random::{
    rand::{rngs::StdRng, SeedableRng},
    random_scene, Random,
};

#[derive(Debug, Parser)]
#[command(name = "gen_rand_scene")]
#[command(about = "Write a scene with randomly placed mirrors to a JSON file")]
struct Args {
    /// Where to write the scene
    path: PathBuf,

    /// Number of mirrors, random (1 to 8) if not given
    #[arg(long)]
    mirrors: Option<usize>,

    /// Seed for reproducible scenes
    #[arg(long)]
    seed: Option<u64>,

    /// Set the logging level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn generate(args: &Args) -> Scene {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let viewport = Viewport::default();

    match args.mirrors {
        Some(n) => random_scene(&mut rng, &viewport, n),
        None => Scene::random(&mut rng, &viewport),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level)
        .init();

    let scene = generate(&args);

    rayfan_json::save_scene(&args.path, &scene)?;

    log::info!(
        "wrote {} mirror(s), {} ray(s) over {:.1}° to {}",
        scene.mirrors.len(),
        scene.fan.ray_count,
        scene.fan.span_degrees,
        args.path.display(),
    );

    Ok(())
}
