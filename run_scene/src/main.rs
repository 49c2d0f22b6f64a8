use std::error::Error;

use clap::Parser;

mod cli;

use cli::Args;

fn init_logger(level: log::LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    init_logger(args.log_level);

    let scene = args.load_scene()?;

    rayfan_glium::run_scene(scene)?;

    Ok(())
}
