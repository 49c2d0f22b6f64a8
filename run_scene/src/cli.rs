use std::{error::Error, path::PathBuf};

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rayfan::{FanParams, Float, Scene};

/// Built-in scenes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// One mirror, 12 rays
    #[default]
    Single,
    /// Two mirrors, 10 rays
    Double,
}

impl Preset {
    pub fn scene(self) -> Scene {
        match self {
            Self::Single => Scene::single_mirror(),
            Self::Double => Scene::double_mirror(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "run_scene")]
#[command(about = "Move a ray emitter up and down and watch its rays bounce off mirrors")]
pub struct Args {
    /// JSON scene file, see `gen_rand_scene` for a way to make one
    #[arg(conflicts_with = "preset")]
    pub scene: Option<PathBuf>,

    /// Built-in scene to run when no file is given
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Number of rays in the fan
    #[arg(long)]
    pub rays: Option<usize>,

    /// Angle covered by the fan, in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub span: Option<Float>,

    /// Emitter speed, in units per second
    #[arg(long)]
    pub speed: Option<Float>,

    /// Set the logging level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Args {
    /// The scene to run: the given file, or else the chosen preset, with
    /// the command line overrides applied.
    pub fn load_scene(&self) -> Result<Scene, Box<dyn Error>> {
        let mut scene = match &self.scene {
            Some(path) => rayfan_json::load_scene(path)?,
            None => {
                let preset = self.preset.unwrap_or_default();
                let scene = preset.scene();

                log::info!(
                    "using the {preset:?} preset {:?}: {} mirror(s), {} ray(s) over {}°",
                    scene.title,
                    scene.mirrors.len(),
                    scene.fan.ray_count,
                    scene.fan.span_degrees,
                );

                scene
            }
        };

        self.apply_overrides(&mut scene)?;

        Ok(scene)
    }

    /// Applies the command line overrides to `scene`.
    pub fn apply_overrides(&self, scene: &mut Scene) -> Result<(), String> {
        if let Some(ray_count) = self.rays {
            if ray_count > FanParams::MAX_RAY_COUNT {
                return Err(format!(
                    "--rays must be at most {}, got {ray_count}",
                    FanParams::MAX_RAY_COUNT,
                ));
            }
            scene.fan.ray_count = ray_count;
        }

        if let Some(span) = self.span {
            if !span.is_finite() {
                return Err(format!("--span must be finite, got {span}"));
            }
            scene.fan.span_degrees = span;
        }

        if let Some(speed) = self.speed {
            if !(speed.is_finite() && speed >= 0.) {
                return Err(format!("--speed must be a non-negative number, got {speed}"));
            }
            scene.emitter.speed = speed;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("run_scene").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_no_scene() {
        let args = parse(&[]).unwrap();
        assert!(args.scene.is_none());
        assert!(args.preset.is_none());
        assert_eq!(args.log_level, LevelFilter::Info);
    }

    #[test]
    fn log_level_is_parsed() {
        assert_eq!(parse(&["--log-level", "debug"]).unwrap().log_level, LevelFilter::Debug);
        assert_eq!(parse(&["--log-level", "off"]).unwrap().log_level, LevelFilter::Off);
        assert!(parse(&["--log-level", "loud"]).is_err());
    }

    #[test]
    fn preset_is_loaded_with_overrides() {
        let scene = parse(&["--preset", "double", "--rays", "4"])
            .unwrap()
            .load_scene()
            .unwrap();

        assert_eq!(scene.title, Scene::double_mirror().title);
        assert_eq!(scene.fan.ray_count, 4);

        let scene = parse(&[]).unwrap().load_scene().unwrap();
        assert_eq!(scene, Scene::single_mirror());
    }

    #[test]
    fn too_many_rays_are_rejected() {
        let too_many = (FanParams::MAX_RAY_COUNT + 1).to_string();
        let args = parse(&["--rays", &too_many]).unwrap();
        let mut scene = Scene::default();

        assert!(args.apply_overrides(&mut scene).is_err());
        assert_eq!(scene.fan.ray_count, 12);

        let max = FanParams::MAX_RAY_COUNT.to_string();
        let args = parse(&["--rays", &max]).unwrap();
        args.apply_overrides(&mut scene).unwrap();
        assert_eq!(scene.fan.ray_count, FanParams::MAX_RAY_COUNT);
    }

    #[test]
    fn preset_and_file_conflict() {
        assert!(parse(&["scene.json", "--preset", "double"]).is_err());
    }

    #[test]
    fn overrides_are_applied() {
        let args = parse(&["--preset", "double", "--rays", "3", "--span", "45", "--speed", "10"])
            .unwrap();
        assert_eq!(args.preset, Some(Preset::Double));

        let mut scene = args.preset.unwrap_or_default().scene();
        args.apply_overrides(&mut scene).unwrap();

        assert_eq!(scene.fan.ray_count, 3);
        assert_eq!(scene.fan.span_degrees, 45.);
        assert_eq!(scene.emitter.speed, 10.);
        assert_eq!(scene.mirrors.len(), 2);
    }

    #[test]
    fn negative_speed_is_rejected() {
        let args = parse(&["--speed=-1"]).unwrap();
        let mut scene = Scene::default();
        assert!(args.apply_overrides(&mut scene).is_err());
        assert_eq!(scene.emitter.speed, 300.);
    }
}
