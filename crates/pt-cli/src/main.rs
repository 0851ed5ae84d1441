mod output;
mod progress;
mod renderer;
mod utils;

use std::path::PathBuf;

use clap::Parser;
use renderer::Renderer;
use utils::{AvailableScene, Dimensions};

#[derive(Parser, Debug)]
pub struct Args {
    #[arg(short, long, default_value = "800x600")]
    /// Screen dimension in format `width`x`height`
    dimensions: Dimensions,

    #[arg(short, long, default_value_t = 64, value_parser = clap::value_parser!(u32).range(1..))]
    /// Number of frames to accumulate, one sample per pixel each
    frames: u32,

    #[arg(long, default_value_t)]
    /// Seed to use for all the random stuff.
    /// Given a seed, the rendering is deterministic.
    seed: u64,

    #[arg(long, value_enum, default_value_t)]
    /// Scene selector
    scene: AvailableScene,

    #[arg(long, default_value_t = 100)]
    /// Number of sphere candidates of the random scene
    spheres: u32,

    #[arg(long, default_value_t = 1.0)]
    radius_min: f32,

    #[arg(long, default_value_t = 2.0)]
    radius_max: f32,

    #[arg(long, default_value_t = 30.0)]
    /// Radius of the disk sphere centers are placed in
    placement_radius: f32,

    #[arg(long, default_value_t = 8)]
    max_bounces: u32,

    #[arg(long)]
    /// Equirectangular environment map, a gradient is used when missing
    skybox: Option<PathBuf>,

    #[arg(short, long)]
    /// OBJ file to add to the scene, can be repeated
    mesh: Vec<PathBuf>,

    #[arg(long, default_value_t = 50.0)]
    /// Angle of the light below the horizon, in degrees
    light_pitch: f32,

    #[arg(long, default_value_t = 30.0)]
    /// Rotation of the light around the vertical axis, in degrees
    light_yaw: f32,

    #[arg(long, default_value_t = 1.0)]
    light_intensity: f32,

    #[arg(long, default_value_t = 60.0)]
    /// Vertical field of view, in degrees
    fov: f32,

    #[arg(long, default_value_t = 0.0)]
    /// Camera rotation around its target between two frames, in degrees.
    /// Any non zero value restarts the accumulation every frame
    orbit: f32,

    #[arg(short, long, default_value = "output")]
    /// Directory receiving color.exr and color.png
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let renderer = Renderer::from_args(args)?;
    renderer.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["pt-cli"]);
        assert_eq!(args.dimensions.to_string(), "800x600");
        assert_eq!(args.frames, 64);
        assert_eq!(args.scene, AvailableScene::Random);
        assert!(args.mesh.is_empty());

        let args = Args::parse_from(["pt-cli", "--scene", "mirror-box", "-m", "a.obj", "-m", "b.obj"]);
        assert_eq!(args.scene, AvailableScene::MirrorBox);
        assert_eq!(args.mesh.len(), 2);
    }

    #[test]
    fn zero_frames_is_rejected() {
        let err = Args::try_parse_from(["pt-cli", "--frames", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert_eq!(Args::try_parse_from(["pt-cli", "-f", "1"]).unwrap().frames, 1);
    }
}
