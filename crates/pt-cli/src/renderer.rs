use anyhow::{Context, Result};
use glam::Mat4;
use pt::{
    accumulation::{FrameInputs, ProgressiveRenderer, RendererConfig},
    camera::Camera,
    loader::ObjLoaderExt,
    renderer::Light,
    scene::{mesh::RenderableHandle, SceneConfig},
    skybox::Skybox,
    utils::{
        counter,
        timer::{format_elapsed, timed_scope},
    },
};

use crate::{
    output::{FileOutput, FinalOutput},
    progress::PercentBar,
    utils::Dimensions,
    Args,
};

pub struct Renderer {
    pub dimensions: Dimensions,
    pub frames: u32,
    pub camera: Camera,
    pub light: Light,
    /// Camera rotation around its target between two frames, in radians
    pub orbit: f32,
    pub progressive: ProgressiveRenderer,
    /// Every mesh registered into `progressive`, scene meshes first
    pub meshes: Vec<RenderableHandle>,
    pub outputs: Vec<Box<dyn FinalOutput>>,
}

impl Renderer {
    pub fn from_args(args: Args) -> Result<Self> {
        let skybox = match args.skybox {
            Some(ref path) => {
                log::info!("loading skybox {}", path.display());
                Skybox::load(path)
                    .with_context(|| format!("loading skybox {}", path.display()))?
            }
            None => Skybox::default(),
        };

        let config = RendererConfig {
            seed: args.seed,
            max_bounces: args.max_bounces,
            ..Default::default()
        };
        let mut progressive = ProgressiveRenderer::new(config, skybox)?;

        let scene_config = SceneConfig {
            sphere_count: args.spheres,
            radius_range: args.radius_min..=args.radius_max,
            placement_radius: args.placement_radius,
            seed: args.seed,
        };
        log::info!("loading scene {:?}", args.scene);
        let mut meshes = args.scene.insert_into(&mut progressive, &scene_config)?;

        for path in &args.mesh {
            log::info!("loading mesh {}", path.display());
            meshes.extend(
                progressive
                    .load_obj(path, Mat4::IDENTITY)
                    .with_context(|| format!("loading mesh {}", path.display()))?,
            );
        }

        let camera = Camera {
            vfov: args.fov.to_radians(),
            ..Default::default()
        };
        camera.validate()?;

        let light = Light::from_angles(
            args.light_pitch.to_radians(),
            args.light_yaw.to_radians(),
            args.light_intensity,
        );
        light.validate()?;

        Ok(Self {
            dimensions: args.dimensions,
            frames: args.frames,
            camera,
            light,
            orbit: args.orbit.to_radians(),
            progressive,
            meshes,
            outputs: vec![Box::new(FileOutput::new(args.output))],
        })
    }

    fn frame_inputs(&self) -> FrameInputs {
        let Dimensions { width, height } = self.dimensions;
        FrameInputs {
            camera_to_world: self.camera.camera_to_world(),
            inverse_projection: self.camera.inverse_projection(width, height),
            light: self.light,
            resolution: (width, height),
        }
    }

    pub fn run(mut self) -> Result<()> {
        log::info!(
            "rendering {} frames at {} with {} meshes",
            self.frames,
            self.dimensions,
            self.meshes.len()
        );

        let res = timed_scope(|| -> Result<()> {
            for frame in 0..self.frames {
                if frame > 0 && self.orbit != 0.0 {
                    self.camera.orbit(self.orbit);
                }
                let inputs = self.frame_inputs();
                self.progressive.render_frame(&inputs)?;
                PercentBar::new(frame + 1, self.frames, 50).print();
            }
            println!();
            Ok(())
        });
        res.res?;
        log::info!(
            "rendered {} frames in {}, {} samples in the final image",
            self.frames,
            format_elapsed(res.elapsed),
            self.progressive.sample_count()
        );

        for output in &self.outputs {
            output.commit(self.progressive.converged())?;
        }

        counter::report_counters();
        Ok(())
    }
}
