//! Progressive accumulation of one jittered sample per pixel and per frame.
//!
//! The [ProgressiveRenderer] is either [AccumulationState::Accumulating], in which case the
//! next frame is blended into the running average, or [AccumulationState::Dirty], in which
//! case the next frame restarts the average from scratch.

use glam::{Mat4, Vec3};
use image::Rgb32FImage;
use rayon::prelude::*;

use crate::{
    buffer::{BufferLimits, GeometryBuffers},
    camera::{generate_camera_ray, pixel_to_uv},
    counter,
    integrators::{Integrator, MirrorIntegrator},
    renderer::{Light, World},
    sampler::{CenterSampler, Sampler, UniformSampler},
    scene::{
        mesh::{MeshRegistry, Renderable, RenderableHandle},
        SceneConfig, SceneT,
    },
    shape::{Plane, Sphere},
    skybox::Skybox,
    utils::{log_once::warn_once, timer::timed_scope_log},
    Error, Result, Seed,
};

/// Why the running average was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCause {
    Initial,
    CameraMoved,
    LightChanged,
    Resized,
    GeometryRebuilt,
    SceneReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulationState {
    /// The next frame starts a new average. Holds the first cause since the last frame
    Dirty(ResetCause),
    Accumulating,
}

/// What the host hands over every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub camera_to_world: Mat4,
    pub inverse_projection: Mat4,
    pub light: Light,
    /// (width, height) of the output
    pub resolution: (u32, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub seed: u64,
    pub max_bounces: u32,
    /// Once reached, frames return the converged image without tracing anything
    pub max_samples: Option<u32>,
    pub limits: BufferLimits,
    pub skybox_exposure: f32,
    /// Offset each sample randomly inside its pixel, instead of using the pixel center
    pub jitter: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_bounces: 8,
            max_samples: None,
            limits: BufferLimits::default(),
            skybox_exposure: 1.4,
            jitter: true,
        }
    }
}

impl RendererConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_bounces == 0 {
            return Err(Error::InvalidConfig(
                "at least one bounce is needed to see anything".to_owned(),
            ));
        }
        if self.max_samples == Some(0) {
            return Err(Error::InvalidConfig(
                "maximum sample count must be positive".to_owned(),
            ));
        }
        if !self.skybox_exposure.is_finite() || self.skybox_exposure < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "skybox exposure must be finite and non negative, got {}",
                self.skybox_exposure
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PreviousInputs {
    camera_to_world: Mat4,
    inverse_projection: Mat4,
    light: Light,
}

pub struct ProgressiveRenderer {
    config: RendererConfig,
    integrator: MirrorIntegrator,
    ground: Plane,
    skybox: Skybox,
    registry: MeshRegistry,
    geometry: GeometryBuffers,

    state: AccumulationState,
    sample_count: u32,
    /// Counts every dispatch since creation, never reset, so that the jitter differs
    /// between frames even across resets
    dispatch_index: u32,
    previous: Option<PreviousInputs>,

    sample: Rgb32FImage,
    converged: Rgb32FImage,
}

impl ProgressiveRenderer {
    pub fn new(config: RendererConfig, skybox: Skybox) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            integrator: MirrorIntegrator {
                max_bounces: config.max_bounces,
            },
            config,
            ground: Plane::ground(),
            skybox,
            registry: MeshRegistry::new(),
            geometry: GeometryBuffers::new(),
            state: AccumulationState::Dirty(ResetCause::Initial),
            sample_count: 0,
            dispatch_index: 0,
            previous: None,
            sample: Rgb32FImage::new(0, 0),
            converged: Rgb32FImage::new(0, 0),
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn state(&self) -> AccumulationState {
        self.state
    }

    /// Number of samples in the running average
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn max_samples(&self) -> Option<u32> {
        self.config.max_samples
    }

    /// Whether the sample budget is spent
    pub fn is_complete(&self) -> bool {
        self.state == AccumulationState::Accumulating
            && self
                .config
                .max_samples
                .is_some_and(|max| self.sample_count >= max)
    }

    pub fn converged(&self) -> &Rgb32FImage {
        &self.converged
    }

    /// The raw sample of the last dispatch
    pub fn last_sample(&self) -> &Rgb32FImage {
        &self.sample
    }

    pub fn geometry(&self) -> &GeometryBuffers {
        &self.geometry
    }

    pub fn registry(&self) -> &MeshRegistry {
        &self.registry
    }

    /// Throws the running average away before the next frame
    pub fn invalidate(&mut self, cause: ResetCause) {
        if self.state == AccumulationState::Accumulating {
            log::debug!("accumulation reset: {cause:?}");
            self.state = AccumulationState::Dirty(cause);
        }
    }

    pub fn reset_scene(&mut self, config: &SceneConfig) -> Result<()> {
        let spheres = config.build_spheres()?;
        self.replace_spheres(spheres)
    }

    pub fn register_renderable(&mut self, renderable: Renderable) -> Result<RenderableHandle> {
        let handle = self.registry.register(renderable)?;
        self.invalidate(ResetCause::GeometryRebuilt);
        Ok(handle)
    }

    pub fn unregister_renderable(&mut self, handle: RenderableHandle) -> Option<Renderable> {
        let renderable = self.registry.unregister(handle);
        self.invalidate(ResetCause::GeometryRebuilt);
        renderable
    }

    /// Traces one sample per pixel and folds it into the running average.
    ///
    /// On error, the running average and the geometry buffers are left as they were.
    pub fn render_frame(&mut self, inputs: &FrameInputs) -> Result<&Rgb32FImage> {
        let (width, height) = inputs.resolution;
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!(
                "output resolution must be positive, got {width}x{height}"
            )));
        }
        inputs.light.validate()?;

        if self.registry.is_dirty() {
            self.geometry
                .rebuild_meshes(&self.registry, &self.config.limits)?;
            self.registry.mark_clean();
            self.invalidate(ResetCause::GeometryRebuilt);
        }

        if self.sample.dimensions() != (width, height) {
            log::debug!("resizing accumulation images to {width}x{height}");
            self.sample = Rgb32FImage::new(width, height);
            self.converged = Rgb32FImage::new(width, height);
            self.invalidate(ResetCause::Resized);
        }

        let current = PreviousInputs {
            camera_to_world: inputs.camera_to_world,
            inverse_projection: inputs.inverse_projection,
            light: inputs.light,
        };
        if let Some(previous) = self.previous.replace(current) {
            if (previous.camera_to_world, previous.inverse_projection)
                != (current.camera_to_world, current.inverse_projection)
            {
                self.invalidate(ResetCause::CameraMoved);
            }
            if previous.light != current.light {
                self.invalidate(ResetCause::LightChanged);
            }
        }

        if self.is_complete() {
            return Ok(&self.converged);
        }

        if let AccumulationState::Dirty(cause) = self.state {
            log::debug!("restarting accumulation ({cause:?})");
            self.sample_count = 0;
        }

        self.dispatch(inputs);
        self.blend();

        self.sample_count = self.sample_count.saturating_add(1);
        self.dispatch_index = self.dispatch_index.wrapping_add(1);
        self.state = AccumulationState::Accumulating;
        log::trace!("accumulated {} samples", self.sample_count);

        Ok(&self.converged)
    }

    fn dispatch(&mut self, inputs: &FrameInputs) {
        let world = World {
            ground: self.ground,
            geometry: &self.geometry,
            light: inputs.light,
            skybox: &self.skybox,
            skybox_exposure: self.config.skybox_exposure,
        };
        let integrator = &self.integrator;
        let (width, height) = inputs.resolution;
        let seed = self.config.seed;
        let sample_idx = self.dispatch_index;
        let jitter = self.config.jitter;

        let trace_pixel = |x: u32, y: u32| -> Vec3 {
            let offset = if jitter {
                UniformSampler::new(Seed {
                    seed,
                    x,
                    y,
                    sample_idx,
                })
                .sample_2d()
            } else {
                CenterSampler.sample_2d()
            };

            let uv = pixel_to_uv(x, y, offset, width, height);
            let ray = generate_camera_ray(uv, inputs.camera_to_world, inputs.inverse_projection);
            let color = integrator.ray_cast(&world, ray).color;

            if color.is_finite() {
                color
            } else {
                warn_once!("non finite sample at pixel ({x}, {y}): {color}");
                Vec3::ZERO
            }
        };

        let sample = &mut self.sample;
        timed_scope_log("dispatch", || {
            sample
                .par_chunks_mut(3 * width as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
                        let color = trace_pixel(x as u32, y as u32);
                        pixel.copy_from_slice(&color.to_array());
                    }
                    counter!("camera rays", width);
                });
        });
        debug_assert_eq!(sample.height(), height);
    }

    fn blend(&mut self) {
        let sample: &[f32] = &self.sample;
        let converged: &mut [f32] = &mut self.converged;

        if self.sample_count == 0 {
            converged.copy_from_slice(sample);
            return;
        }

        let weight = 1.0 / (self.sample_count as f32 + 1.0);
        timed_scope_log("blend", || {
            converged
                .par_iter_mut()
                .zip(sample.par_iter())
                .for_each(|(c, s)| *c = *c * (1.0 - weight) + s * weight);
        });
    }
}

impl SceneT for ProgressiveRenderer {
    fn replace_spheres(&mut self, spheres: Vec<Sphere>) -> Result<()> {
        self.geometry.sync_spheres(&spheres)?;
        log::info!("scene reset with {} spheres", spheres.len());
        self.invalidate(ResetCause::SceneReset);
        Ok(())
    }

    fn register_renderable(&mut self, renderable: Renderable) -> Result<RenderableHandle> {
        ProgressiveRenderer::register_renderable(self, renderable)
    }
}
