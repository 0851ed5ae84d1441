use glam::Vec2;
use rand::{distributions::Uniform, prelude::Distribution};

use crate::Seed;

/// Sub-pixel offsets, in [0, 1(²
pub trait Sampler {
    fn sample_2d(&mut self) -> Vec2;
}

/// Always the center of the pixel
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterSampler;

impl Sampler for CenterSampler {
    fn sample_2d(&mut self) -> Vec2 {
        Vec2::splat(0.5)
    }
}

/// Uniform offsets, a pure function of the [Seed]
#[derive(Clone)]
pub struct UniformSampler {
    rng: crate::Rng,
    uniform: Uniform<f32>,
}

impl UniformSampler {
    pub fn new(seed: Seed) -> Self {
        Self {
            rng: seed.into_rng(),
            uniform: Uniform::new(0., 1.),
        }
    }
}

impl Sampler for UniformSampler {
    fn sample_2d(&mut self) -> Vec2 {
        Vec2 {
            x: self.uniform.sample(&mut self.rng),
            y: self.uniform.sample(&mut self.rng),
        }
    }
}
