//! A progressive mirror path tracer.
//!
//! The crate renders a ground plane, analytic spheres and registered triangle meshes.
//! Each call to [accumulation::ProgressiveRenderer::render_frame] traces one jittered
//! sample per pixel and folds it into a running average, which is reset whenever the
//! camera, the light, the resolution or the geometry changes.

pub mod accumulation;
pub mod buffer;
pub mod camera;
pub mod color;
pub mod error;
pub mod integrators;
pub mod loader;
pub mod math;
pub mod ray;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod shape;
pub mod skybox;
pub mod utils;

pub use error::{Error, Result};
pub use rand_xoshiro::Xoshiro256StarStar as Rng;

/// Everything that identifies one stream of random numbers for a pixel.
///
/// Given a seed, the rendering is deterministic: the jitter of a pixel only depends on
/// `x`, `y`, `sample_idx` and `seed`.
#[derive(Debug, Copy, Clone, Hash)]
#[repr(C)]
pub struct Seed {
    pub seed: u64,
    pub x: u32,
    pub y: u32,
    pub sample_idx: u32,
}

impl Seed {
    pub fn into_rng(self) -> Rng {
        let mut hasher = std::hash::DefaultHasher::new();
        std::hash::Hash::hash(&self, &mut hasher);
        <Rng as rand::SeedableRng>::seed_from_u64(std::hash::Hasher::finish(&hasher))
    }
}
