use glam::Vec3;

use crate::{ray::Ray, renderer::World};

mod mirror;

pub use mirror::{shade, MirrorIntegrator, SURFACE_BIAS};

/// What a single camera ray brought back
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayResult {
    pub color: Vec3,
    /// Number of surfaces or sky lookups that contributed
    pub bounces: u32,
}

pub trait Integrator: Send + Sync {
    fn ray_cast(&self, world: &World, ray: Ray) -> RayResult;
}
