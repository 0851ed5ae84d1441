pub mod mesh;
pub mod presets;

use std::ops::RangeInclusive;

use glam::Vec3;
use rand::{distributions::Uniform, prelude::Distribution, SeedableRng};

use crate::{
    color::random_hsv,
    math::distributions::UniformUnitBall2,
    shape::Sphere,
    Error, Result, Rng,
};

use self::mesh::{Renderable, RenderableHandle};

/// Anything spheres and meshes can be put into
pub trait SceneT {
    /// Replaces the spheres wholesale
    fn replace_spheres(&mut self, spheres: Vec<Sphere>) -> Result<()>;

    fn register_renderable(&mut self, renderable: Renderable) -> Result<RenderableHandle>;
}

/// Parameters of the random sphere field
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub sphere_count: u32,
    pub radius_range: RangeInclusive<f32>,
    /// Radius of the disk, centered on the origin, in which sphere centers are placed
    pub placement_radius: f32,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sphere_count: 100,
            radius_range: 1.0..=2.0,
            placement_radius: 30.0,
            seed: 0,
        }
    }
}

impl SceneConfig {
    /// Out of domain values are rejected, never clamped
    pub fn validate(&self) -> Result<()> {
        let (radius_min, radius_max) = (*self.radius_range.start(), *self.radius_range.end());

        if !radius_min.is_finite() || !radius_max.is_finite() || !self.placement_radius.is_finite()
        {
            return Err(Error::InvalidConfig(format!(
                "scene values must be finite (radius range {radius_min}..={radius_max}, placement radius {})",
                self.placement_radius
            )));
        }
        if radius_min > radius_max {
            return Err(Error::InvalidConfig(format!(
                "minimum sphere radius {radius_min} is greater than maximum sphere radius {radius_max}"
            )));
        }
        if radius_min <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "sphere radius must be positive, got {radius_min}"
            )));
        }
        if self.placement_radius <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "placement radius must be positive, got {}",
                self.placement_radius
            )));
        }
        Ok(())
    }

    pub fn build_spheres(&self) -> Result<Vec<Sphere>> {
        build_random_spheres(
            self.seed,
            self.sphere_count,
            self.radius_range.clone(),
            self.placement_radius,
        )
    }
}

const EMISSIVE_PROBABILITY: f32 = 0.2;
const METAL_PROBABILITY: f32 = 0.4;
const DIELECTRIC_SPECULAR: Vec3 = Vec3::splat(0.04);

/// Scatters up to `count` non overlapping spheres resting on the ground.
///
/// Candidates overlapping an already accepted sphere are dropped, not retried, so fewer
/// than `count` spheres may be returned. The output only depends on the arguments.
pub fn build_random_spheres(
    seed: u64,
    count: u32,
    radius_range: RangeInclusive<f32>,
    placement_radius: f32,
) -> Result<Vec<Sphere>> {
    let config = SceneConfig {
        sphere_count: count,
        radius_range: radius_range.clone(),
        placement_radius,
        seed,
    };
    config.validate()?;

    let mut rng = Rng::seed_from_u64(seed);
    let radius_distribution = Uniform::from(radius_range);
    let unit = Uniform::new(0.0f32, 1.0);

    let mut spheres: Vec<Sphere> = Vec::with_capacity(count as usize);
    let mut rejected = 0;
    for _ in 0..count {
        let radius = radius_distribution.sample(&mut rng);
        let [x, z] = UniformUnitBall2.sample(&mut rng);
        let candidate = Sphere {
            position: Vec3::new(x * placement_radius, radius, z * placement_radius),
            radius,
            ..Default::default()
        };

        if spheres.iter().any(|other| other.overlaps(&candidate)) {
            rejected += 1;
            continue;
        }

        let color = random_hsv(&mut rng, 0.0..1.0);
        let emissive = unit.sample(&mut rng) < EMISSIVE_PROBABILITY;
        let metal = unit.sample(&mut rng) < METAL_PROBABILITY;

        let (albedo, specular, emission) = if emissive {
            (Vec3::ZERO, Vec3::ZERO, random_hsv(&mut rng, 3.0..8.0))
        } else if metal {
            (Vec3::ZERO, color, Vec3::ZERO)
        } else {
            (color, DIELECTRIC_SPECULAR, Vec3::ZERO)
        };

        spheres.push(Sphere {
            albedo,
            specular,
            emission,
            smoothness: unit.sample(&mut rng),
            ..candidate
        });
    }

    log::info!(
        "built {} spheres ({rejected} overlapping candidates rejected)",
        spheres.len()
    );
    Ok(spheres)
}
