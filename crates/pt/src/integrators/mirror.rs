use glam::Vec3;

use crate::{
    counter,
    math::vec::ReflVecExt,
    ray::{Ray, RayHit},
    renderer::World,
    utils::timer::timed_scope_accumulate,
};

use super::{Integrator, RayResult};

/// Offset along the normal applied to every secondary ray origin
pub const SURFACE_BIAS: f32 = 0.001;

/// Contribution of one path vertex, not yet weighted by the energy of the incoming ray.
///
/// On a miss the ray is terminated (zero energy) and the sky is returned. On a hit, the ray
/// becomes its perfect mirror reflection, attenuated by the specular color, and the direct
/// light reaching the hit point is returned.
pub fn shade(ray: &mut Ray, hit: &RayHit, world: &World) -> Vec3 {
    if hit.is_miss() {
        ray.energy = Vec3::ZERO;
        return world.sky(ray.direction);
    }

    let origin = hit.position + hit.normal * SURFACE_BIAS;
    let energy = ray.energy * hit.specular;
    *ray = Ray {
        energy,
        ..Ray::new(origin, ray.direction.reflect(hit.normal))
    };

    let to_light = world.light.to_light();
    let cos_theta = hit.normal.dot(to_light).max(0.0);
    if cos_theta == 0.0 || hit.albedo == Vec3::ZERO {
        return Vec3::ZERO;
    }

    counter!("shadow rays");
    let shadow_ray = Ray::new(origin, to_light);
    if timed_scope_accumulate!("shadow rays time", || world.occluded(&shadow_ray)) {
        return Vec3::ZERO;
    }

    cos_theta * world.light.intensity * hit.albedo
}

/// Follows the mirror reflection of the camera ray until it escapes, runs out of energy or
/// reaches `max_bounces`
pub struct MirrorIntegrator {
    pub max_bounces: u32,
}

impl Default for MirrorIntegrator {
    fn default() -> Self {
        Self { max_bounces: 8 }
    }
}

impl Integrator for MirrorIntegrator {
    fn ray_cast(&self, world: &World, mut ray: Ray) -> RayResult {
        let mut result = RayResult::default();

        for _ in 0..self.max_bounces {
            let hit = world.trace_closest(&ray);
            let energy = ray.energy;
            result.color += energy * shade(&mut ray, &hit, world);
            result.bounces += 1;

            if ray.is_exhausted() {
                break;
            }
        }

        counter!("bounces", result.bounces);
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        buffer::GeometryBuffers,
        renderer::Light,
        shape::{Plane, Sphere},
        skybox::Skybox,
    };

    use super::*;

    fn world<'a>(geometry: &'a GeometryBuffers, skybox: &'a Skybox) -> World<'a> {
        World {
            ground: Plane::ground(),
            geometry,
            light: Light {
                direction: Vec3::NEG_Y,
                intensity: 2.0,
            },
            skybox,
            skybox_exposure: 1.4,
        }
    }

    #[test]
    fn miss_returns_exposed_sky_and_terminates() {
        let geometry = GeometryBuffers::new();
        let skybox = Skybox::uniform(Vec3::splat(0.5));
        let world = world(&geometry, &skybox);

        let mut ray = Ray::new(Vec3::Y, Vec3::Y);
        let color = shade(&mut ray, &RayHit::MISS, &world);
        assert!(color.distance(Vec3::splat(0.7)) < 1e-6);
        assert!(ray.is_exhausted());
    }

    #[test]
    fn ground_hit_lit_from_above() {
        let geometry = GeometryBuffers::new();
        let skybox = Skybox::uniform(Vec3::ZERO);
        let world = world(&geometry, &skybox);

        let mut ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, -1.0));
        let hit = world.trace_closest(&ray);
        let color = shade(&mut ray, &hit, &world);

        assert!(color.distance(Plane::GROUND_ALBEDO * 2.0) < 1e-5);
        assert!((ray.origin.y - SURFACE_BIAS).abs() < 1e-6);
        assert!(ray.direction.distance(Vec3::new(0.0, 1.0, -1.0).normalize()) < 1e-5);
        assert_eq!(ray.energy, Plane::GROUND_SPECULAR);
    }

    #[test]
    fn shadowed_ground_gets_no_direct_light() {
        let mut geometry = GeometryBuffers::new();
        geometry
            .sync_spheres(&[Sphere {
                position: Vec3::new(0.0, 5.0, 0.0),
                radius: 1.0,
                ..Default::default()
            }])
            .unwrap();
        let skybox = Skybox::uniform(Vec3::ZERO);
        let world = world(&geometry, &skybox);

        let mut ray = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        let hit = world.trace_closest(&ray);
        assert_eq!(shade(&mut ray, &hit, &world), Vec3::ZERO);

        #[cfg(feature = "counter")]
        {
            let counters = crate::utils::counter::snapshot();
            assert!(counters.iter().any(|(name, _)| *name == "shadow rays time"));
        }
    }

    #[test]
    fn energy_never_grows() {
        // Two facing mirror spheres keep the ray bouncing until the budget is spent
        let mirror = Sphere {
            radius: 1.0,
            albedo: Vec3::splat(0.2),
            specular: Vec3::new(0.9, 0.5, 1.0),
            ..Default::default()
        };
        let mut geometry = GeometryBuffers::new();
        geometry
            .sync_spheres(&[
                Sphere {
                    position: Vec3::new(-2.0, 3.0, 0.0),
                    ..mirror
                },
                Sphere {
                    position: Vec3::new(2.0, 3.0, 0.0),
                    ..mirror
                },
            ])
            .unwrap();
        let skybox = Skybox::uniform(Vec3::ONE);
        let world = world(&geometry, &skybox);

        let mut ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::X);
        let mut previous = ray.energy;
        for _ in 0..8 {
            let hit = world.trace_closest(&ray);
            shade(&mut ray, &hit, &world);
            assert!(ray.energy.cmple(previous).all());
            previous = ray.energy;
        }

        let result = MirrorIntegrator::default().ray_cast(&world, Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::X));
        assert_eq!(result.bounces, 8);
        assert!(result.color.is_finite());
    }

    #[test]
    fn bounce_loop_stops_on_sky() {
        let geometry = GeometryBuffers::new();
        let skybox = Skybox::uniform(Vec3::ONE);
        let world = world(&geometry, &skybox);

        let result = MirrorIntegrator::default().ray_cast(&world, Ray::new(Vec3::Y, Vec3::Y));
        assert_eq!(result.bounces, 1);
        assert!(result.color.distance(Vec3::splat(1.4)) < 1e-6);

        // Ground, then sky through the reflection
        let result = MirrorIntegrator::default()
            .ray_cast(&world, Ray::new(Vec3::Y, Vec3::new(0.0, -1.0, -1.0)));
        assert_eq!(result.bounces, 2);
    }

    #[test]
    fn zero_specular_stops_after_one_bounce() {
        let mut geometry = GeometryBuffers::new();
        geometry
            .sync_spheres(&[Sphere {
                position: Vec3::new(0.0, 1.0, -5.0),
                radius: 1.0,
                albedo: Vec3::ONE,
                specular: Vec3::ZERO,
                ..Default::default()
            }])
            .unwrap();
        let skybox = Skybox::uniform(Vec3::ONE);
        let world = world(&geometry, &skybox);

        let result = MirrorIntegrator::default().ray_cast(&world, Ray::new(Vec3::Y, Vec3::NEG_Z));
        assert_eq!(result.bounces, 1);
    }
}
