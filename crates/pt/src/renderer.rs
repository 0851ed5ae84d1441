use glam::Vec3;

use crate::{
    buffer::GeometryBuffers,
    math::vec::Vec3AsNonZero,
    ray::{Ray, RayHit},
    shape::{FullIntersectionResult, IntersectionResult, MeshInstance, Plane, Shape},
    skybox::Skybox,
    Error, Result,
};

/// A directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Unit vector, pointing from the light toward the scene
    pub direction: Vec3,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self::from_angles(50f32.to_radians(), 30f32.to_radians(), 1.0)
    }
}

impl Light {
    /// `pitch` is the angle below the horizon, `yaw` rotates around +y starting from -z
    pub fn from_angles(pitch: f32, yaw: f32, intensity: f32) -> Self {
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        Self {
            direction: Vec3::new(cos_pitch * sin_yaw, -sin_pitch, -cos_pitch * cos_yaw),
            intensity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.intensity.is_finite() || self.intensity < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "light intensity must be finite and non negative, got {}",
                self.intensity
            )));
        }
        if !self.direction.is_finite() || self.direction.into_non_zero(1e-6).is_none() {
            return Err(Error::InvalidConfig(format!(
                "light direction must be a non zero vector, got {}",
                self.direction
            )));
        }
        Ok(())
    }

    /// Direction toward the light, used by shadow rays
    pub fn to_light(&self) -> Vec3 {
        -self.direction.normalize_or_zero()
    }
}

/// Everything a ray can interact with during one frame
pub struct World<'a> {
    pub ground: Plane,
    pub geometry: &'a GeometryBuffers,
    pub light: Light,
    pub skybox: &'a Skybox,
    pub skybox_exposure: f32,
}

impl<'a> World<'a> {
    /// Meshes that can be intersected. Meshes with a singular transform are skipped
    pub fn meshes(&self) -> impl Iterator<Item = MeshInstance<'a>> + '_ {
        let geometry = self.geometry;
        geometry
            .objects()
            .iter()
            .zip(geometry.world_to_local())
            .filter_map(move |(object, world_to_local)| {
                Some(MeshInstance {
                    object,
                    world_to_local: (*world_to_local)?,
                    vertices: geometry.vertices(),
                    indices: geometry.indices(),
                })
            })
    }

    /// Closest hit among the ground, the spheres and the meshes.
    ///
    /// Each hit shrinks the far bound of the ray so that only strictly closer hits are kept.
    pub fn trace_closest(&self, ray: &Ray) -> RayHit {
        let mut ray = *ray;
        let mut closest = IntersectionResult::NoIntersection;

        let mut keep = |res: FullIntersectionResult, ray: &mut Ray| {
            if let Some(t) = res.t() {
                ray.bounds.1 = t;
            }
            closest = closest.min(res);
        };

        keep(self.ground.intersection_full(&ray), &mut ray);
        for sphere in self.geometry.spheres() {
            keep(sphere.intersection_full(&ray), &mut ray);
        }
        for mesh in self.meshes() {
            keep(mesh.intersection_full(&ray), &mut ray);
        }

        closest.into()
    }

    /// Whether anything lies along the ray, within its bounds
    pub fn occluded(&self, ray: &Ray) -> bool {
        self.ground.intersect_bare(ray).is_intersection()
            || self
                .geometry
                .spheres()
                .iter()
                .any(|sphere| sphere.intersect_bare(ray).is_intersection())
            || self
                .meshes()
                .any(|mesh| mesh.intersect_bare(ray).is_intersection())
    }

    /// Radiance of the sky in `direction`
    pub fn sky(&self, direction: Vec3) -> Vec3 {
        self.skybox.sample(direction) * self.skybox_exposure
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use crate::{
        buffer::BufferLimits,
        scene::mesh::{MeshRegistry, Renderable},
        shape::Sphere,
    };

    use super::*;

    fn world<'a>(geometry: &'a GeometryBuffers, skybox: &'a Skybox) -> World<'a> {
        World {
            ground: Plane::ground(),
            geometry,
            light: Light::default(),
            skybox,
            skybox_exposure: 1.4,
        }
    }

    fn sphere(position: Vec3, radius: f32) -> Sphere {
        Sphere {
            position,
            radius,
            specular: Vec3::splat(0.5),
            ..Default::default()
        }
    }

    #[test]
    fn closest_hit_wins_over_ground() {
        // Looking down from y = 10: the sphere top is at distance 5, the ground at 10
        let mut geometry = GeometryBuffers::new();
        geometry
            .sync_spheres(&[sphere(Vec3::new(0.0, 4.0, 0.0), 1.0)])
            .unwrap();
        let skybox = Skybox::default();
        let world = world(&geometry, &skybox);

        let hit = world.trace_closest(&Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y));
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert_eq!(hit.specular, Vec3::splat(0.5));

        let hit = world.trace_closest(&Ray::new(Vec3::new(5.0, 10.0, 0.0), Vec3::NEG_Y));
        assert!((hit.distance - 10.0).abs() < 1e-5);
        assert_eq!(hit.albedo, Plane::GROUND_ALBEDO);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let near = sphere(Vec3::new(0.0, 1.0, -3.0), 1.0);
        let far = sphere(Vec3::new(0.0, 1.0, -8.0), 1.0);
        let skybox = Skybox::default();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);

        let mut a = GeometryBuffers::new();
        a.sync_spheres(&[near, far]).unwrap();
        let mut b = GeometryBuffers::new();
        b.sync_spheres(&[far, near]).unwrap();

        let hit_a = world(&a, &skybox).trace_closest(&ray);
        let hit_b = world(&b, &skybox).trace_closest(&ray);
        assert_eq!(hit_a, hit_b);
        assert!((hit_a.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn sky_is_a_miss() {
        let geometry = GeometryBuffers::new();
        let skybox = Skybox::uniform(Vec3::ONE);
        let world = world(&geometry, &skybox);

        let hit = world.trace_closest(&Ray::new(Vec3::Y, Vec3::Y));
        assert!(hit.is_miss());
        assert_eq!(world.sky(Vec3::Y), Vec3::splat(1.4));
        assert!(!world.occluded(&Ray::new(Vec3::Y, Vec3::Y)));
    }

    #[test]
    fn meshes_hit_and_occlude() {
        let mut registry = MeshRegistry::new();
        registry
            .register(Renderable {
                local_to_world: Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)),
                vertices: vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0)],
                indices: vec![0, 1, 2],
            })
            .unwrap();
        registry
            .register(Renderable {
                local_to_world: Mat4::ZERO,
                vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                indices: vec![0, 1, 2],
            })
            .unwrap();
        let mut geometry = GeometryBuffers::new();
        geometry
            .rebuild_meshes(&registry, &BufferLimits::default())
            .unwrap();

        let skybox = Skybox::default();
        let world = world(&geometry, &skybox);
        assert_eq!(world.meshes().count(), 1);

        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);
        let hit = world.trace_closest(&ray);
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert_eq!(hit.specular, MeshInstance::SPECULAR);
        assert!(world.occluded(&ray));
    }

    #[test]
    fn light_angles() {
        let light = Light::from_angles(std::f32::consts::FRAC_PI_2, 0.0, 1.0);
        assert!(light.direction.distance(Vec3::NEG_Y) < 1e-6);
        assert!(light.to_light().distance(Vec3::Y) < 1e-6);
        assert!(Light::default().validate().is_ok());

        let invalid = Light {
            direction: Vec3::ZERO,
            intensity: 1.0,
        };
        assert!(invalid.validate().is_err());
        let invalid = Light {
            intensity: f32::NAN,
            ..Light::default()
        };
        assert!(invalid.validate().is_err());
    }
}
