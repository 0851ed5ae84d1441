use glam::{Quat, Vec3};

use crate::{math::transform::Transform, shape::Sphere, Result};

use super::{
    mesh::{Renderable, RenderableHandle},
    SceneConfig, SceneT,
};

/// The random sphere field
pub struct RandomSpheresScene;

impl RandomSpheresScene {
    pub fn insert_into<S: SceneT>(scene: &mut S, config: &SceneConfig) -> Result<()> {
        scene.replace_spheres(config.build_spheres()?)
    }
}

/// A few hand placed spheres, one of each material
pub struct DebugScene;

impl DebugScene {
    pub fn spheres() -> Vec<Sphere> {
        vec![
            Sphere {
                position: Vec3::new(-3.0, 1.0, 0.0),
                radius: 1.0,
                albedo: Vec3::new(0.2, 0.9, 0.7),
                specular: Vec3::splat(0.04),
                ..Default::default()
            },
            Sphere {
                position: Vec3::new(0.0, 1.5, 0.0),
                radius: 1.5,
                albedo: Vec3::ZERO,
                specular: Vec3::new(0.95, 0.8, 0.5),
                smoothness: 1.0,
                ..Default::default()
            },
            Sphere {
                position: Vec3::new(3.0, 0.75, 0.5),
                radius: 0.75,
                albedo: Vec3::ZERO,
                specular: Vec3::ZERO,
                emission: Vec3::splat(5.0),
                ..Default::default()
            },
        ]
    }

    pub fn insert_into<S: SceneT>(scene: &mut S) -> Result<()> {
        scene.replace_spheres(Self::spheres())
    }
}

/// The debug spheres standing between two facing mirrors
pub struct MirrorBoxScene;

impl MirrorBoxScene {
    /// A unit quad in the xy plane facing +z
    pub fn unit_quad(transform: Transform) -> Renderable {
        Renderable {
            local_to_world: transform.into_matrix(),
            vertices: vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Returns the handles of the two mirrors, back one first
    pub fn insert_into<S: SceneT>(scene: &mut S) -> Result<[RenderableHandle; 2]> {
        DebugScene::insert_into(scene)?;

        let back = Transform::from_translation(Vec3::new(0.0, 3.0, -4.0)).with_uniform_scale(10.0);
        let front = Transform::from_translation(Vec3::new(0.0, 3.0, 6.0))
            .with_uniform_scale(10.0)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::PI));

        Ok([
            scene.register_renderable(Self::unit_quad(back))?,
            scene.register_renderable(Self::unit_quad(front))?,
        ])
    }
}
