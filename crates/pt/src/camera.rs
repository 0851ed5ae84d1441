use glam::{Mat4, Quat, Vec2, Vec3};

use crate::{math::float::FloatAsExt, ray::Ray, Error, Result};

/// Primary ray through `uv`, in normalized device coordinates ([-1, 1]², +y up).
///
/// The origin is the camera position. The direction goes through the point `uv` of the
/// near plane, unprojected by `inverse_projection` and brought to world space.
pub fn generate_camera_ray(uv: Vec2, camera_to_world: Mat4, inverse_projection: Mat4) -> Ray {
    let origin = camera_to_world.transform_point3(Vec3::ZERO);
    let view = (inverse_projection * uv.extend(0.0).extend(1.0)).truncate();
    let direction = camera_to_world.transform_vector3(view);

    Ray::new(origin, direction)
}

/// Maps the pixel `(x, y)` offset by `jitter` (in [0, 1(²) to normalized device coordinates.
///
/// Row 0 is the top of the image.
pub fn pixel_to_uv(x: u32, y: u32, jitter: Vec2, width: u32, height: u32) -> Vec2 {
    let pixel = Vec2::new(x as f32, y as f32) + jitter;
    let ndc = pixel / Vec2::new(width as f32, height as f32) * 2.0 - 1.0;
    Vec2::new(ndc.x, -ndc.y)
}

/// A pinhole camera looking at a target, as a host would drive it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view, in radians
    pub vfov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, 12.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            up: Vec3::Y,
            vfov: 60f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn validate(&self) -> Result<()> {
        if self.vfov.into_positive().filter(|&fov| fov < std::f32::consts::PI).is_none() {
            return Err(Error::InvalidConfig(format!(
                "field of view must be in ]0, 180[ degrees, got {}",
                self.vfov.to_degrees()
            )));
        }
        if self.near.into_positive().is_none() || self.far.is_nan() || self.far <= self.near {
            return Err(Error::InvalidConfig(format!(
                "invalid clipping planes: near {}, far {}",
                self.near, self.far
            )));
        }
        if (self.target - self.position).cross(self.up).length_squared() <= f32::EPSILON {
            return Err(Error::InvalidConfig(
                "camera up vector is parallel to the view direction".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn camera_to_world(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up).inverse()
    }

    pub fn inverse_projection(&self, width: u32, height: u32) -> Mat4 {
        let aspect_ratio = width as f32 / height.max(1) as f32;
        Mat4::perspective_rh(self.vfov, aspect_ratio, self.near, self.far).inverse()
    }

    /// Rotates the camera around the vertical axis going through its target
    pub fn orbit(&mut self, angle: f32) {
        let offset = self.position - self.target;
        self.position = self.target + Quat::from_rotation_y(angle) * offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_looks_at_target() {
        let camera = Camera::default();
        let ray = generate_camera_ray(
            Vec2::ZERO,
            camera.camera_to_world(),
            camera.inverse_projection(800, 600),
        );

        let expected = (camera.target - camera.position).normalize();
        assert!(ray.origin.distance(camera.position) < 1e-4);
        assert!(ray.direction.distance(expected) < 1e-4);
        assert_eq!(ray.energy, Vec3::ONE);
    }

    #[test]
    fn top_of_image_looks_up() {
        let camera = Camera {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            ..Default::default()
        };
        let uv = pixel_to_uv(400, 0, Vec2::splat(0.5), 800, 600);
        assert!(uv.y > 0.99);
        let ray = generate_camera_ray(uv, camera.camera_to_world(), camera.inverse_projection(800, 600));
        assert!(ray.direction.y > 0.0);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn pixel_corners() {
        assert_eq!(pixel_to_uv(0, 0, Vec2::ZERO, 4, 2), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_uv(3, 1, Vec2::ONE, 4, 2), Vec2::new(1.0, -1.0));
        assert_eq!(pixel_to_uv(1, 0, Vec2::new(1.0, 1.0), 4, 2), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut camera = Camera::default();
        let distance = camera.position.distance(camera.target);
        camera.orbit(1.0);
        assert!((camera.position.distance(camera.target) - distance).abs() < 1e-4);
        assert_ne!(camera.camera_to_world(), Camera::default().camera_to_world());
    }

    #[test]
    fn invalid_cameras_are_rejected() {
        assert!(Camera::default().validate().is_ok());
        let camera = Camera {
            vfov: 0.0,
            ..Default::default()
        };
        assert!(camera.validate().is_err());
        let camera = Camera {
            up: Vec3::new(0.0, -3.0, -12.0),
            ..Default::default()
        };
        assert!(camera.validate().is_err());
    }
}
