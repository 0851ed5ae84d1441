use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::ray::Ray;

use super::{
    local_info, FullIntersectionResult, IntersectionResult, MinIntersectionResult,
    RayIntersection, Shape,
};

/// A sphere and its material, laid out as it is stored in the tracer buffers
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f32,
    pub albedo: Vec3,
    pub specular: Vec3,
    pub smoothness: f32,
    /// Stored but not gathered by the shading
    pub emission: Vec3,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 0.5,
            albedo: Vec3::ONE,
            specular: Vec3::ZERO,
            smoothness: 0.0,
            emission: Vec3::ZERO,
        }
    }
}

impl Sphere {
    pub fn overlaps(&self, other: &Sphere) -> bool {
        let min_distance = self.radius + other.radius;
        self.position.distance_squared(other.position) < min_distance * min_distance
    }

    /// Smallest root in the ray bounds, falling back to the largest one when the ray
    /// starts inside the sphere
    fn t(&self, ray: &Ray) -> Option<f32> {
        if ray.is_degenerate() {
            return None;
        }

        let oc = ray.origin - self.position;
        let a = ray.direction.length_squared();
        let b_half = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant_quarter = b_half * b_half - a * c;
        if discriminant_quarter.is_nan() || discriminant_quarter < 0.0 {
            return None;
        }

        let sqrt_d = discriminant_quarter.sqrt();
        let near = (-b_half - sqrt_d) / a;
        let far = (-b_half + sqrt_d) / a;
        let t = if near > 0.0 { near } else { far };

        ray.accepts(t).then_some(t)
    }
}

impl Shape for Sphere {
    fn intersection_full(&self, ray: &Ray) -> FullIntersectionResult {
        let Some(t) = self.t(ray) else {
            return IntersectionResult::NoIntersection;
        };

        let pos = ray.at(t);
        IntersectionResult::Intersection(RayIntersection {
            t,
            local_info: local_info::Full {
                pos,
                normal: ((pos - self.position) / self.radius).normalize_or_zero(),
                albedo: self.albedo,
                specular: self.specular,
            },
        })
    }

    fn intersect_bare(&self, ray: &Ray) -> MinIntersectionResult {
        let Some(t) = self.t(ray) else {
            return IntersectionResult::NoIntersection;
        };

        IntersectionResult::Intersection(RayIntersection {
            t,
            local_info: local_info::Minimum { pos: ray.at(t) },
        })
    }
}
