use glam::Vec3;

use crate::ray::Ray;

use super::{
    local_info, FullIntersectionResult, IntersectionResult, MinIntersectionResult,
    RayIntersection, Shape,
};

/// An infinite plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    /// Unit normal
    pub normal: Vec3,
    pub albedo: Vec3,
    pub specular: Vec3,
}

impl Plane {
    pub const GROUND_ALBEDO: Vec3 = Vec3::splat(0.8);
    pub const GROUND_SPECULAR: Vec3 = Vec3::splat(0.04);

    /// The horizontal plane y = 0 every sphere rests on
    pub fn ground() -> Self {
        Self {
            origin: Vec3::ZERO,
            normal: Vec3::Y,
            albedo: Self::GROUND_ALBEDO,
            specular: Self::GROUND_SPECULAR,
        }
    }

    fn t(&self, ray: &Ray) -> Option<f32> {
        // A ray parallel to the plane gives an infinite or NaN t, rejected by `accepts`
        let t = -(ray.origin - self.origin).dot(self.normal) / ray.direction.dot(self.normal);
        (!ray.is_degenerate() && ray.accepts(t)).then_some(t)
    }
}

impl Shape for Plane {
    fn intersection_full(&self, ray: &Ray) -> FullIntersectionResult {
        let Some(t) = self.t(ray) else {
            return IntersectionResult::NoIntersection;
        };

        IntersectionResult::Intersection(RayIntersection {
            t,
            local_info: local_info::Full {
                pos: ray.at(t),
                normal: self.normal,
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
