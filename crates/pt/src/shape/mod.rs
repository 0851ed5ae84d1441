//! Contains the objects that are meant to be renderered:
//! - the ground [Plane]
//! - [Sphere]s
//! - triangle meshes, as [MeshInstance]s over the flat geometry buffers
//!
//! All intersection tests are total: a degenerate ray or a degenerate primitive is simply
//! not intersected.

pub mod mesh;
pub mod plane;
pub mod sphere;
pub mod triangle;

pub use mesh::MeshInstance;
pub use plane::Plane;
pub use sphere::Sphere;

use crate::ray::{Ray, RayHit};

/// An abstracted shape to be rendered by raytracing.
///
/// To render a shape we only need to know whether a ray intersect it and if so,
///  some information about the shape at the intersection point
pub trait Shape: Sync + Send {
    /// Check whether `ray` intersect the shape within `ray.bounds`, if so, gives the closest
    /// intersection and all the information needed to shade it
    fn intersection_full(&self, ray: &Ray) -> FullIntersectionResult;

    /// Check whether `ray` intersect the shape within `ray.bounds`, the intersection is not
    /// necessarily the closest one.
    /// It is used to cast shadow rays
    fn intersect_bare(&self, ray: &Ray) -> MinIntersectionResult;
}

pub mod local_info {
    use glam::Vec3;

    /// Contains all the local information needed for shading
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Full {
        pub pos: Vec3,
        pub normal: Vec3,
        pub albedo: Vec3,
        pub specular: Vec3,
    }

    /// Contains only the pure geometrical information needed to locate the point.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Minimum {
        pub pos: Vec3,
    }
}

/// Holds local informations and the time of a colision between a ray and a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection<LocalInfo> {
    pub t: f32,
    pub local_info: LocalInfo,
}

/// A `Result`-like type that takes care of intersections data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntersectionResult<LocalInfo> {
    Intersection(RayIntersection<LocalInfo>),
    NoIntersection,
}

impl<T> IntersectionResult<T> {
    pub fn is_intersection(&self) -> bool {
        matches!(self, Self::Intersection(_))
    }

    pub fn t(&self) -> Option<f32> {
        match self {
            Self::Intersection(RayIntersection { t, .. }) => Some(*t),
            Self::NoIntersection => None,
        }
    }

    /// Keeps the closest of the two intersections
    pub fn min(self, other: Self) -> Self {
        let Self::Intersection(RayIntersection { t: t1, .. }) = self else {
            return other;
        };
        let Self::Intersection(RayIntersection { t: t2, .. }) = other else {
            return self;
        };

        if t1 <= t2 {
            self
        } else {
            other
        }
    }
}

pub type MinIntersectionResult = IntersectionResult<local_info::Minimum>;
pub type FullIntersectionResult = IntersectionResult<local_info::Full>;

impl From<FullIntersectionResult> for RayHit {
    fn from(result: FullIntersectionResult) -> Self {
        match result {
            IntersectionResult::Intersection(RayIntersection { t, local_info }) => RayHit {
                position: local_info.pos,
                distance: t,
                normal: local_info.normal,
                albedo: local_info.albedo,
                specular: local_info.specular,
            },
            IntersectionResult::NoIntersection => RayHit::MISS,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn isect(t: f32) -> MinIntersectionResult {
        IntersectionResult::Intersection(RayIntersection {
            t,
            local_info: local_info::Minimum { pos: Vec3::ZERO },
        })
    }

    #[test]
    fn min_keeps_closest() {
        assert_eq!(isect(2.0).min(isect(1.0)).t(), Some(1.0));
        assert_eq!(isect(2.0).min(IntersectionResult::NoIntersection).t(), Some(2.0));
        assert_eq!(IntersectionResult::NoIntersection.min(isect(3.0)).t(), Some(3.0));
    }

    #[test]
    fn no_intersection_is_a_miss() {
        let hit: RayHit = FullIntersectionResult::NoIntersection.into();
        assert!(hit.is_miss());
    }
}
