use glam::Vec3;

use crate::{color::linear, math::vec::Vec3AsNonZero};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length, or zero for a degenerate ray
    pub direction: Vec3,
    /// Remaining contribution of the path, multiplied by the specular color at each bounce
    pub energy: Vec3,
    pub bounds: (f32, f32),
}

impl Ray {
    /// A zero (or non finite) `direction` gives a degenerate ray which never hits anything
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction
            .into_non_zero(f32::MIN_POSITIVE)
            .map(Vec3::normalize)
            .filter(|d| d.is_finite())
            .unwrap_or(Vec3::ZERO);

        Self {
            origin,
            direction,
            energy: linear::WHITE,
            bounds: (0.0, f32::INFINITY),
        }
    }

    /// Whether `t` is a valid hit parameter: positive and strictly closer than the far bound
    pub fn accepts(&self, t: f32) -> bool {
        t > self.bounds.0 && t < self.bounds.1
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO || !self.origin.is_finite()
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Energy is exactly zero once the ray escaped to the sky or hit a surface without specular
    pub fn is_exhausted(&self) -> bool {
        self.energy == Vec3::ZERO
    }
}

/// Result of a closest hit query.
///
/// A `distance` of `+inf` is the "no intersection" sentinel, meaning the ray escaped to the sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub position: Vec3,
    pub distance: f32,
    pub normal: Vec3,
    pub albedo: Vec3,
    pub specular: Vec3,
}

impl RayHit {
    pub const MISS: Self = Self {
        position: Vec3::ZERO,
        distance: f32::INFINITY,
        normal: Vec3::ZERO,
        albedo: Vec3::ZERO,
        specular: Vec3::ZERO,
    };

    pub fn is_miss(&self) -> bool {
        self.distance == f32::INFINITY
    }
}

impl Default for RayHit {
    fn default() -> Self {
        Self::MISS
    }
}
