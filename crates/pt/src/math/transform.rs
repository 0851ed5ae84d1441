use glam::{Mat4, Quat, Vec3};

/// Represents a transformation as translation + scale + rot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub scale: Vec3,
    pub rot: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        scale: Vec3::ONE,
        rot: Quat::IDENTITY,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_uniform_scale(self, scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..self
        }
    }

    pub fn with_rotation(self, rot: Quat) -> Self {
        Self { rot, ..self }
    }

    /// Scale first, then rotation then translation
    pub fn into_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rot, self.translation)
    }
}

/// Returns the inverse of `m` if it can be inverted in a numerically sensible way
pub fn try_inverse(m: Mat4) -> Option<Mat4> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() <= f32::EPSILON {
        return None;
    }
    let inverse = m.inverse();
    inverse.is_finite().then_some(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_applies_scale_then_translation() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(2.0);
        let p = t.into_matrix().transform_point3(Vec3::ONE);
        assert!(p.distance(Vec3::new(3.0, 4.0, 5.0)) < 1e-6);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let flat = Transform::IDENTITY.with_uniform_scale(0.0).into_matrix();
        assert!(try_inverse(flat).is_none());
        assert!(try_inverse(Mat4::IDENTITY).is_some());
    }
}
