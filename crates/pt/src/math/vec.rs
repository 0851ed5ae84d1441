pub use glam::Vec3;

pub trait ReflVecExt {
    fn reflect(self, normal: Vec3) -> Vec3;
}

impl ReflVecExt for Vec3 {
    fn reflect(self, normal: Vec3) -> Vec3 {
        self - (2.0 * self.dot(normal) * normal)
    }
}

pub trait Vec3SameDirExt {
    fn same_direction(self, other: Self) -> Self;
}

impl Vec3SameDirExt for Vec3 {
    /// Return self if self and other are pointing in the same general direction (self.dot(other) > 0.0) else, returns -self
    fn same_direction(self, other: Self) -> Self {
        if self.dot(other) > 0.0 {
            self
        } else {
            -self
        }
    }
}

pub trait Vec3AsNonZero: Sized {
    fn into_non_zero(self, eps: f32) -> Option<Self>;
}

impl Vec3AsNonZero for Vec3 {
    fn into_non_zero(self, eps: f32) -> Option<Self> {
        use super::float::FloatAsExt;
        self.length_squared().into_non_zero(eps * eps).and(Some(self))
    }
}
