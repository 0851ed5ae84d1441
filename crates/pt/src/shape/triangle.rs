use glam::Vec3;

use crate::math::float::FloatAsExt;

const DETERMINANT_EPSILON: f32 = 1e-8;

/// The result of the Möller-Trumbore algorithm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MollerTrumbore {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl MollerTrumbore {
    /// Two-sided ray/triangle test.
    ///
    /// `direction` does not need to be normalized: `t` is expressed in units of `direction`.
    /// Zero-area triangles and rays parallel to the triangle are never intersected.
    pub fn intersect(vertices: [Vec3; 3], origin: Vec3, direction: Vec3) -> Option<Self> {
        let [v0, v1, v2] = vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let pvec = direction.cross(edge2);
        let det = edge1.dot(pvec).into_non_zero(DETERMINANT_EPSILON)?;
        let inv_det = 1.0 / det;

        let tvec = origin - v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        t.into_finite().map(|t| Self { t, u, v })
    }
}

/// Geometric normal of a triangle, zero for a degenerate triangle
pub fn face_normal(vertices: [Vec3; 3]) -> Vec3 {
    (vertices[1] - vertices[0])
        .cross(vertices[2] - vertices[0])
        .normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_triangle(z: f32) -> [Vec3; 3] {
        [
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(0.0, 1.0, z),
        ]
    }

    #[test]
    fn hit_front_and_back() {
        let triangle = xy_triangle(-3.0);
        let front = MollerTrumbore::intersect(triangle, Vec3::ZERO, Vec3::NEG_Z).unwrap();
        assert!((front.t - 3.0).abs() < 1e-5);
        assert!(front.u >= 0.0 && front.v >= 0.0 && front.u + front.v <= 1.0);

        let back = MollerTrumbore::intersect(triangle, Vec3::new(0.0, 0.0, -6.0), Vec3::Z).unwrap();
        assert!((back.t - 3.0).abs() < 1e-5);

        // Behind the origin: a negative parameter, left to the caller to reject
        let behind = MollerTrumbore::intersect(triangle, Vec3::ZERO, Vec3::Z).unwrap();
        assert!((behind.t + 3.0).abs() < 1e-5);
    }

    #[test]
    fn miss_outside_edges() {
        let hit = MollerTrumbore::intersect(xy_triangle(-3.0), Vec3::new(2.0, 2.0, 0.0), Vec3::NEG_Z);
        assert_eq!(hit, None);
    }

    #[test]
    fn degenerate_inputs_are_never_hit() {
        let flat = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        assert_eq!(MollerTrumbore::intersect(flat, Vec3::new(0.5, 0.0, 1.0), Vec3::NEG_Z), None);
        assert_eq!(face_normal(flat), Vec3::ZERO);

        // Parallel to the triangle plane
        assert_eq!(MollerTrumbore::intersect(xy_triangle(-3.0), Vec3::ZERO, Vec3::X), None);
        // Non finite origin
        let origin = Vec3::new(0.0, 0.0, f32::INFINITY);
        assert_eq!(MollerTrumbore::intersect(xy_triangle(-3.0), origin, Vec3::NEG_Z), None);
    }

    #[test]
    fn unnormalized_direction_keeps_parameter() {
        let res = MollerTrumbore::intersect(xy_triangle(-3.0), Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0))
            .unwrap();
        assert!((res.t - 1.5).abs() < 1e-5);
    }

    #[test]
    fn normal_follows_winding() {
        assert_eq!(face_normal(xy_triangle(0.0)), Vec3::Z);
    }
}
