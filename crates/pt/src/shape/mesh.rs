use glam::{Mat4, Vec3};

use crate::{
    math::vec::Vec3SameDirExt,
    ray::Ray,
    scene::mesh::MeshObject,
    utils::log_once::error_once,
};

use super::{
    local_info,
    triangle::{face_normal, MollerTrumbore},
    FullIntersectionResult, IntersectionResult, MinIntersectionResult, RayIntersection, Shape,
};

/// A registered mesh, viewed through the flat geometry buffers.
///
/// Rays are moved into object space instead of moving the triangles into world space.
/// The direction is not renormalized so that the hit parameter is the same in both spaces.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance<'a> {
    pub object: &'a MeshObject,
    pub world_to_local: Mat4,
    pub vertices: &'a [Vec3],
    pub indices: &'a [u32],
}

impl<'a> MeshInstance<'a> {
    pub const ALBEDO: Vec3 = Vec3::ZERO;
    pub const SPECULAR: Vec3 = Vec3::splat(0.65);

    fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + 'a {
        let start = self.object.index_offset as usize;
        let end = start + self.object.index_count as usize;
        let vertices = self.vertices;
        let indices = self.indices;

        let slice = indices.get(start..end).unwrap_or_else(|| {
            error_once!(
                "mesh index range {start}..{end} is outside the index buffer ({} indices)",
                indices.len()
            );
            Default::default()
        });

        slice.chunks_exact(3).filter_map(move |tri| {
            let vertex = |i: u32| vertices.get(i as usize).copied();
            let triangle = vertex(tri[0]).zip(vertex(tri[1])).zip(vertex(tri[2]));
            if triangle.is_none() {
                error_once!("mesh triangle {tri:?} references a missing vertex");
            }
            triangle.map(|((a, b), c)| [a, b, c])
        })
    }

    /// Closest triangle in the ray bounds, with its object space vertices
    fn closest(&self, ray: &Ray) -> Option<(f32, [Vec3; 3])> {
        if ray.is_degenerate() {
            return None;
        }

        let origin = self.world_to_local.transform_point3(ray.origin);
        let direction = self.world_to_local.transform_vector3(ray.direction);
        if !origin.is_finite() || !direction.is_finite() {
            return None;
        }

        let mut best: Option<(f32, [Vec3; 3])> = None;
        let mut far = ray.bounds.1;
        for vertices in self.triangles() {
            let Some(MollerTrumbore { t, .. }) =
                MollerTrumbore::intersect(vertices, origin, direction)
            else {
                continue;
            };
            if t > ray.bounds.0 && t < far {
                far = t;
                best = Some((t, vertices));
            }
        }
        best
    }

    fn any(&self, ray: &Ray) -> Option<f32> {
        if ray.is_degenerate() {
            return None;
        }

        let origin = self.world_to_local.transform_point3(ray.origin);
        let direction = self.world_to_local.transform_vector3(ray.direction);

        self.triangles()
            .filter_map(|vertices| MollerTrumbore::intersect(vertices, origin, direction))
            .map(|res| res.t)
            .find(|&t| ray.accepts(t))
    }
}

impl Shape for MeshInstance<'_> {
    fn intersection_full(&self, ray: &Ray) -> FullIntersectionResult {
        let Some((t, vertices)) = self.closest(ray) else {
            return IntersectionResult::NoIntersection;
        };

        // Normals go through the inverse transpose
        let normal = self
            .world_to_local
            .transpose()
            .transform_vector3(face_normal(vertices))
            .normalize_or_zero()
            .same_direction(-ray.direction);

        IntersectionResult::Intersection(RayIntersection {
            t,
            local_info: local_info::Full {
                pos: ray.at(t),
                normal,
                albedo: Self::ALBEDO,
                specular: Self::SPECULAR,
            },
        })
    }

    fn intersect_bare(&self, ray: &Ray) -> MinIntersectionResult {
        let Some(t) = self.any(ray) else {
            return IntersectionResult::NoIntersection;
        };

        IntersectionResult::Intersection(RayIntersection {
            t,
            local_info: local_info::Minimum { pos: ray.at(t) },
        })
    }
}
