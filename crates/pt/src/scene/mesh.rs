//! Registration of triangle meshes and their flattening into the global geometry arrays.

use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::{buffer::BufferLimits, Error, Result};

/// A triangle mesh as handed over by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub local_to_world: Mat4,
    pub vertices: Vec<Vec3>,
    /// Triangle list, three indices per triangle
    pub indices: Vec<u32>,
}

impl Renderable {
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(Error::InvalidMesh(format!(
                "index {index} out of bounds for {} vertices",
                self.vertices.len()
            )));
        }
        Ok(())
    }
}

/// Identifies a registered [Renderable].
///
/// Not `Clone`: unregistering consumes the handle.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RenderableHandle(u64);

/// The set of registered renderables.
///
/// Changing the set only marks the registry dirty, the flat arrays are rebuilt at the
/// start of the next frame.
#[derive(Debug, Default)]
pub struct MeshRegistry {
    renderables: BTreeMap<u64, Renderable>,
    next_id: u64,
    dirty: bool,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, renderable: Renderable) -> Result<RenderableHandle> {
        renderable.validate()?;

        let id = self.next_id;
        self.next_id += 1;
        self.renderables.insert(id, renderable);
        self.dirty = true;

        log::debug!("registered renderable {id}");
        Ok(RenderableHandle(id))
    }

    pub fn unregister(&mut self, handle: RenderableHandle) -> Option<Renderable> {
        let renderable = self.renderables.remove(&handle.0);
        self.dirty = true;

        log::debug!("unregistered renderable {}", handle.0);
        renderable
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }

    /// Registered renderables, in registration order
    pub fn iter(&self) -> std::collections::btree_map::Values<'_, u64, Renderable> {
        self.renderables.values()
    }
}

/// Per mesh record of the geometry buffers.
///
/// `index_offset..index_offset + index_count` is the mesh slice of the global index array.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshObject {
    pub local_to_world: Mat4,
    pub index_offset: u32,
    pub index_count: u32,
    _padding: [u32; 2],
}

impl MeshObject {
    pub fn new(local_to_world: Mat4, index_offset: u32, index_count: u32) -> Self {
        Self {
            local_to_world,
            index_offset,
            index_count,
            _padding: [0; 2],
        }
    }
}

/// Flat geometry of every registered mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<Vec3>,
    /// Already offset by the vertex count of the previous meshes
    pub indices: Vec<u32>,
    pub objects: Vec<MeshObject>,
}

fn check_limit(resource: &'static str, requested: usize, limit: usize) -> Result<()> {
    if requested > limit {
        return Err(Error::ResourceExhausted {
            resource,
            requested,
            limit,
        });
    }
    Ok(())
}

fn try_with_capacity<T>(resource: &'static str, capacity: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)
        .map_err(|source| Error::Allocation { resource, source })?;
    Ok(v)
}

/// Flattens `renderables` into global arrays.
///
/// This is a pure function of its input: the result only depends on the renderables and
/// their order. Nothing is allocated when a limit is exceeded.
pub fn rebuild_mesh_buffers<'a>(
    renderables: impl IntoIterator<Item = &'a Renderable> + Clone,
    limits: &BufferLimits,
) -> Result<MeshBuffers> {
    let (vertex_count, index_count, object_count) = renderables
        .clone()
        .into_iter()
        .fold((0usize, 0usize, 0usize), |(v, i, o), r| {
            (v + r.vertices.len(), i + r.indices.len(), o + 1)
        });

    // Indices and offsets are stored as u32
    let u32_limit = u32::MAX as usize;
    check_limit("vertices", vertex_count, limits.max_vertices.min(u32_limit))?;
    check_limit("indices", index_count, limits.max_indices.min(u32_limit))?;
    check_limit("mesh objects", object_count, limits.max_objects)?;

    let mut buffers = MeshBuffers {
        vertices: try_with_capacity("vertices", vertex_count)?,
        indices: try_with_capacity("indices", index_count)?,
        objects: try_with_capacity("mesh objects", object_count)?,
    };

    for renderable in renderables {
        let base_vertex = buffers.vertices.len() as u32;
        let index_offset = buffers.indices.len() as u32;

        buffers.vertices.extend_from_slice(&renderable.vertices);
        buffers
            .indices
            .extend(renderable.indices.iter().map(|i| i + base_vertex));
        buffers.objects.push(MeshObject::new(
            renderable.local_to_world,
            index_offset,
            renderable.indices.len() as u32,
        ));
    }

    Ok(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(local_to_world: Mat4) -> Renderable {
        Renderable {
            local_to_world,
            vertices: vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    fn hexagon_fan() -> Renderable {
        let vertices = (0..6)
            .map(|i| {
                let (s, c) = (i as f32 * std::f32::consts::FRAC_PI_3).sin_cos();
                Vec3::new(c, s, 0.0)
            })
            .collect();
        Renderable {
            local_to_world: Mat4::IDENTITY,
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 5],
        }
    }

    #[test]
    fn indices_are_offset_by_previous_vertices() {
        let a = quad(Mat4::IDENTITY);
        let b = hexagon_fan();
        let buffers = rebuild_mesh_buffers([&a, &b], &BufferLimits::default()).unwrap();

        assert_eq!(buffers.vertices.len(), 10);
        assert_eq!(buffers.indices.len(), 18);
        assert_eq!(buffers.objects.len(), 2);

        let second = &buffers.objects[1];
        assert_eq!(second.index_offset, 6);
        assert_eq!(second.index_count, 12);
        let slice = &buffers.indices[6..18];
        assert!(slice.iter().all(|&i| (4..10).contains(&i)));
        assert_eq!(&buffers.indices[..6], &a.indices[..]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let a = quad(Mat4::from_translation(Vec3::X));
        let b = hexagon_fan();
        let limits = BufferLimits::default();
        assert_eq!(
            rebuild_mesh_buffers([&a, &b], &limits).unwrap(),
            rebuild_mesh_buffers([&a, &b], &limits).unwrap()
        );
        assert_eq!(
            rebuild_mesh_buffers(std::iter::empty(), &limits).unwrap(),
            MeshBuffers::default()
        );
    }

    #[test]
    fn limits_are_enforced() {
        let a = quad(Mat4::IDENTITY);
        let limits = BufferLimits {
            max_vertices: 3,
            ..Default::default()
        };
        assert!(matches!(
            rebuild_mesh_buffers([&a], &limits),
            Err(Error::ResourceExhausted {
                resource: "vertices",
                requested: 4,
                limit: 3
            })
        ));
    }

    #[test]
    fn registry_tracks_changes() {
        let mut registry = MeshRegistry::new();
        assert!(!registry.is_dirty());

        let handle = registry.register(quad(Mat4::IDENTITY)).unwrap();
        let _other = registry.register(hexagon_fan()).unwrap();
        assert!(registry.is_dirty());
        assert_eq!(registry.len(), 2);

        registry.mark_clean();
        let removed = registry.unregister(handle).unwrap();
        assert_eq!(removed.vertices.len(), 4);
        assert!(registry.is_dirty());
        assert_eq!(registry.iter().next().unwrap().vertices.len(), 6);
    }

    #[test]
    fn invalid_renderables_are_refused() {
        let mut registry = MeshRegistry::new();

        let mut out_of_bounds = quad(Mat4::IDENTITY);
        out_of_bounds.indices[4] = 4;
        assert!(matches!(
            registry.register(out_of_bounds),
            Err(Error::InvalidMesh(_))
        ));

        let mut not_triangles = quad(Mat4::IDENTITY);
        not_triangles.indices.pop();
        assert!(matches!(
            registry.register(not_triangles),
            Err(Error::InvalidMesh(_))
        ));

        assert!(!registry.is_dirty());
        assert!(registry.is_empty());
    }

    #[test]
    fn mesh_object_layout() {
        assert_eq!(std::mem::size_of::<MeshObject>(), 80);
    }
}
