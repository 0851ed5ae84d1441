//! Tracer side copies of the scene geometry.
//!
//! The buffers are only written between two frames, through `&mut`, and read by the
//! dispatch through a shared borrow.

use bytemuck::Pod;
use glam::{Mat4, Vec3};

use crate::{
    math::transform::try_inverse,
    scene::mesh::{rebuild_mesh_buffers, MeshObject, MeshRegistry},
    shape::Sphere,
    Error, Result,
};

/// What [SyncedBuffer::sync] did to the storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSync {
    /// The element count or stride changed, the storage was replaced
    Reallocated,
    /// Same layout, the content was copied over the previous one
    Overwritten,
    /// The source was empty, the storage was freed
    Released,
}

/// A typed buffer mirroring a source slice.
#[derive(Debug, Clone)]
pub struct SyncedBuffer<T: Pod> {
    label: &'static str,
    data: Vec<T>,
    stride: usize,
}

impl<T: Pod> SyncedBuffer<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            data: Vec::new(),
            stride: 0,
        }
    }

    pub fn sync(&mut self, src: &[T]) -> Result<BufferSync> {
        let stride = std::mem::size_of::<T>();

        let sync = if src.is_empty() {
            self.data = Vec::new();
            self.stride = 0;
            BufferSync::Released
        } else if src.len() != self.data.len() || stride != self.stride {
            let mut data = Vec::new();
            data.try_reserve_exact(src.len())
                .map_err(|source| Error::Allocation {
                    resource: self.label,
                    source,
                })?;
            data.extend_from_slice(src);
            self.data = data;
            self.stride = stride;
            BufferSync::Reallocated
        } else {
            self.data.copy_from_slice(src);
            BufferSync::Overwritten
        };

        self.log_sync(sync);
        Ok(sync)
    }

    /// Same contract as [SyncedBuffer::sync], but takes ownership of an already allocated
    /// source so that it can not fail
    pub fn sync_owned(&mut self, src: Vec<T>) -> BufferSync {
        let stride = std::mem::size_of::<T>();

        let sync = if src.is_empty() {
            self.data = Vec::new();
            self.stride = 0;
            BufferSync::Released
        } else if src.len() != self.data.len() || stride != self.stride {
            self.data = src;
            self.stride = stride;
            BufferSync::Reallocated
        } else {
            self.data.copy_from_slice(&src);
            BufferSync::Overwritten
        };

        self.log_sync(sync);
        sync
    }

    fn log_sync(&self, sync: BufferSync) {
        log::debug!(
            "{} buffer {sync:?}: {} elements, {} bytes",
            self.label,
            self.data.len(),
            self.byte_size()
        );
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn byte_size(&self) -> usize {
        bytemuck::cast_slice::<T, u8>(&self.data).len()
    }
}

/// Upper bounds on the mesh geometry buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits {
    pub max_vertices: usize,
    pub max_indices: usize,
    pub max_objects: usize,
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            max_vertices: 1 << 24,
            max_indices: 3 << 24,
            max_objects: 1 << 16,
        }
    }
}

/// Every buffer the intersection engine reads
#[derive(Debug, Clone)]
pub struct GeometryBuffers {
    spheres: SyncedBuffer<Sphere>,
    vertices: SyncedBuffer<Vec3>,
    indices: SyncedBuffer<u32>,
    objects: SyncedBuffer<MeshObject>,
    /// Inverse of each object matrix, `None` for a singular matrix
    world_to_local: Vec<Option<Mat4>>,
}

impl Default for GeometryBuffers {
    fn default() -> Self {
        Self {
            spheres: SyncedBuffer::new("sphere"),
            vertices: SyncedBuffer::new("vertex"),
            indices: SyncedBuffer::new("index"),
            objects: SyncedBuffer::new("mesh object"),
            world_to_local: Vec::new(),
        }
    }
}

impl GeometryBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync_spheres(&mut self, spheres: &[Sphere]) -> Result<BufferSync> {
        self.spheres.sync(spheres)
    }

    /// Flattens the registry into the mesh buffers.
    ///
    /// Everything is staged before anything is committed: on error the previous buffers are
    /// left untouched.
    pub fn rebuild_meshes(&mut self, registry: &MeshRegistry, limits: &BufferLimits) -> Result<()> {
        let staged = rebuild_mesh_buffers(registry.iter(), limits)?;

        let mut world_to_local = Vec::new();
        world_to_local
            .try_reserve_exact(staged.objects.len())
            .map_err(|source| Error::Allocation {
                resource: "mesh inverse matrices",
                source,
            })?;
        world_to_local.extend(staged.objects.iter().enumerate().map(|(i, object)| {
            let inverse = try_inverse(object.local_to_world);
            if inverse.is_none() {
                log::warn!("mesh object {i} has a singular transform, it will not be rendered");
            }
            inverse
        }));

        self.vertices.sync_owned(staged.vertices);
        self.indices.sync_owned(staged.indices);
        self.objects.sync_owned(staged.objects);
        self.world_to_local = world_to_local;

        log::info!(
            "rebuilt mesh buffers: {} objects, {} vertices, {} triangles",
            self.objects.len(),
            self.vertices.len(),
            self.indices.len() / 3
        );
        Ok(())
    }

    pub fn spheres(&self) -> &[Sphere] {
        self.spheres.as_slice()
    }

    pub fn vertices(&self) -> &[Vec3] {
        self.vertices.as_slice()
    }

    pub fn indices(&self) -> &[u32] {
        self.indices.as_slice()
    }

    pub fn objects(&self) -> &[MeshObject] {
        self.objects.as_slice()
    }

    pub fn world_to_local(&self) -> &[Option<Mat4>] {
        &self.world_to_local
    }

    pub fn byte_size(&self) -> usize {
        self.spheres.byte_size()
            + self.vertices.byte_size()
            + self.indices.byte_size()
            + self.objects.byte_size()
    }
}
