use std::path::Path;

use glam::{Mat4, Vec3};

use crate::{
    scene::{
        mesh::{Renderable, RenderableHandle},
        SceneT,
    },
    Error, Result,
};

/// Loads every model of a Wavefront OBJ file as a triangulated [Renderable].
///
/// Materials are ignored: meshes are rendered as mirrors.
pub fn load_obj(path: impl AsRef<Path>, local_to_world: Mat4) -> Result<Vec<Renderable>> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;

    models
        .into_iter()
        .filter(|model| !model.mesh.indices.is_empty())
        .map(|model| {
            let mesh = model.mesh;
            if mesh.positions.len() % 3 != 0 {
                return Err(Error::InvalidMesh(format!(
                    "model {} has {} position components, not a multiple of 3",
                    model.name,
                    mesh.positions.len()
                )));
            }

            let vertices: Vec<Vec3> = mesh
                .positions
                .chunks_exact(3)
                .map(Vec3::from_slice)
                .collect();
            log::debug!(
                "loaded model {} from {}: {} vertices, {} triangles",
                model.name,
                path.display(),
                vertices.len(),
                mesh.indices.len() / 3
            );

            let renderable = Renderable {
                local_to_world,
                vertices,
                indices: mesh.indices,
            };
            renderable.validate()?;
            Ok(renderable)
        })
        .collect()
}

pub trait ObjLoaderExt {
    fn load_obj(
        &mut self,
        path: impl AsRef<Path>,
        local_to_world: Mat4,
    ) -> Result<Vec<RenderableHandle>>;
}

impl<S: SceneT> ObjLoaderExt for S {
    fn load_obj(
        &mut self,
        path: impl AsRef<Path>,
        local_to_world: Mat4,
    ) -> Result<Vec<RenderableHandle>> {
        load_obj(path, local_to_world)?
            .into_iter()
            .map(|renderable| self.register_renderable(renderable))
            .collect()
    }
}
