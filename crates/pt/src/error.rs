//! Error type of the tracer.
//!
//! The tracing itself never fails: degenerate geometry is simply not hit.
//! Errors come from configuration, mesh registration and geometry rebuilds.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is out of its domain. Values are never clamped.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A renderable references vertices it does not have, or is not made of triangles
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// The geometry does not fit in the tracer buffers
    #[error("{resource} exhausted: requested {requested}, limit is {limit}")]
    ResourceExhausted {
        resource: &'static str,
        requested: usize,
        limit: usize,
    },

    /// An allocation of a geometry buffer failed
    #[error("failed to allocate {resource}: {source}")]
    Allocation {
        resource: &'static str,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("obj loading error: {0}")]
    Obj(#[from] tobj::LoadError),
}

pub type Result<T> = std::result::Result<T, Error>;
