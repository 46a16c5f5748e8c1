//! Mesh error types.

use crate::sink::MeshHandle;

/// Errors raised while refreshing or uploading terrain meshes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    /// A height-only refresh was given a sample count that does not match the
    /// mesh's vertex count.
    #[error("height refresh expected {expected} samples, got {actual}")]
    HeightCountMismatch {
        /// Vertex count of the mesh.
        expected: usize,
        /// Number of height samples supplied.
        actual: usize,
    },

    /// The sink has no buffer registered under this handle.
    #[error("no mesh buffer registered for {0:?}")]
    UnknownHandle(MeshHandle),
}
