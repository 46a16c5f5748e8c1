//! The seam between terrain meshes and whatever renderer consumes them.
//!
//! A [`MeshSink`] owns buffer identity: `create` hands out a [`MeshHandle`],
//! `update` re-uploads into the same buffer, `release` frees it. Terrain code
//! keeps the handle and never touches graphics resources directly.

use std::collections::HashMap;

use tracing::trace;

use crate::error::MeshError;
use crate::terrain_mesh::TerrainMesh;

/// Opaque identity of a vertex/index buffer pair owned by a [`MeshSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// Receiver of terrain meshes (a GPU renderer, a recorder, an exporter).
pub trait MeshSink {
    /// Allocate a new buffer pair and upload `mesh` into it.
    fn create(&mut self, mesh: &TerrainMesh) -> MeshHandle;

    /// Re-upload `mesh` into the existing buffer pair behind `handle`.
    fn update(&mut self, handle: MeshHandle, mesh: &TerrainMesh) -> Result<(), MeshError>;

    /// Free the buffer pair behind `handle`. Unknown handles are ignored.
    fn release(&mut self, handle: MeshHandle);
}

/// Bytes held for one registered mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadedMesh {
    /// Vertex buffer contents.
    pub vertex_bytes: Vec<u8>,
    /// Index buffer contents.
    pub index_bytes: Vec<u8>,
    /// Number of uploads into this buffer (1 after `create`).
    pub revision: u64,
}

impl UploadedMesh {
    fn size(&self) -> u64 {
        (self.vertex_bytes.len() + self.index_bytes.len()) as u64
    }
}

/// In-memory [`MeshSink`] that keeps a byte copy of every uploaded mesh.
///
/// Used by the headless CLI and by tests to observe buffer identity.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    buffers: HashMap<MeshHandle, UploadedMesh>,
    next_id: u64,
    /// Total bytes uploaded over the registry's lifetime.
    bytes_uploaded: u64,
}

impl BufferRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the bytes behind a handle.
    pub fn get(&self, handle: MeshHandle) -> Option<&UploadedMesh> {
        self.buffers.get(&handle)
    }

    /// Number of live buffer pairs.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Returns `true` if no buffers are live.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Bytes currently held by live buffers.
    pub fn bytes_in_use(&self) -> u64 {
        self.buffers.values().map(UploadedMesh::size).sum()
    }

    /// Bytes uploaded since creation, including overwritten uploads.
    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded
    }
}

impl MeshSink for BufferRegistry {
    fn create(&mut self, mesh: &TerrainMesh) -> MeshHandle {
        let handle = MeshHandle(self.next_id);
        self.next_id += 1;

        let uploaded = UploadedMesh {
            vertex_bytes: mesh.vertex_bytes().to_vec(),
            index_bytes: mesh.index_bytes().to_vec(),
            revision: 1,
        };
        self.bytes_uploaded += uploaded.size();
        trace!(?handle, bytes = uploaded.size(), "created mesh buffer");
        self.buffers.insert(handle, uploaded);
        handle
    }

    fn update(&mut self, handle: MeshHandle, mesh: &TerrainMesh) -> Result<(), MeshError> {
        let entry = self
            .buffers
            .get_mut(&handle)
            .ok_or(MeshError::UnknownHandle(handle))?;

        entry.vertex_bytes.clear();
        entry.vertex_bytes.extend_from_slice(mesh.vertex_bytes());
        entry.index_bytes.clear();
        entry.index_bytes.extend_from_slice(mesh.index_bytes());
        entry.revision += 1;
        self.bytes_uploaded += entry.size();
        trace!(?handle, revision = entry.revision, "updated mesh buffer");
        Ok(())
    }

    fn release(&mut self, handle: MeshHandle) {
        self.buffers.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain_mesh::GridLayout;

    fn mesh(height: f32) -> TerrainMesh {
        TerrainMesh::from_heights(GridLayout::uniform(2, 2, 0.0, 0.0, 1.0), &[height; 4]).unwrap()
    }

    #[test]
    fn test_create_assigns_distinct_handles() {
        let mut registry = BufferRegistry::new();
        let a = registry.create(&mesh(0.0));
        let b = registry.create(&mesh(0.0));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_update_keeps_identity_and_bumps_revision() {
        let mut registry = BufferRegistry::new();
        let handle = registry.create(&mesh(0.0));

        registry.update(handle, &mesh(5.0)).unwrap();

        let uploaded = registry.get(handle).unwrap();
        assert_eq!(uploaded.revision, 2);
        let floats: &[f32] = bytemuck::cast_slice(&uploaded.vertex_bytes);
        assert_eq!(floats[1], 5.0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_unknown_handle_fails() {
        let mut registry = BufferRegistry::new();
        let result = registry.update(MeshHandle(99), &mesh(0.0));
        assert_eq!(result, Err(MeshError::UnknownHandle(MeshHandle(99))));
    }

    #[test]
    fn test_release_frees_bytes() {
        let mut registry = BufferRegistry::new();
        let handle = registry.create(&mesh(1.0));
        assert_eq!(registry.bytes_in_use(), 4 * 12 + 6 * 4);

        registry.release(handle);
        assert!(registry.is_empty());
        assert_eq!(registry.bytes_in_use(), 0);
        assert_eq!(registry.bytes_uploaded(), 4 * 12 + 6 * 4);
    }
}
