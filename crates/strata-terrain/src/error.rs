//! Terrain error types.

use strata_mesh::MeshError;

/// Errors surfaced by world regeneration.
///
/// Out-of-range settings and droplets leaving the grid are absorbed where
/// they happen; only buffer-identity failures reach the caller.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TerrainError {
    /// A height-only refresh was requested for a tile that never had a mesh
    /// buffer created.
    #[error("tile ({tile_x}, {tile_z}) has no mesh buffer to update")]
    MissingMeshBuffer {
        /// Tile index along X.
        tile_x: i32,
        /// Tile index along Z.
        tile_z: i32,
    },

    /// The mesh layer rejected an update.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// No chunk exists at the requested tile index.
    #[error("no chunk at tile ({tile_x}, {tile_z})")]
    TileNotFound {
        /// Tile index along X.
        tile_x: i32,
        /// Tile index along Z.
        tile_z: i32,
    },
}
