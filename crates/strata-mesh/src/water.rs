//! Flat water surface quad.

use crate::terrain_mesh::{GridLayout, TerrainMesh, grid_indices};
use crate::vertex_format::TerrainVertex;

/// A single flat quad at `level` covering `[0, width] × [0, depth]`.
///
/// Four vertices, six indices, same winding as terrain quads.
pub fn water_plane(width: f32, depth: f32, level: f32) -> TerrainMesh {
    let layout = GridLayout {
        samples_x: 2,
        samples_z: 2,
        origin_x: 0.0,
        origin_z: 0.0,
        spacing_x: width,
        spacing_z: depth,
    };
    TerrainMesh {
        layout,
        vertices: vec![
            TerrainVertex::new(0.0, level, 0.0),
            TerrainVertex::new(width, level, 0.0),
            TerrainVertex::new(0.0, level, depth),
            TerrainVertex::new(width, level, depth),
        ],
        indices: grid_indices(2, 2),
    }
}
