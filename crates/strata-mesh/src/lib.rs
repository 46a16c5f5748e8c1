//! Terrain mesh data: position-only vertices, grid triangulation, and the
//! buffer seam through which meshes reach an external renderer.

pub mod error;
pub mod sink;
pub mod terrain_mesh;
pub mod vertex_format;
pub mod water;

pub use error::MeshError;
pub use sink::{BufferRegistry, MeshHandle, MeshSink, UploadedMesh};
pub use terrain_mesh::{GridLayout, TerrainMesh, grid_indices};
pub use vertex_format::TerrainVertex;
pub use water::water_plane;
