//! Procedural terrain generation: layered noise, spline remapping, hydraulic
//! erosion, and chunked tile generation with meshes.

mod builder;
mod chunk;
mod error;
mod heightmap;
mod noise_field;
mod parallel;
mod seed;
mod settings;
mod spline;
mod world;

pub mod debug_viz;
pub mod erosion;

pub use builder::{
    FREQUENCY_SCALE, HeightMapBuilder, NoiseChannel, build_height_map, lod_sample_count, ridge,
    terrace, tile_origin,
};
pub use chunk::{
    CHUNK_COUNT_RANGE, Chunk, ChunkGenerator, LOD_RANGE, SettingsChange, TILE_SIZE_RANGE,
    WorldSettings, generate_world,
};
pub use erosion::{ErosionBrush, ErosionSettings, ErosionSimulator, ErosionStats};
pub use error::TerrainError;
pub use heightmap::HeightMap;
pub use noise_field::{LACUNARITY, NoiseField, sample_noise};
pub use parallel::{default_thread_count, generate_tiles};
pub use seed::{derive_tile_seed, tile_rng};
pub use settings::{
    EXPONENT_RANGE, FREQUENCY_RANGE, NoiseSettings, OCTAVES_RANGE, PERSISTENCE_RANGE, SEED_RANGE,
    TerrainPreset,
};
pub use spline::{SplinePoint, is_usable, remap};
pub use world::{World, refresh_chunk};
