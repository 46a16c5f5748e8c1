//! World tiling: settings, per-tile chunks, and the generator that builds them.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use strata_mesh::{GridLayout, MeshHandle, TerrainMesh};
use tracing::{debug, info};

use crate::builder::{HeightMapBuilder, tile_origin};
use crate::erosion::{ErosionSettings, ErosionSimulator, settings::ITERATIONS_RANGE};
use crate::error::TerrainError;
use crate::heightmap::HeightMap;
use crate::parallel;
use crate::settings::{NoiseSettings, TerrainPreset, clamp_logged};

/// Valid tile count per axis.
pub const CHUNK_COUNT_RANGE: RangeInclusive<u32> = 1..=64;
/// Valid samples per tile edge at LOD 1.
pub const TILE_SIZE_RANGE: RangeInclusive<usize> = 2..=1024;
/// Valid level-of-detail multiplier.
pub const LOD_RANGE: RangeInclusive<u32> = 1..=8;

/// Everything needed to generate the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Tiles along X.
    pub chunks_x: u32,
    /// Tiles along Z.
    pub chunks_z: u32,
    /// Samples per tile along X at LOD 1. Adjacent tiles share an edge.
    pub tile_width: usize,
    /// Samples per tile along Z at LOD 1.
    pub tile_height: usize,
    /// Sample density multiplier within a tile's footprint.
    pub lod: u32,
    /// Subtract the erosion-potential channel from the continental channel.
    pub blend: bool,
    /// Scale on the erosion-potential channel when blending.
    pub erosion_factor: f32,
    /// Droplets simulated per tile.
    pub erosion_iterations: u32,
    /// Continentalness channel.
    pub continental: NoiseSettings,
    /// Erosion-potential channel.
    pub erosion_potential: NoiseSettings,
    /// Hydraulic erosion parameters.
    pub erosion: ErosionSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self::from_preset(TerrainPreset::Default)
    }
}

/// What a settings change requires of existing chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsChange {
    /// Nothing to do.
    Unchanged,
    /// Same tile layout; heights must be recomputed and re-uploaded into the
    /// existing buffers.
    HeightsOnly,
    /// Tile count, size or LOD changed; every chunk and buffer is replaced.
    Full,
}

impl WorldSettings {
    /// Default layout with a preset's noise channels.
    pub fn from_preset(preset: TerrainPreset) -> Self {
        Self {
            chunks_x: 3,
            chunks_z: 3,
            tile_width: 64,
            tile_height: 64,
            lod: 1,
            blend: false,
            erosion_factor: 1.0,
            erosion_iterations: 0,
            continental: preset.continental(),
            erosion_potential: preset.erosion_potential(),
            erosion: ErosionSettings::default(),
        }
    }

    /// Classify the change from `old` to `new`.
    pub fn diff(old: &WorldSettings, new: &WorldSettings) -> SettingsChange {
        if old == new {
            SettingsChange::Unchanged
        } else if old.layout_key() != new.layout_key() {
            SettingsChange::Full
        } else {
            SettingsChange::HeightsOnly
        }
    }

    fn layout_key(&self) -> (u32, u32, usize, usize, u32) {
        (self.chunks_x, self.chunks_z, self.tile_width, self.tile_height, self.lod)
    }

    /// Return a copy with every field forced into its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            chunks_x: clamp_logged("chunks_x", self.chunks_x, CHUNK_COUNT_RANGE),
            chunks_z: clamp_logged("chunks_z", self.chunks_z, CHUNK_COUNT_RANGE),
            tile_width: clamp_logged("tile_width", self.tile_width, TILE_SIZE_RANGE),
            tile_height: clamp_logged("tile_height", self.tile_height, TILE_SIZE_RANGE),
            lod: clamp_logged("lod", self.lod, LOD_RANGE),
            blend: self.blend,
            erosion_factor: clamp_logged("erosion_factor", self.erosion_factor, 0.0..=f32::MAX),
            erosion_iterations: clamp_logged(
                "erosion_iterations",
                self.erosion_iterations,
                ITERATIONS_RANGE,
            ),
            continental: self.continental.clamped(),
            erosion_potential: self.erosion_potential.clamped(),
            erosion: self.erosion.clamped(),
        }
    }

    /// Number of tiles in the world.
    pub fn tile_count(&self) -> usize {
        self.chunks_x as usize * self.chunks_z as usize
    }

    /// Tile indices in generation order: X outer, Z inner.
    pub fn tile_indices(&self) -> Vec<(i32, i32)> {
        (0..self.chunks_x as i32)
            .flat_map(|x| (0..self.chunks_z as i32).map(move |z| (x, z)))
            .collect()
    }
}

/// One generated tile: its height map, its mesh, and the buffer it was
/// uploaded to.
#[derive(Clone, Debug)]
pub struct Chunk {
    tile_x: i32,
    tile_z: i32,
    width: usize,
    height: usize,
    lod: u32,
    height_map: HeightMap,
    mesh: TerrainMesh,
    handle: Option<MeshHandle>,
}

impl Chunk {
    /// Wrap a height map in a mesh placed at its tile's world position.
    pub fn from_height_map(
        height_map: HeightMap,
        width: usize,
        height: usize,
        lod: u32,
    ) -> Result<Self, TerrainError> {
        let lod = lod.max(1);
        let (tile_x, tile_z) = (height_map.tile_x(), height_map.tile_z());
        let layout = GridLayout::uniform(
            height_map.width(),
            height_map.height(),
            tile_origin(tile_x, width) as f32,
            tile_origin(tile_z, height) as f32,
            1.0 / lod as f32,
        );
        let mesh = TerrainMesh::from_heights(layout, height_map.as_slice())?;
        Ok(Self {
            tile_x,
            tile_z,
            width,
            height,
            lod,
            height_map,
            mesh,
            handle: None,
        })
    }

    /// Tile index along X.
    pub fn tile_x(&self) -> i32 {
        self.tile_x
    }

    /// Tile index along Z.
    pub fn tile_z(&self) -> i32 {
        self.tile_z
    }

    /// Tile size in samples at LOD 1.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Level of detail the chunk was built at.
    pub fn lod(&self) -> u32 {
        self.lod
    }

    /// The tile's heights.
    pub fn height_map(&self) -> &HeightMap {
        &self.height_map
    }

    /// The tile's mesh.
    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    /// Buffer this chunk was uploaded to, if any.
    pub fn handle(&self) -> Option<MeshHandle> {
        self.handle
    }

    pub(crate) fn set_handle(&mut self, handle: Option<MeshHandle>) -> Option<MeshHandle> {
        std::mem::replace(&mut self.handle, handle)
    }

    /// Swap in new heights of the same dimensions, rewriting vertex Y only.
    pub fn replace_heights(&mut self, height_map: HeightMap) -> Result<(), TerrainError> {
        self.mesh.update_heights(height_map.as_slice())?;
        self.height_map = height_map;
        Ok(())
    }
}

/// Builds chunks for a [`WorldSettings`].
#[derive(Clone, Debug)]
pub struct ChunkGenerator {
    settings: WorldSettings,
    builder: HeightMapBuilder,
}

impl ChunkGenerator {
    /// Create a generator. Settings are used as given; clamp them first if
    /// they come from user input.
    pub fn new(settings: WorldSettings) -> Self {
        let builder = HeightMapBuilder::new(
            settings.continental.clone(),
            settings.erosion_potential.clone(),
        )
        .with_blend(settings.blend)
        .with_erosion_factor(settings.erosion_factor);
        Self { settings, builder }
    }

    /// The generator's settings.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// A fresh erosion simulator for these settings.
    pub fn simulator(&self) -> ErosionSimulator {
        ErosionSimulator::new(self.settings.erosion.clone())
    }

    /// Build the (optionally eroded) height map for one tile.
    pub fn height_map(
        &self,
        tile_x: i32,
        tile_z: i32,
        simulator: &mut ErosionSimulator,
    ) -> HeightMap {
        let s = &self.settings;
        let mut map = self
            .builder
            .build_lod(s.tile_width, s.tile_height, tile_x, tile_z, s.lod);
        if s.erosion.enabled && s.erosion_iterations > 0 {
            simulator.erode_height_map(&mut map, s.erosion_iterations);
        }
        map
    }

    /// Generate one tile.
    pub fn generate_tile(&self, tile_x: i32, tile_z: i32) -> Result<Chunk, TerrainError> {
        self.generate_tile_with(tile_x, tile_z, &mut self.simulator())
    }

    /// Generate one tile, reusing a simulator's cached brush.
    pub fn generate_tile_with(
        &self,
        tile_x: i32,
        tile_z: i32,
        simulator: &mut ErosionSimulator,
    ) -> Result<Chunk, TerrainError> {
        let s = &self.settings;
        let map = self.height_map(tile_x, tile_z, simulator);
        let chunk = Chunk::from_height_map(map, s.tile_width, s.tile_height, s.lod)?;
        debug!(
            tile_x,
            tile_z,
            vertices = chunk.mesh.vertices.len(),
            triangles = chunk.mesh.triangle_count(),
            "generated chunk"
        );
        Ok(chunk)
    }

    /// Generate every tile on the calling thread, X outer, Z inner.
    pub fn generate_world(&self) -> Result<Vec<Chunk>, TerrainError> {
        let mut simulator = self.simulator();
        let chunks = self
            .settings
            .tile_indices()
            .into_iter()
            .map(|(x, z)| self.generate_tile_with(x, z, &mut simulator))
            .collect::<Result<Vec<_>, _>>()?;
        info!(tiles = chunks.len(), "generated world");
        Ok(chunks)
    }

    /// Generate every tile across `threads` workers.
    ///
    /// The result is in the same order as [`generate_world`](Self::generate_world)
    /// and identical to it.
    pub fn generate_world_parallel(&self, threads: usize) -> Result<Vec<Chunk>, TerrainError> {
        let chunks = parallel::generate_tiles(self, &self.settings.tile_indices(), threads)?;
        info!(tiles = chunks.len(), threads, "generated world in parallel");
        Ok(chunks)
    }
}

/// Generate every tile of `settings` sequentially.
pub fn generate_world(settings: &WorldSettings) -> Result<Vec<Chunk>, TerrainError> {
    ChunkGenerator::new(settings.clone()).generate_world()
}
