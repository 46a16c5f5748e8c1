//! The generated world and its regeneration policy.
//!
//! A [`World`] owns every chunk and remembers which [`MeshSink`] buffer each
//! one was uploaded to. Applying new settings either replaces every chunk
//! and buffer (layout change) or recomputes heights and re-uploads into the
//! existing buffers (same layout).

use strata_mesh::{MeshHandle, MeshSink};
use tracing::{debug, info};

use crate::chunk::{Chunk, ChunkGenerator, SettingsChange, WorldSettings};
use crate::error::TerrainError;
use crate::parallel::{self, default_thread_count};

/// Upload one chunk's mesh.
///
/// With `full` the chunk's previous buffer (if any) is released and a new
/// one created. Otherwise the mesh is re-uploaded into the chunk's existing
/// buffer; a chunk that was never uploaded is a caller bug and fails with
/// [`TerrainError::MissingMeshBuffer`] instead of silently allocating.
pub fn refresh_chunk(
    chunk: &mut Chunk,
    full: bool,
    sink: &mut dyn MeshSink,
) -> Result<MeshHandle, TerrainError> {
    if full {
        if let Some(old) = chunk.set_handle(None) {
            sink.release(old);
        }
        let handle = sink.create(chunk.mesh());
        chunk.set_handle(Some(handle));
        return Ok(handle);
    }

    let handle = chunk.handle().ok_or(TerrainError::MissingMeshBuffer {
        tile_x: chunk.tile_x(),
        tile_z: chunk.tile_z(),
    })?;
    sink.update(handle, chunk.mesh())?;
    Ok(handle)
}

/// Every chunk of the world plus the settings that produced them.
#[derive(Debug)]
pub struct World {
    settings: WorldSettings,
    chunks: Vec<Chunk>,
    threads: usize,
}

impl World {
    /// Generate a world using the default worker count.
    pub fn new(settings: WorldSettings) -> Result<Self, TerrainError> {
        Self::with_threads(settings, default_thread_count())
    }

    /// Generate a world across `threads` workers.
    pub fn with_threads(settings: WorldSettings, threads: usize) -> Result<Self, TerrainError> {
        let chunks = ChunkGenerator::new(settings.clone()).generate_world_parallel(threads)?;
        Ok(Self {
            settings,
            chunks,
            threads,
        })
    }

    /// Settings the current chunks were generated from.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// All chunks, X outer, Z inner.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The chunk at a tile index.
    pub fn chunk(&self, tile_x: i32, tile_z: i32) -> Option<&Chunk> {
        self.chunks
            .iter()
            .find(|c| c.tile_x() == tile_x && c.tile_z() == tile_z)
    }

    /// Create buffers for every chunk that has none yet.
    pub fn upload(&mut self, sink: &mut dyn MeshSink) -> Result<(), TerrainError> {
        let mut created = 0;
        for chunk in self.chunks.iter_mut().filter(|c| c.handle().is_none()) {
            refresh_chunk(chunk, true, sink)?;
            created += 1;
        }
        debug!(created, "uploaded chunk meshes");
        Ok(())
    }

    /// Re-upload one tile, fully or into its existing buffer.
    pub fn refresh_tile(
        &mut self,
        tile_x: i32,
        tile_z: i32,
        full: bool,
        sink: &mut dyn MeshSink,
    ) -> Result<MeshHandle, TerrainError> {
        let chunk = self
            .chunks
            .iter_mut()
            .find(|c| c.tile_x() == tile_x && c.tile_z() == tile_z)
            .ok_or(TerrainError::TileNotFound { tile_x, tile_z })?;
        refresh_chunk(chunk, full, sink)
    }

    /// Regenerate for `new_settings` and push the result to `sink`.
    ///
    /// Returns what kind of change was applied. A height-only change needs
    /// every chunk uploaded; on any error the chunks and settings are left
    /// as they were.
    pub fn apply(
        &mut self,
        new_settings: WorldSettings,
        sink: &mut dyn MeshSink,
    ) -> Result<SettingsChange, TerrainError> {
        let change = WorldSettings::diff(&self.settings, &new_settings);
        match change {
            SettingsChange::Unchanged => {}
            SettingsChange::Full => {
                for chunk in &mut self.chunks {
                    if let Some(handle) = chunk.set_handle(None) {
                        sink.release(handle);
                    }
                }
                self.chunks =
                    ChunkGenerator::new(new_settings.clone()).generate_world_parallel(self.threads)?;
                for chunk in &mut self.chunks {
                    refresh_chunk(chunk, true, sink)?;
                }
            }
            SettingsChange::HeightsOnly => {
                if let Some(chunk) = self.chunks.iter().find(|c| c.handle().is_none()) {
                    return Err(TerrainError::MissingMeshBuffer {
                        tile_x: chunk.tile_x(),
                        tile_z: chunk.tile_z(),
                    });
                }
                let generator = ChunkGenerator::new(new_settings.clone());
                let tiles: Vec<(i32, i32)> =
                    self.chunks.iter().map(|c| (c.tile_x(), c.tile_z())).collect();
                let fresh = parallel::generate_tiles(&generator, &tiles, self.threads)?;

                // Commit only once every buffer accepted its update.
                let mut staged = self.chunks.clone();
                for (chunk, regenerated) in staged.iter_mut().zip(fresh) {
                    chunk.replace_heights(regenerated.height_map().clone())?;
                    refresh_chunk(chunk, false, sink)?;
                }
                self.chunks = staged;
            }
        }
        self.settings = new_settings;
        info!(?change, tiles = self.chunks.len(), "applied world settings");
        Ok(change)
    }
}
