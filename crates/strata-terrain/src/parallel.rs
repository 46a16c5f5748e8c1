//! Fork-join tile generation over a pool of scoped worker threads.
//!
//! Tile jobs go out on one bounded channel and finished chunks come back on
//! another. Each worker owns its erosion simulator, so no state is shared on
//! the hot path; results are merged and ordered once every worker is done.

use std::time::Instant;

use crossbeam_channel::bounded;
use tracing::{debug, trace};

use crate::chunk::{Chunk, ChunkGenerator};
use crate::error::TerrainError;

/// A request to generate a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TileJob {
    /// Position in the output sequence.
    order: usize,
    tile_x: i32,
    tile_z: i32,
}

/// A finished tile on its way back to the caller.
struct GeneratedTile {
    order: usize,
    chunk: Result<Chunk, TerrainError>,
    /// Generation time in microseconds (for profiling).
    generation_time_us: u64,
}

/// Worker count that leaves one core for the caller.
pub fn default_thread_count() -> usize {
    (num_cpus::get().max(2) - 1).max(1)
}

/// Generate `tiles` across up to `threads` workers.
///
/// The returned chunks are in the order of `tiles` regardless of which
/// worker finished first. The first tile error is returned, if any.
pub fn generate_tiles(
    generator: &ChunkGenerator,
    tiles: &[(i32, i32)],
    threads: usize,
) -> Result<Vec<Chunk>, TerrainError> {
    if tiles.is_empty() {
        return Ok(Vec::new());
    }
    let workers = threads.clamp(1, tiles.len());

    let (job_sender, job_receiver) = bounded::<TileJob>(tiles.len());
    let (result_sender, result_receiver) = bounded::<GeneratedTile>(tiles.len());

    for (order, &(tile_x, tile_z)) in tiles.iter().enumerate() {
        // Capacity matches the job count, so this never blocks or fails.
        let _ = job_sender.send(TileJob {
            order,
            tile_x,
            tile_z,
        });
    }
    drop(job_sender);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let receiver = job_receiver.clone();
            let sender = result_sender.clone();

            std::thread::Builder::new()
                .name("tile-gen-worker".into())
                .spawn_scoped(scope, move || {
                    let mut simulator = generator.simulator();
                    while let Ok(job) = receiver.recv() {
                        let start = Instant::now();
                        let chunk = generator.generate_tile_with(job.tile_x, job.tile_z, &mut simulator);
                        let generation_time_us = start.elapsed().as_micros() as u64;
                        trace!(
                            tile_x = job.tile_x,
                            tile_z = job.tile_z,
                            generation_time_us,
                            "tile finished"
                        );

                        let _ = sender.send(GeneratedTile {
                            order: job.order,
                            chunk,
                            generation_time_us,
                        });
                    }
                })
                .expect("Failed to spawn tile generation worker thread");
        }
    });
    drop(result_sender);

    let mut finished: Vec<GeneratedTile> = result_receiver.iter().collect();
    finished.sort_by_key(|tile| tile.order);

    let total_us: u64 = finished.iter().map(|tile| tile.generation_time_us).sum();
    debug!(tiles = finished.len(), workers, total_us, "parallel generation complete");

    finished.into_iter().map(|tile| tile.chunk).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::WorldSettings;
    use crate::erosion::ErosionSettings;

    fn settings() -> WorldSettings {
        WorldSettings {
            chunks_x: 3,
            chunks_z: 2,
            tile_width: 24,
            tile_height: 24,
            erosion_iterations: 200,
            erosion: ErosionSettings::enabled(),
            ..WorldSettings::default()
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let generator = ChunkGenerator::new(settings());
        let sequential = generator.generate_world().unwrap();
        let parallel = generator.generate_world_parallel(4).unwrap();

        assert_eq!(sequential.len(), parallel.len());
        for (a, b) in sequential.iter().zip(&parallel) {
            assert_eq!((a.tile_x(), a.tile_z()), (b.tile_x(), b.tile_z()));
            assert_eq!(a.height_map(), b.height_map(), "Tile ({}, {}) differs", a.tile_x(), a.tile_z());
            assert_eq!(a.mesh(), b.mesh());
        }
    }

    #[test]
    fn test_results_follow_request_order() {
        let generator = ChunkGenerator::new(settings());
        let tiles = [(2, 1), (0, 0), (1, 1), (-1, 3)];
        let chunks = generate_tiles(&generator, &tiles, 3).unwrap();
        let order: Vec<(i32, i32)> = chunks.iter().map(|c| (c.tile_x(), c.tile_z())).collect();
        assert_eq!(order, tiles.to_vec());
    }

    #[test]
    fn test_more_threads_than_tiles_and_zero_threads() {
        let generator = ChunkGenerator::new(settings());
        assert_eq!(generate_tiles(&generator, &[(0, 0)], 16).unwrap().len(), 1);
        assert_eq!(generate_tiles(&generator, &[(0, 0), (1, 0)], 0).unwrap().len(), 2);
        assert!(generate_tiles(&generator, &[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_default_thread_count_is_positive() {
        assert!(default_thread_count() >= 1);
    }
}
