//! Headless terrain generator.
//!
//! Loads `config.ron`, applies command-line overrides, generates and erodes
//! every tile in parallel, registers the meshes with an in-memory buffer
//! sink, and optionally exports heightmap PNGs.
//!
//! Run with: `cargo run -p strata-cli -- --preset mountains --erosion true`

mod export;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use strata_config::{CliArgs, Config, default_config_dir};
use strata_mesh::{BufferRegistry, MeshSink, water_plane};
use strata_terrain::debug_viz::DEFAULT_SEA_LEVEL;
use strata_terrain::{TerrainError, World, default_thread_count};
use tracing::{error, info};

use crate::export::{ExportError, world_height_range};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    strata_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );
    if let Some(e) = load_error {
        error!("{e}; continuing with default settings");
    }

    let config = config.validated();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), AppError> {
    let settings = &config.world;
    let threads = match config.generation.threads {
        0 => default_thread_count(),
        n => n,
    };
    info!(
        "World: {}x{} tiles of {}x{} samples | LOD {} | erosion {} ({} droplets/tile) | {} threads",
        settings.chunks_x,
        settings.chunks_z,
        settings.tile_width,
        settings.tile_height,
        settings.lod,
        if settings.erosion.enabled { "on" } else { "off" },
        settings.erosion_iterations,
        threads,
    );

    let start = Instant::now();
    let mut world = World::with_threads(settings.clone(), threads)?;
    let generated = start.elapsed();

    let mut registry = BufferRegistry::new();
    world.upload(&mut registry)?;

    let (min, max) = world_height_range(world.chunks()).unwrap_or((0.0, 0.0));
    let level = min + (max - min) * DEFAULT_SEA_LEVEL;
    let extent_x = settings.chunks_x as f32 * settings.tile_width.saturating_sub(1) as f32;
    let extent_z = settings.chunks_z as f32 * settings.tile_height.saturating_sub(1) as f32;
    registry.create(&water_plane(extent_x, extent_z, level));

    let triangles: usize = world.chunks().iter().map(|c| c.mesh().triangle_count()).sum();
    info!(
        "Generated {} tiles in {:.1?}: heights [{:.2}, {:.2}], water at {:.2}",
        world.chunks().len(),
        generated,
        min,
        max,
        level,
    );
    info!(
        "Registered {} buffers, {} triangles, {} KiB",
        registry.len(),
        triangles,
        registry.bytes_in_use() / 1024,
    );

    if let Some(dir) = &config.export.heightmap_dir {
        export::write_heightmaps(dir, world.chunks(), config.export.colored)?;
    }
    Ok(())
}
