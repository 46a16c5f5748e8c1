//! Command-line argument parsing for the terrain generator.

use std::path::PathBuf;

use clap::Parser;
use strata_terrain::TerrainPreset;

use crate::Config;

/// Terrain generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Procedural terrain generator")]
pub struct CliArgs {
    /// Tiles along X.
    #[arg(long)]
    pub chunks_x: Option<u32>,

    /// Tiles along Z.
    #[arg(long)]
    pub chunks_z: Option<u32>,

    /// Samples per tile edge (sets both width and height).
    #[arg(long)]
    pub tile_size: Option<usize>,

    /// Level-of-detail multiplier.
    #[arg(long)]
    pub lod: Option<u32>,

    /// Noise seed (the erosion-potential channel uses seed + 1).
    #[arg(long)]
    pub seed: Option<u32>,

    /// Noise channel preset (default, desert, mountains, islands).
    #[arg(long)]
    pub preset: Option<TerrainPreset>,

    /// Enable hydraulic erosion.
    #[arg(long)]
    pub erosion: Option<bool>,

    /// Droplets per tile.
    #[arg(long)]
    pub erosion_iterations: Option<u32>,

    /// Subtract the erosion-potential channel from the continental channel.
    #[arg(long)]
    pub blend: Option<bool>,

    /// Worker threads (0 = automatic).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write per-tile heightmap PNGs into this directory.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// A preset replaces both noise channels before any other override.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let world = &mut self.world;
        if let Some(preset) = args.preset {
            world.continental = preset.continental();
            world.erosion_potential = preset.erosion_potential();
        }
        if let Some(x) = args.chunks_x {
            world.chunks_x = x;
        }
        if let Some(z) = args.chunks_z {
            world.chunks_z = z;
        }
        if let Some(size) = args.tile_size {
            world.tile_width = size;
            world.tile_height = size;
        }
        if let Some(lod) = args.lod {
            world.lod = lod;
        }
        if let Some(seed) = args.seed {
            world.continental.seed = seed;
            world.erosion_potential.seed = seed.wrapping_add(1);
        }
        if let Some(enabled) = args.erosion {
            world.erosion.enabled = enabled;
        }
        if let Some(iterations) = args.erosion_iterations {
            world.erosion_iterations = iterations;
        }
        if let Some(blend) = args.blend {
            world.blend = blend;
        }
        if let Some(threads) = args.threads {
            self.generation.threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.export_dir {
            self.export.heightmap_dir = Some(dir.clone());
        }
    }
}
