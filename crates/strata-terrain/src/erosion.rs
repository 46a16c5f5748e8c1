//! Droplet-based hydraulic erosion.
//!
//! Each iteration spawns one droplet at a random interior cell and lets it
//! run downhill for up to `max_droplet_lifetime` steps, lifting material on
//! descents and dropping it when it slows or climbs. The grid is mutated in
//! place by a single writer.

pub mod brush;
pub mod droplet;
pub mod settings;

use rand::Rng;
use tracing::{debug, warn};

use crate::heightmap::HeightMap;
use crate::seed::{derive_tile_seed, seeded_rng};

pub use brush::ErosionBrush;
pub use droplet::{Droplet, HeightAndGradient, StepOutcome, TerminationReason, height_and_gradient};
pub use settings::ErosionSettings;

/// Counters collected over one erosion pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ErosionStats {
    /// Droplets simulated.
    pub droplets: u32,
    /// Steps that eroded or deposited.
    pub steps: u64,
    /// Material lifted from the grid.
    pub eroded: f64,
    /// Material returned to the grid.
    pub deposited: f64,
    /// Droplets that ran their full lifetime.
    pub ended_lifetime: u32,
    /// Droplets stopped on flat ground.
    pub ended_flat: u32,
    /// Droplets that left the interior.
    pub ended_out_of_bounds: u32,
}

impl ErosionStats {
    /// Sediment still carried by droplets when they stopped.
    pub fn carried_off(&self) -> f64 {
        self.eroded - self.deposited
    }

    fn record_end(&mut self, reason: TerminationReason) {
        match reason {
            TerminationReason::Lifetime => self.ended_lifetime += 1,
            TerminationReason::Flat => self.ended_flat += 1,
            TerminationReason::OutOfBounds => self.ended_out_of_bounds += 1,
        }
    }
}

/// Runs erosion passes and caches the brush between them.
#[derive(Clone, Debug)]
pub struct ErosionSimulator {
    settings: ErosionSettings,
    brush: Option<ErosionBrush>,
}

impl ErosionSimulator {
    /// Create a simulator. The brush is built lazily on the first pass.
    pub fn new(settings: ErosionSettings) -> Self {
        Self {
            settings,
            brush: None,
        }
    }

    /// The simulator's settings.
    pub fn settings(&self) -> &ErosionSettings {
        &self.settings
    }

    /// Replace the settings. The brush is kept if the radius is unchanged.
    pub fn set_settings(&mut self, settings: ErosionSettings) {
        self.settings = settings;
    }

    /// Erode a square `map_size` × `map_size` grid with `iterations` droplets.
    ///
    /// Spawn positions come from the settings seed.
    pub fn erode(&mut self, map: &mut [f32], map_size: usize, iterations: u32) {
        self.erode_rect(map, map_size, map_size, iterations);
    }

    /// Erode a `width` × `height` grid with `iterations` droplets.
    pub fn erode_rect(&mut self, map: &mut [f32], width: usize, height: usize, iterations: u32) {
        let seed = u64::from(self.settings.seed);
        self.erode_with_stats(map, width, height, iterations, seed);
    }

    /// Erode one tile's height map.
    ///
    /// The spawn sequence is derived from the settings seed and the tile
    /// index so neighbouring tiles do not share droplet paths.
    pub fn erode_height_map(&mut self, map: &mut HeightMap, iterations: u32) -> ErosionStats {
        let seed = derive_tile_seed(u64::from(self.settings.seed), map.tile_x(), map.tile_z());
        let (width, height) = (map.width(), map.height());
        self.erode_with_stats(map.as_mut_slice(), width, height, iterations, seed)
    }

    /// Erode a `width` × `height` grid with droplets spawned from `rng_seed`.
    ///
    /// Disabled settings, grids smaller than 3 × 3 and mismatched buffers
    /// leave `map` untouched.
    pub fn erode_with_stats(
        &mut self,
        map: &mut [f32],
        width: usize,
        height: usize,
        iterations: u32,
        rng_seed: u64,
    ) -> ErosionStats {
        let mut stats = ErosionStats::default();
        if !self.settings.enabled || iterations == 0 {
            return stats;
        }
        if width < 3 || height < 3 {
            debug!(width, height, "grid too small to erode");
            return stats;
        }
        if map.len() != width * height {
            warn!(len = map.len(), width, height, "erosion buffer does not match grid size");
            return stats;
        }

        let brush = cached_brush(&mut self.brush, width, height, self.settings.erosion_radius);
        let settings = &self.settings;
        let mut rng = seeded_rng(rng_seed);

        for _ in 0..iterations {
            let x = rng.random_range(0..=width - 2) as f32;
            let z = rng.random_range(0..=height - 2) as f32;
            let mut droplet = Droplet::spawn(x, z, settings);
            stats.droplets += 1;

            let mut reason = TerminationReason::Lifetime;
            for _ in 0..settings.max_droplet_lifetime {
                match droplet.step(map, width, height, brush, settings) {
                    StepOutcome::Deposited(amount) => {
                        stats.steps += 1;
                        stats.deposited += f64::from(amount);
                    }
                    StepOutcome::Eroded(amount) => {
                        stats.steps += 1;
                        stats.eroded += f64::from(amount);
                    }
                    StepOutcome::Terminated(end) => {
                        reason = end;
                        break;
                    }
                }
            }
            stats.record_end(reason);
        }

        debug!(
            width,
            height,
            droplets = stats.droplets,
            steps = stats.steps,
            eroded = stats.eroded,
            deposited = stats.deposited,
            "erosion pass complete"
        );
        stats
    }
}

fn cached_brush(
    cache: &mut Option<ErosionBrush>,
    width: usize,
    height: usize,
    radius: u32,
) -> &ErosionBrush {
    if !cache
        .as_ref()
        .is_some_and(|brush| brush.matches(width, height, radius))
    {
        *cache = None;
    }
    cache.get_or_insert_with(|| ErosionBrush::new(width, height, radius))
}
