//! Droplet erosion tuning constants and their valid ranges.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::settings::clamp_logged;

/// Valid brush radius in cells.
pub const RADIUS_RANGE: RangeInclusive<u32> = 1..=7;
/// Valid direction inertia.
pub const INERTIA_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Valid sediment capacity multiplier.
pub const CAPACITY_FACTOR_RANGE: RangeInclusive<f32> = 0.0..=10.0;
/// Valid capacity floor.
pub const MIN_CAPACITY_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Valid erode, deposit and evaporate rates.
pub const RATE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Valid gravity.
pub const GRAVITY_RANGE: RangeInclusive<f32> = 1.0..=10.0;
/// Valid droplet lifetime in steps.
pub const LIFETIME_RANGE: RangeInclusive<u32> = 1..=100;
/// Valid starting water volume.
pub const WATER_RANGE: RangeInclusive<f32> = 1.0..=10.0;
/// Valid starting speed.
pub const SPEED_RANGE: RangeInclusive<f32> = 0.0..=3.0;
/// Valid droplet count per erosion pass.
pub const ITERATIONS_RANGE: RangeInclusive<u32> = 0..=500_000;

/// Configuration for the hydraulic erosion pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionSettings {
    /// When false, erosion is a no-op.
    pub enabled: bool,
    /// Seed for droplet spawn positions.
    pub seed: u32,
    /// Radius of the circular erosion brush.
    pub erosion_radius: u32,
    /// How much of the previous direction survives each step.
    pub inertia: f32,
    /// Multiplier on `-dh * speed * water` for sediment capacity.
    pub sediment_capacity_factor: f32,
    /// Capacity floor so droplets on flat ground still carry sediment.
    pub min_sediment_capacity: f32,
    /// Fraction of free capacity eroded per step.
    pub erode_speed: f32,
    /// Fraction of excess sediment deposited per step.
    pub deposit_speed: f32,
    /// Fraction of water lost per step.
    pub evaporate_speed: f32,
    /// Acceleration from height loss.
    pub gravity: f32,
    /// Maximum steps per droplet.
    pub max_droplet_lifetime: u32,
    /// Water carried at spawn.
    pub initial_water_volume: f32,
    /// Speed at spawn.
    pub initial_speed: f32,
}

impl Default for ErosionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            seed: 1,
            erosion_radius: 3,
            inertia: 0.05,
            sediment_capacity_factor: 4.0,
            min_sediment_capacity: 0.01,
            erode_speed: 0.3,
            deposit_speed: 0.3,
            evaporate_speed: 0.01,
            gravity: 4.0,
            max_droplet_lifetime: 30,
            initial_water_volume: 1.0,
            initial_speed: 2.0,
        }
    }
}

impl ErosionSettings {
    /// Default settings with erosion switched on.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Return a copy with every field forced into its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            enabled: self.enabled,
            seed: clamp_logged("erosion.seed", self.seed, crate::settings::SEED_RANGE),
            erosion_radius: clamp_logged("erosion_radius", self.erosion_radius, RADIUS_RANGE),
            inertia: clamp_logged("inertia", self.inertia, INERTIA_RANGE),
            sediment_capacity_factor: clamp_logged(
                "sediment_capacity_factor",
                self.sediment_capacity_factor,
                CAPACITY_FACTOR_RANGE,
            ),
            min_sediment_capacity: clamp_logged(
                "min_sediment_capacity",
                self.min_sediment_capacity,
                MIN_CAPACITY_RANGE,
            ),
            erode_speed: clamp_logged("erode_speed", self.erode_speed, RATE_RANGE),
            deposit_speed: clamp_logged("deposit_speed", self.deposit_speed, RATE_RANGE),
            evaporate_speed: clamp_logged("evaporate_speed", self.evaporate_speed, RATE_RANGE),
            gravity: clamp_logged("gravity", self.gravity, GRAVITY_RANGE),
            max_droplet_lifetime: clamp_logged(
                "max_droplet_lifetime",
                self.max_droplet_lifetime,
                LIFETIME_RANGE,
            ),
            initial_water_volume: clamp_logged(
                "initial_water_volume",
                self.initial_water_volume,
                WATER_RANGE,
            ),
            initial_speed: clamp_logged("initial_speed", self.initial_speed, SPEED_RANGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_disabled_and_in_range() {
        let settings = ErosionSettings::default();
        assert!(!settings.enabled);
        assert_eq!(settings.clamped(), settings);
        assert_eq!(ErosionSettings::enabled().clamped(), ErosionSettings::enabled());
    }

    #[test]
    fn test_clamped_pulls_values_into_range() {
        let settings = ErosionSettings {
            erosion_radius: 0,
            inertia: 1.5,
            gravity: 0.0,
            max_droplet_lifetime: 1000,
            initial_water_volume: 0.5,
            initial_speed: -1.0,
            ..ErosionSettings::enabled()
        };
        let clamped = settings.clamped();
        assert!(clamped.enabled);
        assert_eq!(clamped.erosion_radius, 1);
        assert_eq!(clamped.inertia, 1.0);
        assert_eq!(clamped.gravity, 1.0);
        assert_eq!(clamped.max_droplet_lifetime, 100);
        assert_eq!(clamped.initial_water_volume, 1.0);
        assert_eq!(clamped.initial_speed, 0.0);
    }

    #[test]
    fn test_clamped_replaces_nan() {
        let settings = ErosionSettings {
            gravity: f32::NAN,
            inertia: f32::NAN,
            ..ErosionSettings::enabled()
        };
        let clamped = settings.clamped();
        assert_eq!(clamped.gravity, *GRAVITY_RANGE.start());
        assert_eq!(clamped.inertia, *INERTIA_RANGE.start());
    }
}
