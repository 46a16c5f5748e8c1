//! Noise channel settings, validation ranges, and presets.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::spline::SplinePoint;

/// Valid base frequency (scaled by `1e-3` before sampling).
pub const FREQUENCY_RANGE: RangeInclusive<f32> = 0.0..=10.0;
/// Valid octave count.
pub const OCTAVES_RANGE: RangeInclusive<i32> = 1..=10;
/// Valid per-octave amplitude gain.
pub const PERSISTENCE_RANGE: RangeInclusive<f32> = 0.1..=1.0;
/// Valid seed values.
pub const SEED_RANGE: RangeInclusive<u32> = 0..=100_000;
/// Valid shaping exponent.
pub const EXPONENT_RANGE: RangeInclusive<f32> = 0.8..=10.0;

/// Configuration for one noise channel (continentalness or erosion potential).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Base frequency. World coordinates are multiplied by `frequency * 1e-3`.
    pub frequency: f32,
    /// Number of fBm octaves.
    pub octaves: i32,
    /// Amplitude gain per octave.
    pub persistence: f32,
    /// Noise permutation seed.
    pub seed: u32,
    /// Fold the channel around its midpoint into sharp ridgelines.
    pub ridge: bool,
    /// Quantize the channel into discrete bands.
    pub terrace: bool,
    /// Number of terrace bands.
    pub terrace_count: u32,
    /// Power applied to the channel when no spline is used.
    pub exponent: f32,
    /// Output height for a channel value of 0 when no spline is used.
    pub min_height: f32,
    /// Output height for a channel value of 1 when no spline is used.
    pub max_height: f32,
    /// Remap curve. Must be sorted by `value` to behave as a lookup.
    pub spline_points: Vec<SplinePoint>,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            frequency: 2.0,
            octaves: 5,
            persistence: 0.5,
            seed: 0,
            ridge: false,
            terrace: false,
            terrace_count: 5,
            exponent: 1.0,
            min_height: 0.0,
            max_height: 1.0,
            spline_points: Vec::new(),
        }
    }
}

impl NoiseSettings {
    /// Return a copy with every field forced into its valid range.
    ///
    /// Spline points are sorted by input value. Each adjustment is logged.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        out.frequency = clamp_logged("frequency", self.frequency, FREQUENCY_RANGE);
        out.octaves = clamp_logged("octaves", self.octaves, OCTAVES_RANGE);
        out.persistence = clamp_logged("persistence", self.persistence, PERSISTENCE_RANGE);
        out.seed = clamp_logged("seed", self.seed, SEED_RANGE);
        out.exponent = clamp_logged("exponent", self.exponent, EXPONENT_RANGE);
        if out.terrace_count == 0 {
            warn!(setting = "terrace_count", "terrace_count 0 raised to 1");
            out.terrace_count = 1;
        }
        if out.max_height < out.min_height {
            warn!(
                min = out.min_height,
                max = out.max_height,
                "height range inverted, swapping"
            );
            std::mem::swap(&mut out.min_height, &mut out.max_height);
        }
        if !out
            .spline_points
            .windows(2)
            .all(|pair| pair[0].value <= pair[1].value)
        {
            warn!(setting = "spline_points", "spline points unsorted, sorting by value");
            out.spline_points.sort_by(|a, b| a.value.total_cmp(&b.value));
        }
        out
    }
}

/// Clamp `value` into `range`, logging when it changes. NaN maps to the
/// range start.
pub(crate) fn clamp_logged<T>(setting: &'static str, value: T, range: RangeInclusive<T>) -> T
where
    T: PartialOrd + Copy + std::fmt::Debug,
{
    let (min, max) = (*range.start(), *range.end());
    // NaN compares false against both bounds.
    if value.partial_cmp(&value).is_none() {
        warn!(setting, ?value, clamped = ?min, "setting is not a number, reset to minimum");
        return min;
    }
    let clamped = if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    };
    if clamped != value {
        warn!(setting, ?value, ?clamped, "setting out of range, clamped");
    }
    clamped
}

/// Named starting points for the two noise channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainPreset {
    /// Gentle rolling terrain in `[0, 1]`.
    #[default]
    Default,
    /// Low, terraced dunes and mesas.
    Desert,
    /// Steep ridged ranges.
    Mountains,
    /// Land masses rising out of a flat sea floor.
    Islands,
}

impl TerrainPreset {
    /// All presets, in declaration order.
    pub const ALL: [TerrainPreset; 4] = [
        TerrainPreset::Default,
        TerrainPreset::Desert,
        TerrainPreset::Mountains,
        TerrainPreset::Islands,
    ];

    /// Lowercase name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            TerrainPreset::Default => "default",
            TerrainPreset::Desert => "desert",
            TerrainPreset::Mountains => "mountains",
            TerrainPreset::Islands => "islands",
        }
    }

    /// Continentalness channel settings for this preset.
    pub fn continental(self) -> NoiseSettings {
        match self {
            TerrainPreset::Default => NoiseSettings::default(),
            TerrainPreset::Desert => NoiseSettings {
                frequency: 1.2,
                octaves: 3,
                persistence: 0.4,
                seed: 5203,
                terrace: true,
                terrace_count: 6,
                max_height: 40.0,
                ..NoiseSettings::default()
            },
            TerrainPreset::Mountains => NoiseSettings {
                frequency: 3.5,
                octaves: 8,
                persistence: 0.55,
                seed: 1337,
                ridge: true,
                exponent: 2.5,
                max_height: 200.0,
                ..NoiseSettings::default()
            },
            TerrainPreset::Islands => NoiseSettings {
                frequency: 2.0,
                octaves: 6,
                persistence: 0.5,
                seed: 42,
                spline_points: vec![
                    SplinePoint::new(0.0, 0.0),
                    SplinePoint::new(0.45, 2.0),
                    SplinePoint::new(0.55, 20.0),
                    SplinePoint::new(0.7, 60.0),
                    SplinePoint::new(1.0, 120.0),
                ],
                ..NoiseSettings::default()
            },
        }
    }

    /// Erosion-potential channel settings for this preset.
    pub fn erosion_potential(self) -> NoiseSettings {
        let base = NoiseSettings {
            frequency: 4.0,
            octaves: 4,
            persistence: 0.5,
            seed: 77,
            ..NoiseSettings::default()
        };
        match self {
            TerrainPreset::Default => base,
            TerrainPreset::Desert => NoiseSettings {
                max_height: 10.0,
                ..base
            },
            TerrainPreset::Mountains => NoiseSettings {
                exponent: 2.0,
                max_height: 60.0,
                ..base
            },
            TerrainPreset::Islands => NoiseSettings {
                max_height: 15.0,
                ..base
            },
        }
    }
}

impl fmt::Display for TerrainPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerrainPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TerrainPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = TerrainPreset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset '{s}', expected one of: {}", names.join(", "))
            })
    }
}
