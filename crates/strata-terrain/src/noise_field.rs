//! Multi-octave fractal Brownian motion (fBm) noise normalized to `[0, 1]`.
//!
//! Composites octaves of Perlin noise, each doubling in frequency and scaled
//! in amplitude by `persistence`, then divides by the accumulated amplitude so
//! the result is independent of octave count.

use noise::{NoiseFn, Perlin};

/// Frequency multiplier between successive octaves.
pub const LACUNARITY: f64 = 2.0;

/// Deterministic 2D coherent-noise evaluator for one seed.
///
/// Building the permutation table is the expensive part, so a field is
/// created once per seed and sampled many times.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perlin: Perlin,
    seed: u32,
}

impl NoiseField {
    /// Create a noise field for the given seed.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample fBm noise at `(x, z)`.
    ///
    /// Returns a value in `[0, 1]`. `octaves <= 0` is treated as one octave.
    pub fn sample(&self, x: f64, z: f64, octaves: i32, persistence: f32) -> f32 {
        let octaves = octaves.max(1);
        let persistence = f64::from(persistence);

        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut amplitude_sum = 0.0;

        for _ in 0..octaves {
            total += self.perlin.get([x * frequency, z * frequency]) * amplitude;
            amplitude_sum += amplitude;

            frequency *= LACUNARITY;
            amplitude *= persistence;
        }

        if amplitude_sum <= 0.0 {
            return 0.5;
        }

        // Normalize [-1, 1] to [0, 1].
        let normalized = (total / amplitude_sum) * 0.5 + 0.5;
        normalized.clamp(0.0, 1.0) as f32
    }
}

/// One-shot sample for callers that do not keep a [`NoiseField`] around.
pub fn sample_noise(x: f64, z: f64, seed: u32, octaves: i32, persistence: f32) -> f32 {
    NoiseField::new(seed).sample(x, z, octaves, persistence)
}
