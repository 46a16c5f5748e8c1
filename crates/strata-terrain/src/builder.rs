//! Two-channel height field synthesis for one tile.
//!
//! Each cell samples a continentalness channel and, when blending, an
//! erosion-potential channel at its absolute world coordinate, so tiles that
//! share an edge agree on the heights along it.

use tracing::debug;

use crate::heightmap::HeightMap;
use crate::noise_field::NoiseField;
use crate::settings::NoiseSettings;
use crate::spline;

/// World coordinates are multiplied by `frequency * FREQUENCY_SCALE`.
pub const FREQUENCY_SCALE: f64 = 1e-3;

/// Fold `n` around 0.5: `2 * (0.5 - |0.5 - n|)`.
#[inline]
pub fn ridge(n: f32) -> f32 {
    2.0 * (0.5 - (0.5 - n).abs())
}

/// Quantize `n` into `terrace_count` bands. A count of 0 is treated as 1.
#[inline]
pub fn terrace(n: f32, terrace_count: u32) -> f32 {
    let band = 1.0 / terrace_count.max(1) as f32;
    (n / band).floor() * band
}

/// Samples per axis for a tile `extent` samples wide at level of detail `lod`.
///
/// The physical footprint stays `extent - 1` world units; `lod` multiplies the
/// number of intervals inside it.
pub fn lod_sample_count(extent: usize, lod: u32) -> usize {
    if extent == 0 {
        return 0;
    }
    (extent - 1) * lod.max(1) as usize + 1
}

/// World coordinate of a tile's first sample along one axis.
///
/// Adjacent tiles overlap by one sample so their edges coincide.
pub fn tile_origin(tile: i32, extent: usize) -> f64 {
    f64::from(tile) * extent.saturating_sub(1) as f64
}

/// One noise channel: a seeded field plus its shaping settings.
#[derive(Clone, Debug)]
pub struct NoiseChannel {
    field: NoiseField,
    settings: NoiseSettings,
    frequency: f64,
}

impl NoiseChannel {
    /// Build a channel from settings.
    pub fn new(settings: NoiseSettings) -> Self {
        Self {
            field: NoiseField::new(settings.seed),
            frequency: f64::from(settings.frequency) * FREQUENCY_SCALE,
            settings,
        }
    }

    /// The channel's settings.
    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Raw fBm noise at a world coordinate, in `[0, 1]`.
    pub fn raw(&self, wx: f64, wz: f64) -> f32 {
        self.field.sample(
            wx * self.frequency,
            wz * self.frequency,
            self.settings.octaves,
            self.settings.persistence,
        )
    }

    /// Shaped channel value at a world coordinate.
    pub fn sample(&self, wx: f64, wz: f64) -> f32 {
        self.shape(self.raw(wx, wz))
    }

    /// Apply spline remap, ridge, terrace and (without a spline) the
    /// exponent / height range to a raw noise value.
    pub fn shape(&self, raw: f32) -> f32 {
        let s = &self.settings;
        let has_spline = spline::is_usable(&s.spline_points);

        let mut v = if has_spline {
            spline::remap(raw, &s.spline_points)
        } else {
            raw
        };
        if s.ridge {
            v = ridge(v);
        }
        if s.terrace {
            v = terrace(v, s.terrace_count);
        }
        if !has_spline {
            v = s.min_height + v.max(0.0).powf(s.exponent) * (s.max_height - s.min_height);
        }
        v
    }
}

/// Produces [`HeightMap`]s for tiles from two noise channels.
#[derive(Clone, Debug)]
pub struct HeightMapBuilder {
    continental: NoiseChannel,
    erosion_potential: NoiseChannel,
    blend: bool,
    erosion_factor: f32,
}

impl HeightMapBuilder {
    /// Create a builder. Blending is off and the erosion factor is 1.
    pub fn new(continental: NoiseSettings, erosion_potential: NoiseSettings) -> Self {
        Self {
            continental: NoiseChannel::new(continental),
            erosion_potential: NoiseChannel::new(erosion_potential),
            blend: false,
            erosion_factor: 1.0,
        }
    }

    /// Enable or disable subtracting the erosion-potential channel.
    pub fn with_blend(mut self, blend: bool) -> Self {
        self.blend = blend;
        self
    }

    /// Scale applied to the erosion-potential channel when blending.
    pub fn with_erosion_factor(mut self, erosion_factor: f32) -> Self {
        self.erosion_factor = erosion_factor;
        self
    }

    /// Whether blending is enabled.
    pub fn blend(&self) -> bool {
        self.blend
    }

    /// Final height at an absolute world coordinate.
    ///
    /// With blending the result is `clamp(c - e * factor, 0, c)`: the
    /// erosion-potential channel only ever lowers the continental height.
    pub fn height_at(&self, wx: f64, wz: f64) -> f32 {
        let continental = self.continental.sample(wx, wz);
        if !self.blend {
            return continental;
        }
        let erosion = self.erosion_potential.sample(wx, wz);
        (continental - erosion * self.erosion_factor).clamp(0.0, continental.max(0.0))
    }

    /// Build a `width` × `height` tile at tile index `(tile_x, tile_z)`.
    pub fn build(&self, width: usize, height: usize, tile_x: i32, tile_z: i32) -> HeightMap {
        self.build_lod(width, height, tile_x, tile_z, 1)
    }

    /// Build a tile at level of detail `lod`.
    ///
    /// The tile covers the same world footprint as at `lod = 1` but with
    /// [`lod_sample_count`] samples per axis.
    pub fn build_lod(
        &self,
        width: usize,
        height: usize,
        tile_x: i32,
        tile_z: i32,
        lod: u32,
    ) -> HeightMap {
        let lod = lod.max(1);
        let samples_x = lod_sample_count(width, lod);
        let samples_z = lod_sample_count(height, lod);
        let origin_x = tile_origin(tile_x, width);
        let origin_z = tile_origin(tile_z, height);
        let step = 1.0 / f64::from(lod);

        let mut map = HeightMap::new(samples_x, samples_z, tile_x, tile_z);
        for z in 0..samples_z {
            let wz = origin_z + z as f64 * step;
            for x in 0..samples_x {
                let wx = origin_x + x as f64 * step;
                map.set(x, z, self.height_at(wx, wz));
            }
        }

        if let Some((min, max)) = map.min_max() {
            debug!(tile_x, tile_z, samples_x, samples_z, min, max, "built height map");
        }
        map
    }
}

/// Build one tile's height map without keeping a builder around.
pub fn build_height_map(
    width: usize,
    height: usize,
    tile_x: i32,
    tile_z: i32,
    continental: &NoiseSettings,
    erosion_potential: &NoiseSettings,
    blend: bool,
) -> HeightMap {
    HeightMapBuilder::new(continental.clone(), erosion_potential.clone())
        .with_blend(blend)
        .build(width, height, tile_x, tile_z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::SplinePoint;

    const EPSILON: f32 = 1e-5;

    fn continental() -> NoiseSettings {
        NoiseSettings {
            frequency: 8.0,
            octaves: 5,
            seed: 42,
            ..NoiseSettings::default()
        }
    }

    fn erosion_potential() -> NoiseSettings {
        NoiseSettings {
            frequency: 9.5,
            octaves: 3,
            seed: 7,
            ..NoiseSettings::default()
        }
    }

    #[test]
    fn test_ridge_folds_around_midpoint() {
        assert!((ridge(0.5) - 1.0).abs() < EPSILON);
        assert!(ridge(0.0).abs() < EPSILON);
        assert!(ridge(1.0).abs() < EPSILON);
        assert!((ridge(0.25) - ridge(0.75)).abs() < EPSILON);
    }

    #[test]
    fn test_terrace_quantizes_into_bands() {
        assert!((terrace(0.37, 5) - 0.2).abs() < EPSILON);
        assert!((terrace(0.99, 4) - 0.75).abs() < EPSILON);
        assert_eq!(terrace(0.5, 0), 0.0);
    }

    #[test]
    fn test_lod_sample_count() {
        assert_eq!(lod_sample_count(4, 1), 4);
        assert_eq!(lod_sample_count(4, 2), 7);
        assert_eq!(lod_sample_count(4, 0), 4);
        assert_eq!(lod_sample_count(0, 3), 0);
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = HeightMapBuilder::new(continental(), erosion_potential()).with_blend(true);
        let a = builder.build(16, 16, 3, -2);
        let b = builder.build(16, 16, 3, -2);
        assert_eq!(a, b, "Same settings and tile must produce identical maps");
    }

    #[test]
    fn test_adjacent_tiles_match_along_shared_edge() {
        let builder = HeightMapBuilder::new(continental(), erosion_potential());
        let tile0 = builder.build(4, 4, 0, 0);
        let tile1 = builder.build(4, 4, 1, 0);

        for z in 0..4 {
            assert!(
                (tile0.get(3, z) - tile1.get(0, z)).abs() < EPSILON,
                "Seam mismatch at z={z}: {} vs {}",
                tile0.get(3, z),
                tile1.get(0, z)
            );
        }
    }

    #[test]
    fn test_seam_continuity_along_z_with_blend_and_lod() {
        let builder = HeightMapBuilder::new(continental(), erosion_potential()).with_blend(true);
        let lower = builder.build_lod(9, 9, 2, 4, 2);
        let upper = builder.build_lod(9, 9, 2, 5, 2);
        let last = lower.height() - 1;

        for x in 0..lower.width() {
            assert!(
                (lower.get(x, last) - upper.get(x, 0)).abs() < EPSILON,
                "Seam mismatch at x={x}"
            );
        }
    }

    #[test]
    fn test_blend_never_exceeds_continental_or_goes_negative() {
        let unblended = HeightMapBuilder::new(continental(), erosion_potential());
        let blended = unblended.clone().with_blend(true).with_erosion_factor(0.8);
        assert!(!unblended.blend());
        assert!(blended.blend());

        let plain = unblended.build(32, 32, 1, 1);
        let mixed = blended.build(32, 32, 1, 1);

        for (&c, &h) in plain.as_slice().iter().zip(mixed.as_slice()) {
            assert!(h >= 0.0, "Blended height {h} is negative");
            assert!(h <= c + EPSILON, "Blended height {h} exceeds continental {c}");
        }
    }

    #[test]
    fn test_blend_disabled_is_continental_alone() {
        let builder = HeightMapBuilder::new(continental(), erosion_potential());
        let map = builder.build(8, 8, 0, 0);
        let channel = NoiseChannel::new(continental());
        assert_eq!(map.get(5, 2), channel.sample(5.0, 2.0));
    }

    #[test]
    fn test_lod_keeps_footprint_and_matches_base_samples() {
        let builder = HeightMapBuilder::new(continental(), erosion_potential());
        let base = builder.build(5, 5, 1, 0);
        let fine = builder.build_lod(5, 5, 1, 0, 2);

        assert_eq!((fine.width(), fine.height()), (9, 9));
        for z in 0..5 {
            for x in 0..5 {
                assert!((base.get(x, z) - fine.get(x * 2, z * 2)).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_default_channel_passes_raw_noise_through() {
        let channel = NoiseChannel::new(NoiseSettings::default());
        for raw in [0.0, 0.1, 0.5, 0.93, 1.0] {
            assert_eq!(channel.shape(raw), raw);
        }
    }

    #[test]
    fn test_spline_channel_skips_height_range() {
        let channel = NoiseChannel::new(NoiseSettings {
            spline_points: vec![SplinePoint::new(0.0, 10.0), SplinePoint::new(1.0, 110.0)],
            max_height: 5000.0,
            ..NoiseSettings::default()
        });
        assert!((channel.shape(0.5) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_exponent_and_height_range_shape_without_spline() {
        let channel = NoiseChannel::new(NoiseSettings {
            exponent: 2.0,
            min_height: 10.0,
            max_height: 110.0,
            ..NoiseSettings::default()
        });
        assert!((channel.shape(0.5) - 35.0).abs() < 1e-3);
    }

    #[test]
    fn test_build_height_map_matches_builder() {
        let direct = build_height_map(6, 6, 0, 1, &continental(), &erosion_potential(), true);
        let via_builder = HeightMapBuilder::new(continental(), erosion_potential())
            .with_blend(true)
            .build(6, 6, 0, 1);
        assert_eq!(direct, via_builder);
    }
}
