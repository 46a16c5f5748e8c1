//! Height map renderers: raw grayscale and elevation color bands.

use super::image::DebugImage;
use crate::heightmap::HeightMap;

/// Normalized height below which cells are drawn as water.
pub const DEFAULT_SEA_LEVEL: f32 = 0.35;

/// Normalize `h` into `[0, 1]` over `[min, max]`. A flat range maps to 0.5.
fn normalize(h: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range > 0.0 {
        ((h - min) / range).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Render a height map as grayscale, black at `min` and white at `max`.
///
/// One pixel per sample, row `z` of the map on image row `z`.
pub fn render_heightmap_grayscale(map: &HeightMap, min: f32, max: f32) -> DebugImage {
    let mut image = DebugImage::new(map.width() as u32, map.height() as u32);
    for z in 0..map.height() {
        for x in 0..map.width() {
            let v = (normalize(map.get(x, z), min, max) * 255.0) as u8;
            image.set_pixel(x as u32, z as u32, [v, v, v, 255]);
        }
    }
    image
}

/// Render a height map with elevation color bands over `[min, max]`.
///
/// Pass the world-wide range so neighbouring tiles share one color scale.
pub fn render_heightmap_colored(map: &HeightMap, min: f32, max: f32, sea_level: f32) -> DebugImage {
    let mut image = DebugImage::new(map.width() as u32, map.height() as u32);
    for z in 0..map.height() {
        for x in 0..map.width() {
            let [r, g, b] = height_to_color(normalize(map.get(x, z), min, max), sea_level);
            image.set_pixel(x as u32, z as u32, [r, g, b, 255]);
        }
    }
    image
}

/// Map a normalized height `[0, 1]` to an RGB color.
///
/// Color bands: deep water → shallow water → beach → lowlands → mountains → snow.
pub fn height_to_color(normalized: f32, sea_level: f32) -> [u8; 3] {
    if normalized < sea_level * 0.5 {
        // Deep water: dark blue
        [0, 0, 128]
    } else if normalized < sea_level {
        // Shallow water: blue
        [30, 80, 200]
    } else if normalized < sea_level + 0.02 {
        // Beach: sandy yellow
        [220, 200, 130]
    } else if normalized < 0.55 {
        // Lowlands: green
        let t = ((normalized - sea_level) / (0.55 - sea_level)).clamp(0.0, 1.0);
        [
            (30.0 + t * 80.0) as u8,
            (160.0 - t * 40.0) as u8,
            (30.0 + t * 20.0) as u8,
        ]
    } else if normalized < 0.75 {
        // Mountains: brown
        let t = (normalized - 0.55) / 0.2;
        [
            (110.0 + t * 40.0) as u8,
            (120.0 - t * 50.0) as u8,
            (50.0 + t * 20.0) as u8,
        ]
    } else {
        // Snow peaks: white
        let t = ((normalized - 0.75) / 0.25).min(1.0);
        let base = (150.0 + t * 105.0) as u8;
        [base, base, base]
    }
}
