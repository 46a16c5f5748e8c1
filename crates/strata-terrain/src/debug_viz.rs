//! Terrain debug visualization: 2D images of generated height maps.
//!
//! Provides [`DebugImage`] and renderers that turn a [`HeightMap`](crate::HeightMap)
//! into a grayscale or elevation-banded picture for inspecting generation
//! output without a renderer.

mod image;
mod renderers;

pub use self::image::DebugImage;
pub use renderers::{
    DEFAULT_SEA_LEVEL, height_to_color, render_heightmap_colored, render_heightmap_grayscale,
};
