//! PNG export of tile height maps.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use strata_terrain::Chunk;
use strata_terrain::debug_viz::{
    DEFAULT_SEA_LEVEL, DebugImage, render_heightmap_colored, render_heightmap_grayscale,
};
use tracing::{debug, info};

/// Errors raised while writing heightmap images.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Could not create the output directory or file.
    #[error("failed to write {path}: {source}")]
    Io {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The PNG encoder rejected the image.
    #[error("failed to encode {path}: {source}")]
    Encoding {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: png::EncodingError,
    },
}

/// Smallest and largest height across every chunk.
pub fn world_height_range(chunks: &[Chunk]) -> Option<(f32, f32)> {
    chunks
        .iter()
        .filter_map(|chunk| chunk.height_map().min_max())
        .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
}

/// Encode an RGBA debug image as PNG at `path`.
pub fn write_png(path: &Path, image: &DebugImage) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let encoding = |source| ExportError::Encoding {
        path: path.to_path_buf(),
        source,
    };

    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(encoding)?;
    writer.write_image_data(&image.pixels).map_err(encoding)?;
    writer.finish().map_err(encoding)?;
    Ok(())
}

/// Write one `tile_<x>_<z>.png` per chunk into `dir`, all on one height scale.
///
/// Returns the number of files written.
pub fn write_heightmaps(dir: &Path, chunks: &[Chunk], colored: bool) -> Result<usize, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let Some((min, max)) = world_height_range(chunks) else {
        return Ok(0);
    };

    for chunk in chunks {
        let map = chunk.height_map();
        let image = if colored {
            render_heightmap_colored(map, min, max, DEFAULT_SEA_LEVEL)
        } else {
            render_heightmap_grayscale(map, min, max)
        };
        let path = dir.join(format!("tile_{}_{}.png", chunk.tile_x(), chunk.tile_z()));
        write_png(&path, &image)?;
        debug!(path = %path.display(), "wrote heightmap image");
    }

    info!(dir = %dir.display(), files = chunks.len(), colored, "exported heightmaps");
    Ok(chunks.len())
}
