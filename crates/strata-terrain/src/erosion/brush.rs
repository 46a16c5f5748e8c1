//! Precomputed circular erosion kernel for every cell of a grid.

use tracing::debug;

/// Per-cell `(neighbor index, weight)` lists for a `width` × `height` grid.
///
/// The kernel covers cells with squared distance `< radius²`, weighted
/// `1 - distance / radius`. Cells near an edge drop the out-of-grid part of
/// the kernel and renormalize, so every cell's weights sum to 1.
///
/// Stored flattened: cell `i` owns `entries[starts[i]..starts[i + 1]]`.
#[derive(Clone, Debug)]
pub struct ErosionBrush {
    width: usize,
    height: usize,
    radius: u32,
    starts: Vec<usize>,
    indices: Vec<u32>,
    weights: Vec<f32>,
}

impl ErosionBrush {
    /// Build the brush for a grid. `radius` 0 is treated as 1.
    pub fn new(width: usize, height: usize, radius: u32) -> Self {
        let radius = radius.max(1);
        let r = radius as i64;
        let radius_sq = r * r;

        let kernel: Vec<(i64, i64, f32)> = (-r..=r)
            .flat_map(|dz| (-r..=r).map(move |dx| (dx, dz)))
            .filter(|&(dx, dz)| dx * dx + dz * dz < radius_sq)
            .map(|(dx, dz)| {
                let distance = ((dx * dx + dz * dz) as f32).sqrt();
                (dx, dz, 1.0 - distance / radius as f32)
            })
            .collect();

        let cells = width * height;
        let mut starts = Vec::with_capacity(cells + 1);
        let mut indices = Vec::with_capacity(cells * kernel.len());
        let mut weights = Vec::with_capacity(cells * kernel.len());

        for cz in 0..height as i64 {
            for cx in 0..width as i64 {
                let start = indices.len();
                starts.push(start);

                let mut weight_sum = 0.0;
                for &(dx, dz, weight) in &kernel {
                    let (x, z) = (cx + dx, cz + dz);
                    if x >= 0 && x < width as i64 && z >= 0 && z < height as i64 {
                        indices.push((z * width as i64 + x) as u32);
                        weights.push(weight);
                        weight_sum += weight;
                    }
                }
                for w in &mut weights[start..] {
                    *w /= weight_sum;
                }
            }
        }
        starts.push(indices.len());

        debug!(width, height, radius, entries = indices.len(), "built erosion brush");
        Self {
            width,
            height,
            radius,
            starts,
            indices,
            weights,
        }
    }

    /// Returns `true` if this brush was built for the given grid and radius.
    pub fn matches(&self, width: usize, height: usize, radius: u32) -> bool {
        self.width == width && self.height == height && self.radius == radius.max(1)
    }

    /// Brush radius in cells.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Neighbor indices and weights for the cell at flat index `cell`.
    #[inline]
    pub fn cell(&self, cell: usize) -> (&[u32], &[f32]) {
        let range = self.starts[cell]..self.starts[cell + 1];
        (&self.indices[range.clone()], &self.weights[range])
    }
}
