//! Height-grid mesh holding world-space vertices and triangle indices.

use crate::error::MeshError;
use crate::vertex_format::TerrainVertex;

/// Placement of a height grid in world space.
///
/// Sample `(i, j)` sits at `(origin_x + i * spacing_x, origin_z + j * spacing_z)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Number of samples along X.
    pub samples_x: usize,
    /// Number of samples along Z.
    pub samples_z: usize,
    /// World X of sample column 0.
    pub origin_x: f32,
    /// World Z of sample row 0.
    pub origin_z: f32,
    /// World distance between adjacent samples along X.
    pub spacing_x: f32,
    /// World distance between adjacent samples along Z.
    pub spacing_z: f32,
}

impl GridLayout {
    /// A layout with the same sample spacing on both axes.
    pub fn uniform(
        samples_x: usize,
        samples_z: usize,
        origin_x: f32,
        origin_z: f32,
        spacing: f32,
    ) -> Self {
        Self {
            samples_x,
            samples_z,
            origin_x,
            origin_z,
            spacing_x: spacing,
            spacing_z: spacing,
        }
    }

    /// Total number of samples (and therefore vertices).
    pub fn sample_count(&self) -> usize {
        self.samples_x * self.samples_z
    }

    /// Number of quads in the triangulated grid.
    pub fn quad_count(&self) -> usize {
        self.samples_x.saturating_sub(1) * self.samples_z.saturating_sub(1)
    }
}

/// The mesh output for one terrain tile.
///
/// Vertices are row-major (X fastest) matching the height grid; indices are
/// two triangles per quad, six `u32` per quad.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    pub(crate) layout: GridLayout,
    /// Vertex buffer.
    pub vertices: Vec<TerrainVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Build a mesh from a row-major height grid.
    pub fn from_heights(layout: GridLayout, heights: &[f32]) -> Result<Self, MeshError> {
        if heights.len() != layout.sample_count() {
            return Err(MeshError::HeightCountMismatch {
                expected: layout.sample_count(),
                actual: heights.len(),
            });
        }

        let mut vertices = Vec::with_capacity(heights.len());
        for z in 0..layout.samples_z {
            let wz = layout.origin_z + z as f32 * layout.spacing_z;
            for x in 0..layout.samples_x {
                let wx = layout.origin_x + x as f32 * layout.spacing_x;
                vertices.push(TerrainVertex::new(wx, heights[x + z * layout.samples_x], wz));
            }
        }

        Ok(Self {
            layout,
            vertices,
            indices: grid_indices(layout.samples_x, layout.samples_z),
        })
    }

    /// Rewrite every vertex's Y from a new height grid of the same size.
    ///
    /// X/Z and the index buffer are untouched.
    pub fn update_heights(&mut self, heights: &[f32]) -> Result<(), MeshError> {
        if heights.len() != self.vertices.len() {
            return Err(MeshError::HeightCountMismatch {
                expected: self.vertices.len(),
                actual: heights.len(),
            });
        }
        for (vertex, &h) in self.vertices.iter_mut().zip(heights) {
            vertex.position[1] = h;
        }
        Ok(())
    }

    /// The grid layout this mesh was built from.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Vertices as a flat `x, y, z, x, y, z, ...` slice.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw vertex bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Fixed two-triangles-per-quad index list for a `samples_x` × `samples_z` grid.
///
/// Each quad with top-left `tl` emits `tl, tl+w, tl+1, tl+1, tl+w, tl+w+1`.
pub fn grid_indices(samples_x: usize, samples_z: usize) -> Vec<u32> {
    let quads = samples_x.saturating_sub(1) * samples_z.saturating_sub(1);
    let mut indices = Vec::with_capacity(quads * 6);
    let w = samples_x as u32;

    for z in 0..samples_z.saturating_sub(1) as u32 {
        for x in 0..samples_x.saturating_sub(1) as u32 {
            let top_left = x + z * w;
            let top_right = top_left + 1;
            let bottom_left = top_left + w;
            let bottom_right = bottom_left + 1;
            indices.extend_from_slice(&[
                top_left,
                bottom_left,
                top_right,
                top_right,
                bottom_left,
                bottom_right,
            ]);
        }
    }

    indices
}
