//! Vertex layout shared by every terrain mesh handed to the renderer.
//!
//! ## Attribute Packing
//!
//! | Location | Offset | Format  | Fields                 |
//! |----------|--------|---------|------------------------|
//! | 0        | 0      | Float3  | world-space x, y, z    |

use std::mem;

/// A single terrain vertex: absolute world position, nothing else.
///
/// `x`/`z` come from the tile offset and grid position, `y` is the height
/// sample. Normals and colors are derived by the renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    /// World-space position `[x, height, z]`.
    pub position: [f32; 3],
}

static_assertions::assert_eq_size!(TerrainVertex, [f32; 3]);

impl TerrainVertex {
    /// Construct a vertex from its world-space components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }

    /// The height component.
    #[inline]
    pub fn height(&self) -> f32 {
        self.position[1]
    }
}

/// Description of one vertex attribute, independent of any graphics API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttributeDesc {
    /// Shader attribute name.
    pub name: &'static str,
    /// Number of `f32` components.
    pub components: u32,
    /// Byte offset within the vertex.
    pub offset: u32,
    /// Shader location.
    pub location: u32,
}

/// The attributes of [`TerrainVertex`].
pub const TERRAIN_VERTEX_ATTRIBUTES: [VertexAttributeDesc; 1] = [VertexAttributeDesc {
    name: "a_Position",
    components: 3,
    offset: 0,
    location: 0,
}];

/// Byte stride of [`TerrainVertex`].
pub const TERRAIN_VERTEX_STRIDE: u32 = mem::size_of::<TerrainVertex>() as u32;

const _: () = assert!(
    mem::size_of::<TerrainVertex>() == 12,
    "TerrainVertex size changed; update TERRAIN_VERTEX_ATTRIBUTES"
);

const _: () = assert!(
    TERRAIN_VERTEX_ATTRIBUTES[0].offset + TERRAIN_VERTEX_ATTRIBUTES[0].components * 4
        <= TERRAIN_VERTEX_STRIDE,
    "Last attribute exceeds vertex stride"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_casts_to_float_triples() {
        let vertices = [TerrainVertex::new(1.0, 2.0, 3.0), TerrainVertex::new(4.0, 5.0, 6.0)];
        let floats: &[f32] = bytemuck::cast_slice(&vertices);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_stride_is_twelve_bytes() {
        assert_eq!(TERRAIN_VERTEX_STRIDE, 12);
        assert_eq!(TERRAIN_VERTEX_ATTRIBUTES[0].name, "a_Position");
    }
}
