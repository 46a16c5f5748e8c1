//! Rectangular grid of height samples with a tile offset in the world.

/// Row-major height grid for one tile.
///
/// `tile_x`/`tile_z` locate the tile in the world tiling; the builder uses
/// them to derive absolute sampling coordinates. The buffer is owned by one
/// component at a time and mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    width: usize,
    height: usize,
    tile_x: i32,
    tile_z: i32,
    data: Vec<f32>,
}

impl HeightMap {
    /// Create a zero-filled height map.
    pub fn new(width: usize, height: usize, tile_x: i32, tile_z: i32) -> Self {
        Self::filled(width, height, tile_x, tile_z, 0.0)
    }

    /// Create a height map with every sample set to `value`.
    pub fn filled(width: usize, height: usize, tile_x: i32, tile_z: i32, value: f32) -> Self {
        Self {
            width,
            height,
            tile_x,
            tile_z,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// Returns `None` if `data.len() != width * height`.
    pub fn from_vec(
        width: usize,
        height: usize,
        tile_x: i32,
        tile_z: i32,
        data: Vec<f32>,
    ) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            tile_x,
            tile_z,
            data,
        })
    }

    /// Number of samples along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of samples along Z.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile index along X.
    pub fn tile_x(&self) -> i32 {
        self.tile_x
    }

    /// Tile index along Z.
    pub fn tile_z(&self) -> i32 {
        self.tile_z
    }

    /// Flat index of `(x, z)`.
    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.width && z < self.height);
        x + z * self.width
    }

    /// Sample at `(x, z)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, z)` is outside the grid.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.data[self.index(x, z)]
    }

    /// Sample at `(x, z)`, or `None` outside the grid.
    pub fn try_get(&self, x: usize, z: usize) -> Option<f32> {
        (x < self.width && z < self.height).then(|| self.data[x + z * self.width])
    }

    /// Overwrite the sample at `(x, z)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, z)` is outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: f32) {
        let idx = self.index(x, z);
        self.data[idx] = value;
    }

    /// All samples, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// All samples, row-major, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// One row of samples at depth `z`.
    pub fn row(&self, z: usize) -> &[f32] {
        &self.data[z * self.width..(z + 1) * self.width]
    }

    /// Consume the map and return its buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Smallest and largest sample, or `None` for an empty map.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &h| match acc {
            None => Some((h, h)),
            Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
        })
    }

    /// Sum of all samples, accumulated in `f64`.
    pub fn total_mass(&self) -> f64 {
        self.data.iter().map(|&h| f64::from(h)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_is_row_major() {
        let mut map = HeightMap::new(4, 3, 0, 0);
        map.set(2, 1, 5.0);
        assert_eq!(map.as_slice()[2 + 4], 5.0);
        assert_eq!(map.get(2, 1), 5.0);
        assert_eq!(map.row(1), &[0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_from_vec_validates_length() {
        assert!(HeightMap::from_vec(2, 2, 0, 0, vec![0.0; 3]).is_none());
        let map = HeightMap::from_vec(2, 2, 1, -1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!((map.tile_x(), map.tile_z()), (1, -1));
        assert_eq!(map.into_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_try_get_out_of_bounds() {
        let map = HeightMap::filled(3, 3, 0, 0, 2.0);
        assert_eq!(map.try_get(2, 2), Some(2.0));
        assert_eq!(map.try_get(3, 0), None);
        assert_eq!(map.try_get(0, 3), None);
    }

    #[test]
    fn test_min_max_and_mass() {
        let map = HeightMap::from_vec(2, 2, 0, 0, vec![1.0, -2.0, 7.5, 3.0]).unwrap();
        assert_eq!(map.min_max(), Some((-2.0, 7.5)));
        assert!((map.total_mass() - 9.5).abs() < 1e-9);
        assert_eq!(HeightMap::new(0, 0, 0, 0).min_max(), None);
    }
}
