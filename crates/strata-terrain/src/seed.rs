//! Deterministic per-tile seed derivation.
//!
//! Erosion draws droplet spawn points from a seeded RNG. Each tile gets its
//! own stream derived from the world erosion seed and the tile index, so the
//! result does not depend on generation order or thread assignment.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Derive a u64 seed for a tile from a base seed and the tile index.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine the inputs into a
/// well-distributed u64.
pub fn derive_tile_seed(base_seed: u64, tile_x: i32, tile_z: i32) -> u64 {
    let mut hasher = DefaultHasher::new();
    base_seed.hash(&mut hasher);
    tile_x.hash(&mut hasher);
    tile_z.hash(&mut hasher);
    hasher.finish()
}

/// Deterministic RNG for the given seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Deterministic RNG for one tile.
///
/// The returned RNG produces an identical sequence for the same
/// `(base_seed, tile_x, tile_z)`, regardless of thread or platform.
pub fn tile_rng(base_seed: u64, tile_x: i32, tile_z: i32) -> ChaCha8Rng {
    seeded_rng(derive_tile_seed(base_seed, tile_x, tile_z))
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_same_input_same_seed() {
        assert_eq!(derive_tile_seed(42, 3, -7), derive_tile_seed(42, 3, -7));
    }

    #[test]
    fn test_neighbouring_tiles_get_different_seeds() {
        let base = derive_tile_seed(42, 0, 0);
        assert_ne!(base, derive_tile_seed(42, 1, 0));
        assert_ne!(base, derive_tile_seed(42, 0, 1));
        assert_ne!(derive_tile_seed(42, 1, 0), derive_tile_seed(42, 0, 1));
        assert_ne!(base, derive_tile_seed(43, 0, 0));
    }

    #[test]
    fn test_tile_rng_is_reproducible() {
        let mut a = tile_rng(9, 2, 2);
        let mut b = tile_rng(9, 2, 2);
        let seq_a: Vec<u32> = (0..16).map(|_| a.random()).collect();
        let seq_b: Vec<u32> = (0..16).map(|_| b.random()).collect();
        assert_eq!(seq_a, seq_b, "Same tile must yield the same random stream");
    }
}
