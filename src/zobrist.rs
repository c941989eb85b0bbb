use crate::board::{MAX_SIZE, Position};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::OnceLock;

/// Zobrist keys for board states. Walls and destinations never move, so only
/// box squares and the mover square contribute to a state's key.
pub struct Zobrist {
    box_hashes: [[u64; MAX_SIZE]; MAX_SIZE],
    mover_hashes: [[u64; MAX_SIZE]; MAX_SIZE],
}

static KEYS: OnceLock<Zobrist> = OnceLock::new();

impl Zobrist {
    pub fn new() -> Self {
        // Use a seeded PRNG for reproducible Zobrist hashes
        let mut rng = ChaCha8Rng::seed_from_u64(0x123456789abcdef0);

        let mut box_hashes = [[0u64; MAX_SIZE]; MAX_SIZE];
        for row in box_hashes.iter_mut() {
            for cell in row.iter_mut() {
                *cell = rng.next_u64();
            }
        }

        let mut mover_hashes = [[0u64; MAX_SIZE]; MAX_SIZE];
        for row in mover_hashes.iter_mut() {
            for cell in row.iter_mut() {
                *cell = rng.next_u64();
            }
        }

        Zobrist {
            box_hashes,
            mover_hashes,
        }
    }

    /// Shared key table, built on first use.
    pub fn global() -> &'static Zobrist {
        KEYS.get_or_init(Zobrist::new)
    }

    /// Get hash value for a box at a specific position
    pub fn box_hash(&self, pos: Position) -> u64 {
        self.box_hashes[pos.1 as usize][pos.0 as usize]
    }

    /// Get hash value for the mover position
    pub fn mover_hash(&self, pos: Position) -> u64 {
        self.mover_hashes[pos.1 as usize][pos.0 as usize]
    }

    /// Compute the full key from a set of box positions and the mover.
    pub fn compute_hash(&self, boxes: impl IntoIterator<Item = Position>, mover: Position) -> u64 {
        boxes
            .into_iter()
            .fold(self.mover_hash(mover), |hash, pos| hash ^ self.box_hash(pos))
    }
}

impl Default for Zobrist {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_reproducible() {
        let a = Zobrist::new();
        let b = Zobrist::new();
        assert_eq!(a.box_hash((3, 4)), b.box_hash((3, 4)));
        assert_eq!(a.mover_hash((0, 0)), b.mover_hash((0, 0)));
        assert_ne!(a.box_hash((3, 4)), a.mover_hash((3, 4)));
    }

    #[test]
    fn test_compute_hash_is_order_independent() {
        let keys = Zobrist::global();
        let h1 = keys.compute_hash([(1, 1), (2, 3)], (5, 5));
        let h2 = keys.compute_hash([(2, 3), (1, 1)], (5, 5));
        assert_eq!(h1, h2);
        assert_ne!(h1, keys.compute_hash([(1, 1), (2, 3)], (5, 6)));
    }
}
