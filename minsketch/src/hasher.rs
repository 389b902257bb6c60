//! Seeded hashing of byte strings.
use rand_xoshiro::rand_core::{RngCore, SeedableRng};

/// Generates a 64-bit hash value for a byte string.
#[inline(always)]
pub fn hash_bytes(bytes: &[u8], seed: u64) -> u64 {
    fasthash::city::hash64_with_seed(bytes, seed)
}

/// A pair of independent hash seeds expanded from one caller seed.
///
/// The expansion is deterministic: equal caller seeds always produce equal
/// pairs, so sketches built from the same seed are comparable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedPair {
    pub(crate) seed1: u64,
    pub(crate) seed2: u64,
}

impl SeedPair {
    /// Expands a caller seed into two independent seeds.
    pub fn expand(seed: u64) -> Self {
        let mut seeder = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        Self {
            seed1: seeder.next_u64(),
            seed2: seeder.next_u64(),
        }
    }
}
