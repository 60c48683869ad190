//! # World Seed
//!
//! One u64 from which every random decision in a session derives.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, generation, spawn choice, and drop jitter
//! produce **exactly** the same results on any platform, any time. The
//! cipher-based RNG avoids platform-dependent stream differences.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// World seed for deterministic generation.
///
/// All procedural streams derive from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., drop jitter).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        // FNV-1a hash mixing
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Builds the deterministic RNG stream for this seed.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xD1C4_B100_D5ED_BEDD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_derive_is_deterministic() {
        let seed = WorldSeed::new(42);
        assert_eq!(seed.derive(7), seed.derive(7));
        assert_ne!(seed.derive(7), seed.derive(8));
        assert_ne!(seed.derive(7), seed);
    }

    #[test]
    fn test_distinct_seeds_distinct_streams() {
        let a = WorldSeed::new(1).derive(100);
        let b = WorldSeed::new(2).derive(100);
        assert_ne!(a, b);
    }

    #[test]
    fn test_rng_reproducibility() {
        let mut a = WorldSeed::new(42).rng();
        let mut b = WorldSeed::new(42).rng();
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }

        let mut c = WorldSeed::new(43).rng();
        let mut d = WorldSeed::new(42).rng();
        let differs = (0..32).any(|_| c.next_u64() != d.next_u64());
        assert!(differs, "distinct seeds should give distinct streams");
    }
}
