//! Seeded random number generation for reproducible stimulus.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random number generator for reproducible simulations.
///
/// Uses ChaCha8 algorithm for fast, high-quality pseudorandom numbers
/// with deterministic seed-based generation.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DeterministicRng {
    /// Creates deterministic RNG from seed value.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the seed used for this RNG.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Generates random number in range [min, max).
    pub fn random_range(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        min + (self.rng.next_u64() % (max - min))
    }

    /// Returns true with the given probability.
    pub fn random_bool(&mut self, probability: f64) -> bool {
        if probability >= 1.0 {
            return true;
        }
        (self.rng.next_u64() as f64 / u64::MAX as f64) < probability
    }
}
