//! Injectable random source
//!
//! Every stochastic draw in the simulators goes through [`RandomSource`], so a
//! run is fully determined by its configuration and seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Source of uniform and normal draws used by the simulators
pub trait RandomSource {
    /// Uniform draw in `[low, high)`; returns `low` when the range is empty
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Normal draw; returns `mean` when `std_dev <= 0`
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Bernoulli trial with success probability `p` (clamped to [0, 1])
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform index in `0..len`; `len` must be non-zero. Simulators clamp
    /// out-of-range results to `len - 1`
    fn pick(&mut self, len: usize) -> usize;
}

/// ChaCha8-backed seedable random source
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl SeededRandom {
    /// Deterministic source from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Non-reproducible source seeded from the OS
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// Seed this source was created from, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if !(high > low) {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        if !(std_dev > 0.0) {
            return mean;
        }
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick from empty range");
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}
