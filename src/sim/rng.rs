//! Seeded random source for the simulation
//!
//! Every random draw in a run goes through one [`SimRng`] so identical seeds
//! and inputs replay identically.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    seed: u64,
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind to the start of the seed's stream
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Bernoulli trial; `p` outside `[0, 1]` is clamped
    pub fn chance(&mut self, p: f32) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.inner.random_bool(p as f64)
    }

    /// Fresh seed for the next run, drawn from this stream
    pub fn next_seed(&mut self) -> u64 {
        self.inner.random::<u64>()
    }

    /// Uniform float in `[0, 1)`
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform float in `[lo, hi)`; returns `lo` for an empty range
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..hi)
    }

    /// Uniform index into a slice of length `len` (`len` > 0)
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    /// Weighted choice; returns the index of the chosen weight.
    ///
    /// Weights must be non-negative with a positive sum.
    pub fn weighted(&mut self, weights: &[f32]) -> usize {
        let total: f32 = weights.iter().sum();
        let mut roll = self.unit() * total;
        for (i, &w) in weights.iter().enumerate() {
            if roll < w {
                return i;
            }
            roll -= w;
        }
        // Float rounding can leave the roll just past the last bucket
        weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
    }
}
