//! Deterministic random number generation for shot sampling and collapse.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical measurements
//! - **Forkable**: Independent streams per measurement or per chunk
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use quantum_ludo::core::EngineRng;
//!
//! let mut rng = EngineRng::new(42);
//! let mut shots = rng.fork();
//!
//! let mut rng2 = EngineRng::new(42);
//! let mut shots2 = rng2.fork();
//! assert_eq!(shots.unit(), shots2.unit());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct EngineRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl EngineRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent, deterministic branch.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }

    /// Uniform sample from [0, 1).
    pub fn unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Choose an index with probability proportional to its weight.
    ///
    /// Weights do not need to sum to 1.0.
    /// Returns `None` if weights are empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || total <= 0.0 {
            return None;
        }

        let mut threshold = self.unit() * total;

        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold < 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return last non-zero weight
        weights.iter().rposition(|&w| w > 0.0)
    }

    /// Draw an index from a cumulative distribution (last entry = total mass).
    ///
    /// Used in the shot loop, where the same distribution is sampled many times.
    pub fn sample_cumulative(&mut self, cumulative: &[f64]) -> Option<usize> {
        let total = *cumulative.last()?;
        if total <= 0.0 {
            return None;
        }
        let target = self.unit() * total;
        let idx = cumulative.partition_point(|&c| c <= target);
        Some(idx.min(cumulative.len() - 1))
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> EngineRngState {
        EngineRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &EngineRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}
