//! Shot sampling and the outcome table.
//!
//! A [`Block`] is one independently simulated group of register indices
//! (the whole register, the active set, or one chunk of it). Each shot
//! draws one basis state from every block, maps the local bits back to
//! global indices and merges them into one occupied set.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::gates::{compile, qubit_map};
use super::statevector::{StateVector, AMPLITUDE_EPSILON};
use crate::core::{EngineRng, SimulationError, SimulationResult};
use crate::register::Operator;

/// Normalisation drift tolerated before a simulation is rejected.
const NORM_TOLERANCE: f64 = 1e-6;

/// One simulated group of register indices and its outcome distribution.
#[derive(Clone, Debug)]
pub struct Block {
    globals: Vec<usize>,
    states: Vec<u64>,
    cumulative: Vec<f64>,
}

impl Block {
    /// Simulate `circuit` restricted to `globals`.
    ///
    /// Operators that reach outside `globals` cannot be represented and are
    /// skipped.
    pub fn simulate<'a>(
        globals: Vec<usize>,
        circuit: impl IntoIterator<Item = &'a Operator>,
        budget: usize,
    ) -> SimulationResult<Self> {
        let map = qubit_map(&globals);
        let mut sv = StateVector::new(globals.len(), budget)?;
        for gates in circuit.into_iter().filter_map(|op| compile(op, &map)) {
            gates.iter().for_each(|g| sv.apply(g));
        }

        let norm = sv.norm();
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(SimulationError::Denormalised(norm.to_string()));
        }

        let mut states = Vec::new();
        let mut cumulative = Vec::new();
        let mut acc = 0.0;
        for (state, p) in sv.probabilities().into_iter().enumerate() {
            if p > AMPLITUDE_EPSILON {
                acc += p;
                states.push(state as u64);
                cumulative.push(acc);
            }
        }

        Ok(Self {
            globals,
            states,
            cumulative,
        })
    }

    /// Register indices simulated by this block.
    #[must_use]
    pub fn globals(&self) -> &[usize] {
        &self.globals
    }

    fn occupied(&self, state: u64, out: &mut Vec<usize>) {
        for (k, &g) in self.globals.iter().enumerate() {
            if state >> k & 1 == 1 {
                out.push(g);
            }
        }
    }

    fn draw(&self, rng: &mut EngineRng, out: &mut Vec<usize>) {
        if let Some(idx) = rng.sample_cumulative(&self.cumulative) {
            self.occupied(self.states[idx], out);
        }
    }

    /// Noiseless distribution: (occupied indices, probability), most likely first.
    #[must_use]
    pub fn distribution(&self) -> Vec<(Vec<usize>, f64)> {
        let mut prev = 0.0;
        let mut dist: Vec<(Vec<usize>, f64)> = self
            .states
            .iter()
            .zip(&self.cumulative)
            .map(|(&state, &c)| {
                let p = c - prev;
                prev = c;
                let mut occ = Vec::new();
                self.occupied(state, &mut occ);
                (occ, p)
            })
            .collect();
        dist.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        dist
    }
}

/// One distinct sampled outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Register indices read as occupied, sorted.
    pub occupied: Vec<usize>,
    /// Shots that produced this outcome.
    pub count: u32,
    /// `count / shots`.
    pub probability: f64,
}

/// Sampled outcomes, most frequent first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTable {
    shots: u32,
    outcomes: Vec<Outcome>,
}

impl OutcomeTable {
    /// Build a table from raw counts.
    #[must_use]
    pub fn from_counts(counts: FxHashMap<Vec<usize>, u32>, shots: u32) -> Self {
        let total = f64::from(shots.max(1));
        let mut outcomes: Vec<Outcome> = counts
            .into_iter()
            .map(|(occupied, count)| Outcome {
                occupied,
                count,
                probability: f64::from(count) / total,
            })
            .collect();
        outcomes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.occupied.cmp(&b.occupied)));
        Self { shots, outcomes }
    }

    /// A table holding a single outcome observed on every shot.
    #[must_use]
    pub fn certain(occupied: Vec<usize>, shots: u32) -> Self {
        Self {
            shots,
            outcomes: vec![Outcome {
                occupied,
                count: shots,
                probability: 1.0,
            }],
        }
    }

    /// Shots the table was built from.
    #[must_use]
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Number of distinct outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if no outcome survived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes, most frequent first.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Iterate over outcomes.
    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter()
    }

    /// Most frequent outcome.
    #[must_use]
    pub fn most_likely(&self) -> Option<&Outcome> {
        self.outcomes.first()
    }

    /// Sum of outcome probabilities. At most 1; below 1 after filtering.
    #[must_use]
    pub fn total_probability(&self) -> f64 {
        self.outcomes.iter().map(|o| o.probability).sum()
    }

    /// Probability of exactly this occupied set.
    #[must_use]
    pub fn probability_of(&self, occupied: &[usize]) -> f64 {
        self.outcomes
            .iter()
            .find(|o| o.occupied == occupied)
            .map_or(0.0, |o| o.probability)
    }

    /// Probability that `index` reads as occupied.
    #[must_use]
    pub fn marginal(&self, index: usize) -> f64 {
        self.outcomes
            .iter()
            .filter(|o| o.occupied.binary_search(&index).is_ok())
            .map(|o| o.probability)
            .sum()
    }

    /// Drop outcomes whose probability is below `noise_floor`.
    ///
    /// Probabilities are not renormalised, so filtering twice with the same
    /// floor removes nothing the second time.
    #[must_use]
    pub fn filter(mut self, noise_floor: f64) -> Self {
        self.outcomes.retain(|o| o.probability >= noise_floor);
        self
    }
}

/// Draw `shots` samples across `blocks` and tally them.
pub fn sample_blocks(blocks: &[Block], shots: u32, rng: &mut EngineRng) -> OutcomeTable {
    let mut counts: FxHashMap<Vec<usize>, u32> = FxHashMap::default();
    let mut occupied = Vec::new();

    for _ in 0..shots {
        occupied.clear();
        for block in blocks {
            block.draw(rng, &mut occupied);
        }
        occupied.sort_unstable();
        *counts.entry(occupied.clone()).or_insert(0) += 1;
    }

    OutcomeTable::from_counts(counts, shots)
}
