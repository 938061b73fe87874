//! Collapse: one weighted draw from the filtered outcome table.

use serde::{Deserialize, Serialize};

use crate::core::EngineRng;
use crate::simulator::{Fidelity, Outcome, OutcomeTable};

/// Everything a measurement produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Register indices judged occupied, sorted.
    pub positions: Vec<usize>,

    /// Outcome table after noise filtering.
    pub table: OutcomeTable,

    /// Degrees of freedom actually simulated (0 for the heuristic).
    pub qubits_simulated: usize,

    /// Which strategy produced the table.
    pub fidelity: Fidelity,

    /// Operators left out because they crossed a chunk boundary.
    pub dropped_operators: usize,
}

impl Measurement {
    /// Whether `positions` come from a simulation rather than a guess.
    #[must_use]
    pub fn is_genuine(&self) -> bool {
        self.fidelity.is_simulated()
    }

    /// Probability of the collapsed outcome in the filtered table.
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.table.probability_of(&self.positions)
    }
}

/// Probability-weighted draw of one outcome.
///
/// Returns `None` only for an empty table.
pub fn draw<'a>(table: &'a OutcomeTable, rng: &mut EngineRng) -> Option<&'a Outcome> {
    let weights: Vec<f64> = table.iter().map(|o| o.probability).collect();
    rng.choose_weighted(&weights).map(|i| &table.outcomes()[i])
}
