//! State-vector simulation of the register.
//!
//! - `gates`: operator -> gate compilation
//! - `statevector`: dense amplitude backend
//! - `sampler`: shot loop and outcome table
//! - `strategy`: full / reduced / heuristic fallback chain

pub mod gates;
pub mod sampler;
pub mod statevector;
pub mod strategy;

pub use gates::{compile, Gate, MERGE_ANGLE};
pub use sampler::{sample_blocks, Block, Outcome, OutcomeTable};
pub use statevector::StateVector;
pub use strategy::{
    run_chain, Fidelity, FullSimulation, HeuristicReplay, ReducedSimulation, SampleRun,
    SamplingStrategy, DEFAULT_CHAIN,
};

use crate::core::SimulationResult;
use crate::register::Register;

/// Noiseless distribution over the active set: (occupied indices, probability),
/// most likely first. Before any noise filtering the probabilities sum to 1.
pub fn exact_distribution(register: &Register, budget: usize) -> SimulationResult<Vec<(Vec<usize>, f64)>> {
    let active = register.active();
    if active.is_empty() {
        return Ok(vec![(Vec::new(), 1.0)]);
    }
    let block = Block::simulate(active, register.circuit(), budget)?;
    Ok(block.distribution())
}
