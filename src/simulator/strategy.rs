//! Simulation strategies and the fallback chain.
//!
//! Strategies are tried in order until one succeeds:
//!
//! 1. [`FullSimulation`]: every register index, exact. Fails when the
//!    register exceeds the qubit budget.
//! 2. [`ReducedSimulation`]: only the active set. Above the chunk threshold
//!    the active set is cut into fixed-size chunks that are simulated and
//!    sampled independently. Entanglement across chunk boundaries is lost.
//! 3. [`HeuristicReplay`]: no simulation; replays the program classically.
//!    Never fails, but the result is tagged [`Fidelity::Heuristic`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::sampler::{sample_blocks, Block, OutcomeTable};
use crate::core::{EngineConfig, EngineRng, MeasureError, SimulationError, SimulationResult};
use crate::register::{Operator, Register};

/// How trustworthy a sampled table is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fidelity {
    /// The whole register was simulated.
    Exact,
    /// Only the active set was simulated, in `chunks` independent chunks.
    Reduced { chunks: usize },
    /// Best-effort guess from the program, no simulation.
    Heuristic,
}

impl Fidelity {
    /// Whether the table came from an actual simulation.
    #[must_use]
    pub fn is_simulated(self) -> bool {
        !matches!(self, Fidelity::Heuristic)
    }
}

/// Result of one strategy run, before noise filtering.
#[derive(Clone, Debug)]
pub struct SampleRun {
    pub table: OutcomeTable,
    pub qubits_simulated: usize,
    pub fidelity: Fidelity,
    pub dropped_operators: usize,
}

/// One way of turning a register into sampled outcomes.
pub trait SamplingStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Sample the register.
    fn run(
        &self,
        register: &Register,
        config: &EngineConfig,
        rng: &mut EngineRng,
    ) -> SimulationResult<SampleRun>;
}

/// Simulate every register index.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullSimulation;

impl SamplingStrategy for FullSimulation {
    fn name(&self) -> &'static str {
        "full"
    }

    fn run(
        &self,
        register: &Register,
        config: &EngineConfig,
        rng: &mut EngineRng,
    ) -> SimulationResult<SampleRun> {
        let globals: Vec<usize> = (0..register.len()).collect();
        let block = Block::simulate(globals, register.circuit(), config.max_qubits)?;
        let table = sample_blocks(std::slice::from_ref(&block), config.shots, rng);
        Ok(SampleRun {
            table,
            qubits_simulated: register.len(),
            fidelity: Fidelity::Exact,
            dropped_operators: 0,
        })
    }
}

/// Simulate only the active set, chunked when it is large.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReducedSimulation;

impl SamplingStrategy for ReducedSimulation {
    fn name(&self) -> &'static str {
        "reduced"
    }

    fn run(
        &self,
        register: &Register,
        config: &EngineConfig,
        rng: &mut EngineRng,
    ) -> SimulationResult<SampleRun> {
        let active = register.active();
        if active.is_empty() {
            // Nothing was ever touched: the only outcome is the empty board.
            return Ok(SampleRun {
                table: OutcomeTable::certain(Vec::new(), config.shots),
                qubits_simulated: 0,
                fidelity: Fidelity::Reduced { chunks: 0 },
                dropped_operators: 0,
            });
        }

        let qubits = active.len();
        let chunks = if qubits > config.chunk_threshold {
            chunk_active(&interaction_order(register, &active), config.chunk_size)
        } else {
            vec![active]
        };

        let dropped_operators = count_straddling(register, &chunks);
        let blocks = chunks
            .into_iter()
            .map(|globals| Block::simulate(globals, register.circuit(), config.max_qubits))
            .collect::<SimulationResult<Vec<_>>>()?;

        let table = sample_blocks(&blocks, config.shots, rng);
        Ok(SampleRun {
            table,
            qubits_simulated: qubits,
            fidelity: Fidelity::Reduced {
                chunks: blocks.len(),
            },
            dropped_operators,
        })
    }
}

/// Classical replay of the program.
///
/// Spawns toggle occupancy, switches exchange it, moves land on their first
/// destination and merges on `merge_in`. Captures and rotations are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicReplay;

impl HeuristicReplay {
    /// Best-effort occupied set.
    #[must_use]
    pub fn replay(register: &Register) -> Vec<usize> {
        let mut occupied = vec![false; register.len()];
        for op in register.program() {
            match op {
                Operator::Spawn { targets } => {
                    for &t in targets {
                        occupied[t] = !occupied[t];
                    }
                }
                Operator::Switch { from, to } => occupied.swap(*from, *to),
                Operator::Move { from, to } => {
                    if std::mem::take(&mut occupied[*from]) {
                        occupied[to[0]] = true;
                    }
                }
                Operator::Merge { from, merge_in, .. } => {
                    if std::mem::take(&mut occupied[*from]) {
                        occupied[*merge_in] = true;
                    }
                }
                Operator::Capture { .. } | Operator::Rotate { .. } => {}
            }
        }
        occupied
            .iter()
            .enumerate()
            .filter_map(|(i, &o)| o.then_some(i))
            .collect()
    }
}

impl SamplingStrategy for HeuristicReplay {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn run(
        &self,
        register: &Register,
        config: &EngineConfig,
        _rng: &mut EngineRng,
    ) -> SimulationResult<SampleRun> {
        Ok(SampleRun {
            table: OutcomeTable::certain(Self::replay(register), config.shots),
            qubits_simulated: 0,
            fidelity: Fidelity::Heuristic,
            dropped_operators: 0,
        })
    }
}

/// Default order: full, reduced, heuristic.
pub const DEFAULT_CHAIN: [&(dyn SamplingStrategy + Sync); 3] =
    [&FullSimulation, &ReducedSimulation, &HeuristicReplay];

/// Try each strategy in turn; return the first success.
pub fn run_chain(
    strategies: &[&(dyn SamplingStrategy + Sync)],
    register: &Register,
    config: &EngineConfig,
    rng: &mut EngineRng,
) -> Result<SampleRun, MeasureError> {
    let mut last = SimulationError::EmptyRegister;
    for strategy in strategies {
        match strategy.run(register, config, rng) {
            Ok(run) => {
                debug!(
                    strategy = strategy.name(),
                    qubits = run.qubits_simulated,
                    outcomes = run.table.len(),
                    "sampled"
                );
                return Ok(run);
            }
            Err(err) => {
                warn!(strategy = strategy.name(), error = %err, "strategy failed, falling back");
                last = err;
            }
        }
    }
    Err(MeasureError::AllStrategiesFailed(last))
}

/// Order the active set so indices sharing an operator sit next to each
/// other. Groups are ordered by their smallest index.
fn interaction_order(register: &Register, active: &[usize]) -> Vec<usize> {
    let mut parent: FxHashMap<usize, usize> = active.iter().map(|&i| (i, i)).collect();

    fn find(parent: &mut FxHashMap<usize, usize>, i: usize) -> usize {
        let p = parent[&i];
        if p == i {
            return i;
        }
        let root = find(parent, p);
        parent.insert(i, root);
        root
    }

    for op in register.circuit().filter(|op| !op.is_local()) {
        let ops = op.operands();
        if let Some((&first, rest)) = ops.split_first() {
            for &other in rest {
                let (a, b) = (find(&mut parent, first), find(&mut parent, other));
                if a != b {
                    parent.insert(a.max(b), a.min(b));
                }
            }
        }
    }

    let mut keyed: Vec<(usize, usize)> = active
        .iter()
        .map(|&i| (find(&mut parent, i), i))
        .collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Operators whose operands fall into more than one chunk. These cannot be
/// simulated and are left out of every chunk.
fn count_straddling(register: &Register, chunks: &[Vec<usize>]) -> usize {
    if chunks.len() < 2 {
        return 0;
    }
    let chunk_of: FxHashMap<usize, usize> = chunks
        .iter()
        .enumerate()
        .flat_map(|(c, globals)| globals.iter().map(move |&g| (g, c)))
        .collect();

    let mut straddling = 0;
    for op in register.circuit().filter(|op| !op.is_local()) {
        let ops = op.operands();
        let first = ops.first().and_then(|i| chunk_of.get(i));
        if ops.iter().any(|i| chunk_of.get(i) != first) {
            warn!(operator = %op, "operator spans a chunk boundary, dropped");
            straddling += 1;
        }
    }
    straddling
}

/// Cut an ordered index list into fixed-size chunks.
fn chunk_active(ordered: &[usize], chunk_size: usize) -> Vec<Vec<usize>> {
    ordered
        .chunks(chunk_size.max(1))
        .map(<[usize]>::to_vec)
        .collect()
}
