//! Error types for the engine.
//!
//! Three failure domains, matching how the caller is expected to react:
//!
//! - [`OperatorError`]: a precondition on an operator call was violated.
//!   The register is left untouched; this is a caller bug.
//! - [`SimulationError`]: a simulation strategy could not run. These are
//!   recovered inside the engine by falling back to a cheaper strategy.
//! - [`MeasureError`]: a measurement could not produce an outcome at all.

use thiserror::Error;

/// Result alias for operator application.
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Result alias for a single simulation strategy.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Result alias for engine-level calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// Precondition violations on operator calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    #[error("{operator}: `{operand}` must hold exactly {expected} index(es), got {got}")]
    Cardinality {
        operator: &'static str,
        operand: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{operator}: index {index} is outside the register (length {len})")]
    IndexOutOfRange {
        operator: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{operator}: index {index} appears more than once among the operands")]
    DuplicateOperand { operator: &'static str, index: usize },

    #[error("merge: merge_in {merge_in} is not one of the destinations {to:?}")]
    MergeTargetMissing { merge_in: usize, to: [usize; 2] },

    #[error("capture: captive {captive} must not appear in its own entanglement set")]
    CaptiveInEntanglement { captive: usize },

    #[error("spawn: square {index} is in superposition; measure before spawning onto it")]
    SpawnOnUnresolved { index: usize },
}

/// Failures of one simulation strategy. Recovered by the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("{required} qubits exceed the simulation budget of {budget}")]
    QubitBudgetExceeded { required: usize, budget: usize },

    #[error("no degrees of freedom to simulate")]
    EmptyRegister,

    #[error("could not allocate a state vector over {qubits} qubits")]
    ResourceExhausted { qubits: usize },

    #[error("simulated state lost its normalisation (total probability {0})")]
    Denormalised(String),
}

/// Failures of a measurement as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    #[error("no measurement outcome is plausible: all {outcomes} sampled outcome(s) fell below the noise floor {noise_floor}")]
    NoPlausibleOutcome { outcomes: usize, noise_floor: String },

    #[error("every simulation strategy failed; last error: {0}")]
    AllStrategiesFailed(SimulationError),
}

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("shots must be at least 1")]
    ZeroShots,

    #[error("noise floor must lie in [0, 1), got {0}")]
    NoiseFloor(String),

    #[error("chunk size must lie in 1..={max_qubits}, got {chunk_size}")]
    ChunkSize { chunk_size: usize, max_qubits: usize },

    #[error("max_qubits {max_qubits} is above the supported ceiling of {ceiling}")]
    MaxQubits { max_qubits: usize, ceiling: usize },

    #[error("board must have at least one square")]
    EmptyBoard,
}

/// Top-level engine error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Operator(#[from] OperatorError),

    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
