//! # quantum-ludo
//!
//! Quantum state engine for a four-player Ludo variant in which pawns can sit
//! on several squares at once.
//!
//! ## Design Principles
//!
//! 1. **One degree of freedom per square**: The register holds one binary
//!    degree of freedom per board square plus the finish slots. "Occupied"
//!    is the excited state.
//!
//! 2. **Programs, not amplitudes**: Game moves append operators to a program.
//!    Amplitudes only exist inside a measurement, which replays the program.
//!
//! 3. **Degrade, don't fail**: Measurement tries a full simulation, then a
//!    reduced/chunked one, then a classical replay. The result says which
//!    one answered.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Programs are `im::Vector`s, so history
//!   snapshots are O(1) clones.
//!
//! - **Deterministic**: All sampling draws from a seeded ChaCha8 stream.
//!   Same seed and same calls give the same game.
//!
//! ## Modules
//!
//! - `core`: Colors, board layout, configuration, errors, RNG
//! - `register`: Operators, the register program, history/undo
//! - `simulator`: State-vector backend, sampling strategies, outcome tables
//! - `measurement`: Basis selection and weighted collapse
//! - `engine`: `QuantumBoard`, the call surface for the rules layer

pub mod core;
pub mod register;
pub mod simulator;
pub mod measurement;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    Color, PawnTag, Occupancy,
    BoardLayout, EngineConfig,
    EngineRng, EngineRngState,
    ConfigError, EngineError, EngineResult, MeasureError, OperatorError, SimulationError,
};

pub use crate::register::{History, HistoryEntry, Operator, Program, Register};

pub use crate::simulator::{
    Fidelity, Outcome, OutcomeTable, SampleRun,
    SamplingStrategy, FullSimulation, ReducedSimulation, HeuristicReplay,
};

pub use crate::measurement::{Basis, Measurement, MeasurementTrigger};

pub use crate::engine::QuantumBoard;
