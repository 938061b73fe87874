//! Core engine types: colors, configuration, errors, RNG.
//!
//! Nothing in here knows about amplitudes. The register, simulator and
//! measurement modules build on these.

pub mod color;
pub mod config;
pub mod error;
pub mod rng;

pub use color::{Color, Occupancy, PawnTag, COLOR_COUNT, PAWNS_PER_COLOR};
pub use config::{BoardLayout, EngineConfig, MAX_QUBITS_CEILING};
pub use error::{
    ConfigError, EngineError, EngineResult, MeasureError, OperatorError, OperatorResult,
    SimulationError, SimulationResult,
};
pub use rng::{EngineRng, EngineRngState};
