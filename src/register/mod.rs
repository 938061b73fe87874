//! Register, operators and undo history.
//!
//! - `operator`: validated state-transition records
//! - `state`: the register and its pending program
//! - `history`: save/undo stack of program snapshots

pub mod history;
pub mod operator;
pub mod state;

pub use history::{History, HistoryEntry};
pub use operator::{Operands, Operator};
pub use state::{Program, Register};
