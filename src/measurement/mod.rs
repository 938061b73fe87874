//! Measurement: basis selection and collapse.
//!
//! - `basis`: the four measurement bases and the trigger table
//! - `collapse`: weighted choice of one outcome and the measurement record

pub mod basis;
pub mod collapse;

pub use basis::{select_bases, Basis, MeasurementTrigger};
pub use collapse::{draw, Measurement};
