//! The register: one binary degree of freedom per board square.
//!
//! A register does not store amplitudes. It stores the program of operators
//! applied since the last reset, and the simulator replays that program when
//! a measurement is requested. The program lives in an `im::Vector`, so
//! snapshots for the history stack are O(1) clones.
//!
//! Basis rotations are kept apart from the program: they are pending until
//! the next measurement and are dropped by it.

use im::Vector;
use tracing::debug;

use super::operator::Operator;
use crate::core::{OperatorError, OperatorResult};
use crate::measurement::Basis;

/// Operator program snapshot.
pub type Program = Vector<Operator>;

/// Register of `len` degrees of freedom plus its pending program.
#[derive(Clone, Debug, PartialEq)]
pub struct Register {
    len: usize,
    program: Program,
    rotations: Vec<Operator>,
}

impl Register {
    /// Create an empty register (every square unoccupied).
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            program: Vector::new(),
            rotations: Vec::new(),
        }
    }

    /// Number of degrees of freedom.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the register has no degrees of freedom.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The program applied since the last reset.
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Pending basis rotations.
    #[must_use]
    pub fn rotations(&self) -> &[Operator] {
        &self.rotations
    }

    /// Program followed by the pending rotations, in application order.
    pub fn circuit(&self) -> impl Iterator<Item = &Operator> + '_ {
        self.program.iter().chain(self.rotations.iter())
    }

    /// Append an operator. No-ops are not recorded.
    ///
    /// Operands past the end of the register are rejected and the program is
    /// left unchanged.
    pub fn apply(&mut self, op: Operator) -> OperatorResult<()> {
        if let Some(index) = op.operands().into_iter().find(|&i| i >= self.len) {
            return Err(OperatorError::IndexOutOfRange {
                operator: op.name(),
                index,
                len: self.len,
            });
        }
        if op.is_noop() {
            return Ok(());
        }
        debug!(operator = %op, "apply");
        self.program.push_back(op);
        Ok(())
    }

    /// Replace the pending rotations.
    ///
    /// Default-basis entries are dropped since they need no gate.
    pub fn set_rotations(&mut self, rotations: impl IntoIterator<Item = (usize, Basis)>) {
        self.rotations = rotations
            .into_iter()
            .filter(|&(index, basis)| !basis.is_default() && index < self.len)
            .map(|(index, basis)| Operator::Rotate { index, basis })
            .collect();
    }

    /// Indices touched by any operator since the last reset, sorted.
    ///
    /// Everything outside this set is still in the empty default state and
    /// unentangled, so it can be left out of simulation.
    #[must_use]
    pub fn active(&self) -> Vec<usize> {
        let mut seen = vec![false; self.len];
        for op in self.circuit() {
            for i in op.operands() {
                seen[i] = true;
            }
        }
        seen.iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
            .collect()
    }

    /// Occupancy that is classically certain after the program.
    ///
    /// `Some(true)` is certainly occupied, `Some(false)` certainly empty and
    /// `None` unresolved (split, merged or entangled by a capture). Pending
    /// rotations are not included.
    #[must_use]
    pub fn known_occupancy(&self) -> Vec<Option<bool>> {
        let mut known = vec![Some(false); self.len];
        for op in &self.program {
            match op {
                Operator::Spawn { targets } => {
                    for &t in targets {
                        known[t] = known[t].map(|occupied| !occupied);
                    }
                }
                Operator::Switch { from, to } => known.swap(*from, *to),
                other => {
                    for i in other.operands() {
                        known[i] = None;
                    }
                }
            }
        }
        known
    }

    /// Clear the program and pending rotations.
    pub fn reset(&mut self) {
        self.program.clear();
        self.rotations.clear();
    }

    /// Replace the program with a snapshot. Pending rotations are dropped.
    pub(crate) fn restore(&mut self, program: Program) {
        self.program = program;
        self.rotations.clear();
    }

    /// Text listing of the circuit: one row per active index, one column per
    /// operator.
    ///
    /// ```text
    ///  0: S-o-----
    ///  2: ---H----
    ///  3: ---H----
    /// ```
    #[must_use]
    pub fn draw(&self) -> String {
        let active = self.active();
        let width = self.len.saturating_sub(1).to_string().len();
        let ops: Vec<&Operator> = self.circuit().collect();

        let mut out = String::new();
        for index in active {
            out.push_str(&format!("{index:>width$}: "));
            for op in &ops {
                out.push(op.glyph(index).unwrap_or('-'));
                out.push('-');
            }
            out.push('\n');
        }
        out
    }
}
