//! Dense state-vector backend.
//!
//! Qubit `k` is bit `k` of the basis-state index, so basis state `i` reads
//! "occupied" on every local qubit whose bit is set in `i`.

use num_complex::Complex64;

use super::gates::Gate;
use crate::core::{SimulationError, SimulationResult, MAX_QUBITS_CEILING};

/// Probabilities below this are treated as exactly zero.
pub const AMPLITUDE_EPSILON: f64 = 1e-12;

/// Amplitudes over `2^qubits` basis states.
#[derive(Clone, Debug)]
pub struct StateVector {
    qubits: usize,
    amps: Vec<Complex64>,
}

impl StateVector {
    /// All-zero state over `qubits` qubits.
    ///
    /// Fails if `qubits` is zero, exceeds `budget` or [`MAX_QUBITS_CEILING`],
    /// or the amplitudes cannot be allocated.
    pub fn new(qubits: usize, budget: usize) -> SimulationResult<Self> {
        if qubits == 0 {
            return Err(SimulationError::EmptyRegister);
        }
        let budget = budget.min(MAX_QUBITS_CEILING);
        if qubits > budget {
            return Err(SimulationError::QubitBudgetExceeded {
                required: qubits,
                budget,
            });
        }
        let dim = 1usize << qubits;
        let mut amps = Vec::new();
        amps.try_reserve_exact(dim)
            .map_err(|_| SimulationError::ResourceExhausted { qubits })?;
        amps.resize(dim, Complex64::new(0.0, 0.0));
        amps[0] = Complex64::new(1.0, 0.0);
        Ok(Self { qubits, amps })
    }

    /// Number of qubits.
    #[must_use]
    pub fn qubits(&self) -> usize {
        self.qubits
    }

    /// Apply one gate.
    pub fn apply(&mut self, gate: &Gate) {
        match gate {
            Gate::Unitary {
                target,
                controls,
                matrix,
            } => {
                let tbit = 1usize << target;
                let cmask = controls.iter().fold(0usize, |m, &c| m | (1 << c));
                for i in 0..self.amps.len() {
                    if i & tbit != 0 || i & cmask != cmask {
                        continue;
                    }
                    let j = i | tbit;
                    let (a0, a1) = (self.amps[i], self.amps[j]);
                    self.amps[i] = matrix[0][0] * a0 + matrix[0][1] * a1;
                    self.amps[j] = matrix[1][0] * a0 + matrix[1][1] * a1;
                }
            }
            Gate::Swap(a, b) => {
                if a == b {
                    return;
                }
                let (abit, bbit) = (1usize << a, 1usize << b);
                for i in 0..self.amps.len() {
                    if i & abit != 0 && i & bbit == 0 {
                        self.amps.swap(i, i ^ abit ^ bbit);
                    }
                }
            }
        }
    }

    /// Probability of each basis state.
    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Total probability mass. 1 for any state reached by gates.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Probability that local qubit `k` reads 1.
    #[must_use]
    pub fn marginal(&self, k: usize) -> f64 {
        let bit = 1usize << k;
        self.amps
            .iter()
            .enumerate()
            .filter(|(i, _)| i & bit != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }
}
