//! Compilation of operators into gates.
//!
//! The gate set is deliberately tiny: a 2x2 unitary on one target with any
//! number of (positive) controls, and SWAP. That covers X, H, RY and their
//! controlled and multi-controlled forms.
//!
//! Operator decompositions:
//!
//! - spawn: `X(t)` per target
//! - switch: `SWAP(from, to)`
//! - move: `CH(from, a); SWAP(from, b); CX(a, b)`
//! - merge: `CX(from, m); CRY(m, from, -2π/3); CX(from, m); SWAP(from, o)`
//!   where `m` is `merge_in` and `o` the other destination
//! - capture: `X(e)` per entangled index, `MCX(e.. + capturer -> captive)`,
//!   `X(e)` again
//! - rotate: `RY(angle)`

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

use crate::register::Operator;

/// Angle of the Givens rotation used by merge.
///
/// The moving branch ends on `merge_in` with probability `sin²(|θ|/2) = 3/4`.
/// When the pawn was already spread evenly over `from` and `merge_in`, the
/// two branches interfere and `merge_in` keeps amplitude `(√3 + 1) / 2√2`.
pub const MERGE_ANGLE: f64 = -2.0 * std::f64::consts::FRAC_PI_3;

/// Complex 2x2 matrix `[[m00, m01], [m10, m11]]`.
pub type Matrix2 = [[Complex64; 2]; 2];

const fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Pauli X.
pub const PAULI_X: Matrix2 = [[real(0.0), real(1.0)], [real(1.0), real(0.0)]];

/// Hadamard.
pub const HADAMARD: Matrix2 = [
    [real(FRAC_1_SQRT_2), real(FRAC_1_SQRT_2)],
    [real(FRAC_1_SQRT_2), real(-FRAC_1_SQRT_2)],
];

/// Y rotation by `theta`.
#[must_use]
pub fn ry(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [[real(c), real(-s)], [real(s), real(c)]]
}

/// A gate over local (simulated) qubit positions.
#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    /// Apply `matrix` to `target` when every control reads 1.
    Unitary {
        target: usize,
        controls: SmallVec<[usize; 4]>,
        matrix: Matrix2,
    },
    /// Exchange two qubits.
    Swap(usize, usize),
}

impl Gate {
    fn x(target: usize) -> Self {
        Gate::Unitary {
            target,
            controls: SmallVec::new(),
            matrix: PAULI_X,
        }
    }

    fn cx(control: usize, target: usize) -> Self {
        Gate::Unitary {
            target,
            controls: smallvec![control],
            matrix: PAULI_X,
        }
    }
}

/// Global register index -> local qubit position.
pub type QubitMap = FxHashMap<usize, usize>;

/// Build a map placing `globals[k]` at local position `k`.
#[must_use]
pub fn qubit_map(globals: &[usize]) -> QubitMap {
    globals.iter().enumerate().map(|(local, &g)| (g, local)).collect()
}

/// Compile one operator.
///
/// Returns `None` if any operand of a coupling operator is missing from `map`
/// (the operator spans qubits that are not simulated together). Spawn targets
/// outside `map` belong to another block and are left to it.
#[must_use]
pub fn compile(op: &Operator, map: &QubitMap) -> Option<SmallVec<[Gate; 4]>> {
    let q = |global: usize| map.get(&global).copied();

    let gates = match op {
        Operator::Spawn { targets } => targets.iter().filter_map(|&t| q(t)).map(Gate::x).collect(),

        Operator::Switch { from, to } => smallvec![Gate::Swap(q(*from)?, q(*to)?)],

        Operator::Move { from, to } => {
            let (f, a, b) = (q(*from)?, q(to[0])?, q(to[1])?);
            smallvec![
                Gate::Unitary {
                    target: a,
                    controls: smallvec![f],
                    matrix: HADAMARD,
                },
                Gate::Swap(f, b),
                Gate::cx(a, b),
            ]
        }

        Operator::Merge { from, to, merge_in } => {
            let other = if to[0] == *merge_in { to[1] } else { to[0] };
            let (f, m, o) = (q(*from)?, q(*merge_in)?, q(other)?);
            smallvec![
                Gate::cx(f, m),
                Gate::Unitary {
                    target: f,
                    controls: smallvec![m],
                    matrix: ry(MERGE_ANGLE),
                },
                Gate::cx(f, m),
                Gate::Swap(f, o),
            ]
        }

        Operator::Capture {
            capturer,
            captive,
            entangled,
        } => {
            let ents: SmallVec<[usize; 4]> = entangled.iter().map(|&e| q(e)).collect::<Option<_>>()?;
            let mut controls = ents.clone();
            controls.push(q(*capturer)?);
            let target = q(*captive)?;

            let mut gates: SmallVec<[Gate; 4]> = ents.iter().map(|&e| Gate::x(e)).collect();
            gates.push(Gate::Unitary {
                target,
                controls,
                matrix: PAULI_X,
            });
            gates.extend(ents.iter().map(|&e| Gate::x(e)));
            gates
        }

        Operator::Rotate { index, basis } => {
            if basis.is_default() {
                SmallVec::new()
            } else {
                smallvec![Gate::Unitary {
                    target: q(*index)?,
                    controls: SmallVec::new(),
                    matrix: ry(basis.angle()),
                }]
            }
        }
    };

    Some(gates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Basis;

    fn is_unitary(m: &Matrix2) -> bool {
        // M * M^dagger == I
        (0..2).all(|i| {
            (0..2).all(|j| {
                let v: Complex64 = (0..2).map(|k| m[i][k] * m[j][k].conj()).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                (v.re - expected).abs() < 1e-12 && v.im.abs() < 1e-12
            })
        })
    }

    #[test]
    fn test_matrices_are_unitary() {
        assert!(is_unitary(&PAULI_X));
        assert!(is_unitary(&HADAMARD));
        assert!(is_unitary(&ry(MERGE_ANGLE)));
        assert!(is_unitary(&ry(0.7)));
    }

    #[test]
    fn test_compile_move() {
        let map = qubit_map(&[0, 2, 3]);
        let gates = compile(&Operator::Move { from: 0, to: [2, 3] }, &map).unwrap();
        assert_eq!(gates.len(), 3);
        assert_eq!(gates[1], Gate::Swap(0, 2));
    }

    #[test]
    fn test_compile_capture() {
        let map = qubit_map(&[2, 3, 4, 7]);
        let op = Operator::Capture {
            capturer: 4,
            captive: 3,
            entangled: smallvec![2, 7],
        };
        let gates = compile(&op, &map).unwrap();
        assert_eq!(gates.len(), 5);
        match &gates[2] {
            Gate::Unitary { target, controls, .. } => {
                assert_eq!(*target, 1);
                assert_eq!(controls.as_slice(), &[0, 3, 2]);
            }
            other => panic!("unexpected gate {other:?}"),
        }
    }

    #[test]
    fn test_compile_missing_operand() {
        let map = qubit_map(&[0, 2]);
        assert!(compile(&Operator::Move { from: 0, to: [2, 3] }, &map).is_none());
        assert!(compile(&Operator::Switch { from: 2, to: 9 }, &map).is_none());
    }

    #[test]
    fn test_spawn_compiles_mapped_targets_only() {
        let map = qubit_map(&[4, 9]);
        let spawn = Operator::Spawn { targets: smallvec![1, 9] };
        let gates = compile(&spawn, &map).unwrap();
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0], Gate::x(1));
    }

    #[test]
    fn test_default_rotation_compiles_to_nothing() {
        let map = qubit_map(&[5]);
        let gates = compile(&Operator::Rotate { index: 5, basis: Basis::Z }, &map).unwrap();
        assert!(gates.is_empty());
    }
}
