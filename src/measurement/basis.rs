//! Measurement bases and the trigger table.
//!
//! Who forces a measurement changes what gets seen: before sampling, every
//! occupied degree of freedom is rotated into one of four bases picked by
//! looking up (triggering color, triggering pawn, owning color).
//!
//! The table is a Latin square. The trigger's own color always reads in the
//! default basis and every other color gets a different basis. Pawn 1 uses the
//! transpose of pawn 0's table.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

use serde::{Deserialize, Serialize};

use crate::core::{Color, COLOR_COUNT, PAWNS_PER_COLOR};

/// One of the four measurement bases.
///
/// Each basis is a Y-rotation applied just before sampling. An occupied
/// square measured in basis `b` still reads as occupied with probability
/// `cos²(b.angle() / 2)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Computational basis, no rotation.
    Z,
    /// Quarter-turn intermediate basis.
    Q,
    /// Third-turn intermediate basis.
    T,
    /// Complementary basis: an occupied square reads 50/50.
    X,
}

impl Basis {
    /// All bases, in table order.
    pub const ALL: [Basis; 4] = [Basis::Z, Basis::Q, Basis::T, Basis::X];

    /// Y-rotation angle applied before sampling.
    #[must_use]
    pub const fn angle(self) -> f64 {
        match self {
            Basis::Z => 0.0,
            Basis::Q => FRAC_PI_4,
            Basis::T => FRAC_PI_3,
            Basis::X => FRAC_PI_2,
        }
    }

    /// Whether measuring in this basis needs a gate at all.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Basis::Z)
    }

    /// Probability that an occupied square still reads as occupied.
    #[must_use]
    pub fn survival_probability(self) -> f64 {
        let half = self.angle() / 2.0;
        half.cos() * half.cos()
    }
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Basis::Z => "Z",
            Basis::Q => "Q",
            Basis::T => "T",
            Basis::X => "X",
        };
        f.write_str(s)
    }
}

use Basis::{Q, T, X, Z};

/// `BASIS_TABLE[pawn][trigger][owner]`.
const BASIS_TABLE: [[[Basis; COLOR_COUNT]; COLOR_COUNT]; PAWNS_PER_COLOR as usize] = [
    [
        [Z, Q, T, X],
        [X, Z, Q, T],
        [T, X, Z, Q],
        [Q, T, X, Z],
    ],
    [
        [Z, X, T, Q],
        [Q, Z, X, T],
        [T, Q, Z, X],
        [X, T, Q, Z],
    ],
];

/// The pawn whose action forced a measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasurementTrigger {
    pub color: Color,
    pub pawn: u8,
}

impl MeasurementTrigger {
    /// Create a trigger. Pawn numbers wrap at [`PAWNS_PER_COLOR`].
    #[must_use]
    pub const fn new(color: Color, pawn: u8) -> Self {
        Self {
            color,
            pawn: pawn % PAWNS_PER_COLOR,
        }
    }

    /// Basis in which squares owned by `owner` are measured.
    #[must_use]
    pub const fn basis_for(self, owner: Color) -> Basis {
        BASIS_TABLE[self.pawn as usize][self.color.index()][owner.index()]
    }
}

/// Pick a basis for every occupied square.
///
/// Without a trigger every square is measured in the default basis.
#[must_use]
pub fn select_bases(
    trigger: Option<MeasurementTrigger>,
    occupied: &[(usize, Color)],
) -> Vec<(usize, Basis)> {
    occupied
        .iter()
        .map(|&(index, owner)| {
            let basis = trigger.map_or(Basis::Z, |t| t.basis_for(owner));
            (index, basis)
        })
        .collect()
}
