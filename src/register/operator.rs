//! State-transition operators.
//!
//! An operator is the engine-side image of one game action. Operators are
//! immutable once built: constructors validate operand cardinality and
//! range, so anything that made it into a program is well formed.
//!
//! | Operator   | Game action                               |
//! |------------|-------------------------------------------|
//! | `Spawn`    | pawn enters the board                     |
//! | `Switch`   | ordinary single-die move                  |
//! | `Move`     | two different dice: split into two squares |
//! | `Merge`    | split where one square already holds the pawn |
//! | `Capture`  | landing on another color's pawn           |
//! | `Rotate`   | measurement basis, only right before sampling |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{OperatorError, OperatorResult};
use crate::measurement::Basis;

/// Index list for operators with a variable operand count.
pub type Operands = SmallVec<[usize; 4]>;

/// One state transition over the register.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Mark each target as occupied.
    Spawn { targets: Operands },

    /// Exchange occupancy of two squares.
    Switch { from: usize, to: usize },

    /// Split `from` into an equal superposition over `to`.
    Move { from: usize, to: [usize; 2] },

    /// Split `from` over `to`, weighted towards `merge_in`.
    Merge {
        from: usize,
        to: [usize; 2],
        merge_in: usize,
    },

    /// Entangle the capturer with the captive and the captive's other squares.
    Capture {
        capturer: usize,
        captive: usize,
        entangled: Operands,
    },

    /// Rotate one square into a measurement basis.
    Rotate { index: usize, basis: Basis },
}

fn single(operator: &'static str, operand: &'static str, indices: &[usize]) -> OperatorResult<usize> {
    match indices {
        [i] => Ok(*i),
        _ => Err(OperatorError::Cardinality {
            operator,
            operand,
            expected: 1,
            got: indices.len(),
        }),
    }
}

fn pair(operator: &'static str, operand: &'static str, indices: &[usize]) -> OperatorResult<[usize; 2]> {
    match indices {
        [a, b] => Ok([*a, *b]),
        _ => Err(OperatorError::Cardinality {
            operator,
            operand,
            expected: 2,
            got: indices.len(),
        }),
    }
}

fn check_range(operator: &'static str, indices: &[usize], len: usize) -> OperatorResult<()> {
    match indices.iter().find(|&&i| i >= len) {
        Some(&index) => Err(OperatorError::IndexOutOfRange { operator, index, len }),
        None => Ok(()),
    }
}

fn check_distinct(operator: &'static str, indices: &[usize]) -> OperatorResult<()> {
    for (pos, &i) in indices.iter().enumerate() {
        if indices[..pos].contains(&i) {
            return Err(OperatorError::DuplicateOperand { operator, index: i });
        }
    }
    Ok(())
}

impl Operator {
    /// Build a spawn. Empty input is allowed (the result is a no-op);
    /// repeated targets are collapsed.
    pub fn spawn(targets: &[usize], len: usize) -> OperatorResult<Self> {
        check_range("spawn", targets, len)?;
        let mut unique = Operands::new();
        for &t in targets {
            if !unique.contains(&t) {
                unique.push(t);
            }
        }
        Ok(Operator::Spawn { targets: unique })
    }

    /// Build a switch from one square to another.
    pub fn switch(from: &[usize], to: &[usize], len: usize) -> OperatorResult<Self> {
        let from = single("switch", "from", from)?;
        let to = single("switch", "to", to)?;
        check_range("switch", &[from, to], len)?;
        check_distinct("switch", &[from, to])?;
        Ok(Operator::Switch { from, to })
    }

    /// Build an equal-weight split move.
    pub fn split(from: &[usize], to: &[usize], len: usize) -> OperatorResult<Self> {
        let from = single("move", "from", from)?;
        let to = pair("move", "to", to)?;
        check_range("move", &[from, to[0], to[1]], len)?;
        check_distinct("move", &[from, to[0], to[1]])?;
        Ok(Operator::Move { from, to })
    }

    /// Build a weighted split that reinforces `merge_in`.
    pub fn merge(from: &[usize], to: &[usize], merge_in: usize, len: usize) -> OperatorResult<Self> {
        let from = single("merge", "from", from)?;
        let to = pair("merge", "to", to)?;
        if !to.contains(&merge_in) {
            return Err(OperatorError::MergeTargetMissing { merge_in, to });
        }
        check_range("merge", &[from, to[0], to[1]], len)?;
        check_distinct("merge", &[from, to[0], to[1]])?;
        Ok(Operator::Merge { from, to, merge_in })
    }

    /// Build a capture. Does not move the capturer.
    pub fn capture(
        capturer: &[usize],
        captive: &[usize],
        entangled: &[usize],
        len: usize,
    ) -> OperatorResult<Self> {
        let capturer = single("capture", "capturer", capturer)?;
        let captive = single("capture", "captive", captive)?;
        if entangled.contains(&captive) {
            return Err(OperatorError::CaptiveInEntanglement { captive });
        }

        let mut all: Operands = entangled.iter().copied().collect();
        all.push(capturer);
        all.push(captive);
        check_range("capture", &all, len)?;
        check_distinct("capture", &all)?;

        Ok(Operator::Capture {
            capturer,
            captive,
            entangled: entangled.iter().copied().collect(),
        })
    }

    /// Build a basis rotation.
    pub fn rotate(index: usize, basis: Basis, len: usize) -> OperatorResult<Self> {
        check_range("rotate", &[index], len)?;
        Ok(Operator::Rotate { index, basis })
    }

    /// Short operator name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Spawn { .. } => "spawn",
            Operator::Switch { .. } => "switch",
            Operator::Move { .. } => "move",
            Operator::Merge { .. } => "merge",
            Operator::Capture { .. } => "capture",
            Operator::Rotate { .. } => "rotate",
        }
    }

    /// Every register index this operator touches.
    #[must_use]
    pub fn operands(&self) -> Operands {
        match self {
            Operator::Spawn { targets } => targets.clone(),
            Operator::Switch { from, to } => smallvec::smallvec![*from, *to],
            Operator::Move { from, to } | Operator::Merge { from, to, .. } => {
                smallvec::smallvec![*from, to[0], to[1]]
            }
            Operator::Capture {
                capturer,
                captive,
                entangled,
            } => {
                let mut ops = entangled.clone();
                ops.push(*capturer);
                ops.push(*captive);
                ops
            }
            Operator::Rotate { index, .. } => smallvec::smallvec![*index],
        }
    }

    /// Check if this operator changes nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Operator::Spawn { targets } => targets.is_empty(),
            Operator::Rotate { basis, .. } => basis.is_default(),
            _ => false,
        }
    }

    /// Whether the operator acts on each operand on its own, without coupling
    /// them. Local operators never entangle and can be split across chunks.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Operator::Spawn { .. } | Operator::Rotate { .. })
    }

    /// Glyph drawn on `index`'s wire in a circuit listing, if it is touched.
    pub(crate) fn glyph(&self, index: usize) -> Option<char> {
        match self {
            Operator::Spawn { targets } => targets.contains(&index).then_some('S'),
            Operator::Switch { from, to } => (index == *from || index == *to).then_some('x'),
            Operator::Move { from, to } => {
                if index == *from {
                    Some('o')
                } else {
                    to.contains(&index).then_some('H')
                }
            }
            Operator::Merge { from, to, merge_in } => {
                if index == *from {
                    Some('o')
                } else if index == *merge_in {
                    Some('M')
                } else {
                    to.contains(&index).then_some('m')
                }
            }
            Operator::Capture {
                capturer,
                captive,
                entangled,
            } => {
                if index == *capturer {
                    Some('*')
                } else if index == *captive {
                    Some('+')
                } else {
                    entangled.contains(&index).then_some('~')
                }
            }
            Operator::Rotate { index: i, basis } => {
                (index == *i).then(|| basis.to_string().chars().next().unwrap_or('?'))
            }
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Spawn { targets } => write!(f, "spawn {:?}", targets.as_slice()),
            Operator::Switch { from, to } => write!(f, "switch {from} -> {to}"),
            Operator::Move { from, to } => write!(f, "move {from} -> {to:?}"),
            Operator::Merge { from, to, merge_in } => {
                write!(f, "merge {from} -> {to:?} into {merge_in}")
            }
            Operator::Capture {
                capturer,
                captive,
                entangled,
            } => write!(
                f,
                "capture {captive} by {capturer} with {:?}",
                entangled.as_slice()
            ),
            Operator::Rotate { index, basis } => write!(f, "rotate {index} to {basis}"),
        }
    }
}
