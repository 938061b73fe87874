//! Undo history.
//!
//! A plain stack of (program, occupancy) snapshots. A committed move pushes
//! twice (before and after the action), so `undo` pops two entries and
//! restores the older one. Only the latest lineage is kept.

use tracing::debug;

use super::state::Program;
use crate::core::Occupancy;

/// One saved point: the register program and the caller's occupancy.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub program: Program,
    pub occupancy: Occupancy,
}

/// Stack of saved points.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent saved point.
    #[must_use]
    pub fn top(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Push a saved point.
    ///
    /// Skipped when the occupancy equals the one on top of the stack, so
    /// idle turns do not pile up identical entries. Returns whether the
    /// entry was pushed.
    pub fn save(&mut self, program: Program, occupancy: Occupancy) -> bool {
        if self.top().is_some_and(|top| top.occupancy == occupancy) {
            debug!(depth = self.entries.len(), "history save skipped, occupancy unchanged");
            return false;
        }
        self.entries.push(HistoryEntry { program, occupancy });
        debug!(depth = self.entries.len(), "history saved");
        true
    }

    /// Pop up to two saved points and return the older one.
    ///
    /// Returns `None` on an empty stack; the caller falls back to a reset.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let newest = self.entries.pop()?;
        let restored = self.entries.pop().unwrap_or(newest);
        debug!(depth = self.entries.len(), "history undo");
        Some(restored)
    }

    /// Drop every saved point.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, PawnTag};
    use crate::register::Operator;

    fn occupancy_with(square: usize) -> Occupancy {
        let mut occ = Occupancy::initial(8);
        occ.board[square] = Some(PawnTag::new(Color::Red, 0));
        occ
    }

    fn program_with(square: usize) -> Program {
        let mut program = Program::new();
        program.push_back(Operator::Spawn { targets: smallvec::smallvec![square] });
        program
    }

    #[test]
    fn test_save_skips_identical_occupancy() {
        let mut history = History::new();
        assert!(history.save(program_with(1), occupancy_with(1)));
        assert!(!history.save(program_with(1), occupancy_with(1)));
        assert_eq!(history.len(), 1);

        assert!(history.save(program_with(2), occupancy_with(2)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_undo_pops_two() {
        let mut history = History::new();
        history.save(program_with(1), occupancy_with(1));
        history.save(program_with(2), occupancy_with(2));
        history.save(program_with(3), occupancy_with(3));

        let restored = history.undo().unwrap();
        assert_eq!(restored.occupancy, occupancy_with(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.top().unwrap().occupancy, occupancy_with(1));
    }

    #[test]
    fn test_undo_single_entry_round_trips() {
        let mut history = History::new();
        history.save(program_with(4), occupancy_with(4));

        let restored = history.undo().unwrap();
        assert_eq!(restored.program, program_with(4));
        assert!(history.is_empty());
    }

    #[test]
    fn test_undo_empty() {
        let mut history = History::new();
        assert!(history.undo().is_none());
    }
}
