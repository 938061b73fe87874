//! Property tests over random operator sequences.

use proptest::prelude::*;
use quantum_ludo::{BoardLayout, EngineConfig, Operator, OutcomeTable, QuantumBoard};

const SQUARES: usize = 8;
const LEN: usize = SQUARES + 2;

fn board() -> QuantumBoard {
    QuantumBoard::new(EngineConfig::default().with_layout(BoardLayout::new(SQUARES, 2))).unwrap()
}

#[derive(Clone, Debug)]
enum Step {
    Switch(usize, usize),
    Move(usize, usize, usize),
    Merge(usize, usize, usize, bool),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..LEN, 0..LEN).prop_map(|(a, b)| Step::Switch(a, b)),
        (0..LEN, 0..LEN, 0..LEN).prop_map(|(a, b, c)| Step::Move(a, b, c)),
        (0..LEN, 0..LEN, 0..LEN, any::<bool>()).prop_map(|(a, b, c, first)| Step::Merge(a, b, c, first)),
    ]
}

/// Apply a step; invalid operand combinations are rejected and skipped.
fn apply(b: &mut QuantumBoard, s: &Step) {
    let _ = match *s {
        Step::Switch(f, t) => b.switch(&[f], &[t]),
        Step::Move(f, a, c) => b.split_move(&[f], &[a, c]),
        Step::Merge(f, a, c, first) => b.merge(&[f], &[a, c], if first { a } else { c }),
    };
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Probabilities over every amplitude-bearing outcome sum to 1.
    #[test]
    fn conservation(start in 0..LEN, steps in prop::collection::vec(step(), 0..6)) {
        let mut b = board();
        b.spawn(&[start]).unwrap();
        for s in &steps {
            apply(&mut b, s);
        }

        let dist = b.exact_distribution().unwrap();
        let total: f64 = dist.iter().map(|(_, p)| p).sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "total = {}", total);
    }

    /// A lone spawn is found where it was placed.
    #[test]
    fn spawn_is_deterministic(square in 0..LEN) {
        let mut b = board();
        b.spawn(&[square]).unwrap();
        prop_assert_eq!(b.measure().unwrap(), vec![square]);
    }

    /// Measuring twice in a row returns the same squares: the first
    /// measurement re-seeds the register with what it saw.
    #[test]
    fn measurement_is_stable(start in 0..LEN, steps in prop::collection::vec(step(), 0..6)) {
        let mut b = board();
        b.spawn(&[start]).unwrap();
        for s in &steps {
            apply(&mut b, s);
        }

        let first = b.measure().unwrap();
        prop_assert_eq!(b.measure().unwrap(), first);
    }

    /// Rejected operators leave the program untouched.
    #[test]
    fn rejected_operator_is_not_recorded(a in 0..LEN + 4, c in 0..LEN + 4) {
        let mut b = board();
        b.spawn(&[0]).unwrap();
        let before = b.register().clone();

        if b.split_move(&[0], &[a, c]).is_err() {
            prop_assert_eq!(b.register(), &before);
        } else {
            prop_assert_eq!(b.register().program().len(), 2);
        }
        prop_assert!(Operator::split(&[0], &[a, c], LEN).is_ok() == (a != c && a != 0 && c != 0 && a < LEN && c < LEN));
    }

    /// Filtering twice with the same floor removes nothing the second time.
    #[test]
    fn filter_is_idempotent(counts in prop::collection::vec(0u32..200, 1..12), floor in 0.0f64..0.3) {
        let shots: u32 = counts.iter().sum::<u32>().max(1);
        let table = OutcomeTable::from_counts(
            counts.iter().enumerate().map(|(i, &c)| (vec![i], c)).collect(),
            shots,
        );

        let once = table.filter(floor);
        let twice = once.clone().filter(floor);
        prop_assert_eq!(once, twice);
    }
}
