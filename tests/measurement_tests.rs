//! Measurement integration tests.
//!
//! Basis selection, strategy agreement and the serialized measurement record.

use quantum_ludo::core::EngineRng;
use quantum_ludo::simulator::Block;
use quantum_ludo::{
    BoardLayout, Color, EngineConfig, FullSimulation, Measurement, MeasurementTrigger,
    QuantumBoard, ReducedSimulation, SamplingStrategy,
};

fn board(squares: usize) -> QuantumBoard {
    QuantumBoard::new(EngineConfig::default().with_layout(BoardLayout::new(squares, 2))).unwrap()
}

fn probability(dist: &[(Vec<usize>, f64)], set: &[usize]) -> f64 {
    dist.iter().find(|(o, _)| o == set).map_or(0.0, |(_, p)| *p)
}

// =============================================================================
// Basis Tests
// =============================================================================

/// Test that the trigger's own color is measured without rotation.
#[test]
fn test_own_color_reads_plainly() {
    let mut b = board(10);
    b.spawn(&[5]).unwrap();
    b.set_measurement_basis(Some(MeasurementTrigger::new(Color::Red, 0)), &[(5, Color::Red)]);

    assert!(b.register().rotations().is_empty());
    assert_eq!(b.exact_distribution().unwrap(), vec![(vec![5], 1.0)]);
}

/// Test that an intermediate basis lets an occupied square read empty.
#[test]
fn test_third_turn_basis() {
    let mut b = board(10);
    b.spawn(&[5]).unwrap();
    b.set_measurement_basis(Some(MeasurementTrigger::new(Color::Red, 0)), &[(5, Color::Blue)]);

    let dist = b.exact_distribution().unwrap();
    assert!((probability(&dist, &[5]) - 0.75).abs() < 1e-9);
    assert!((probability(&dist, &[]) - 0.25).abs() < 1e-9);
}

/// Test that the complementary basis reads an occupied square 50/50.
#[test]
fn test_complementary_basis() {
    let mut b = board(10);
    b.spawn(&[5]).unwrap();
    b.set_measurement_basis(Some(MeasurementTrigger::new(Color::Green, 0)), &[(5, Color::Red)]);

    let dist = b.exact_distribution().unwrap();
    assert!((probability(&dist, &[5]) - 0.5).abs() < 1e-9);
}

/// Test that bases are picked per square from the caller's occupancy.
#[test]
fn test_bases_follow_occupancy() {
    let mut b = board(10);
    b.spawn(&[1, 2, 3]).unwrap();
    let occupied = [(1, Color::Green), (2, Color::Blue), (3, Color::Red)];
    b.set_measurement_basis(Some(MeasurementTrigger::new(Color::Green, 0)), &occupied);

    // Green's own pawn stays in the default basis; Blue reads Q, Red reads X.
    assert_eq!(b.register().rotations().len(), 2);
    let dist = b.exact_distribution().unwrap();
    let total: f64 = dist.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(dist.iter().all(|(o, _)| o.contains(&1)));
}

/// Test that clearing the trigger removes pending rotations.
#[test]
fn test_no_trigger_clears_rotations() {
    let mut b = board(10);
    b.spawn(&[5]).unwrap();
    b.set_measurement_basis(Some(MeasurementTrigger::new(Color::Red, 1)), &[(5, Color::Purple)]);
    assert_eq!(b.register().rotations().len(), 1);

    b.set_measurement_basis(None, &[(5, Color::Purple)]);
    assert!(b.register().rotations().is_empty());
}

// =============================================================================
// Strategy Agreement Tests
// =============================================================================

/// Test that simulating the active set gives the same distribution as
/// simulating the whole register.
#[test]
fn test_reduction_matches_full_exactly() {
    let mut b = board(10);
    b.spawn(&[2]).unwrap();
    b.split_move(&[2], &[5, 9]).unwrap();
    b.merge(&[5], &[2, 9], 9).unwrap();

    let reduced = b.exact_distribution().unwrap();
    let everything: Vec<usize> = (0..b.register().len()).collect();
    let full = Block::simulate(everything, b.register().circuit(), 24)
        .unwrap()
        .distribution();

    assert_eq!(reduced.len(), full.len());
    for (set, p) in &full {
        assert!((probability(&reduced, set) - p).abs() < 1e-9);
    }
}

/// Test that sampled marginals over {2, 5, 9} agree between strategies.
#[test]
fn test_reduction_matches_full_sampled() {
    let mut b = board(10);
    b.spawn(&[2]).unwrap();
    b.split_move(&[2], &[5, 9]).unwrap();

    let config = b.config().clone().with_shots(4096);
    let full = FullSimulation
        .run(b.register(), &config, &mut EngineRng::new(3))
        .unwrap();
    let reduced = ReducedSimulation
        .run(b.register(), &config, &mut EngineRng::new(4))
        .unwrap();

    assert_eq!(full.qubits_simulated, 12);
    assert_eq!(reduced.qubits_simulated, 3);
    for index in [2, 5, 9] {
        let diff = full.table.marginal(index) - reduced.table.marginal(index);
        assert!(diff.abs() < 0.05, "index {index}: diff {diff}");
    }
}

// =============================================================================
// Outcome Table Tests
// =============================================================================

/// Test that filtering a measured table again removes nothing.
#[test]
fn test_filter_idempotent_on_measured_table() {
    let mut b = board(10);
    b.spawn(&[0, 6]).unwrap();
    b.split_move(&[0], &[1, 2]).unwrap();
    b.split_move(&[6], &[7, 8]).unwrap();

    let floor = b.config().noise_floor;
    let m = b.measure_detailed().unwrap();
    assert!(m.table.iter().all(|o| o.probability >= floor));
    assert_eq!(m.table.clone().filter(floor), m.table);
    assert!(m.probability() > 0.0);
}

/// Test the most-likely collapse on a lopsided split.
#[test]
fn test_most_likely_collapse() {
    let mut b = board(10);
    b.spawn(&[4]).unwrap();
    b.merge(&[4], &[5, 6], 6).unwrap();

    let m = b.measure_most_likely().unwrap();
    assert_eq!(m.positions, vec![6]);
    assert_eq!(b.register().active(), vec![6]);
}

// =============================================================================
// Serialization Tests
// =============================================================================

/// Test that a measurement record survives JSON.
#[test]
fn test_measurement_json() {
    let mut b = board(10);
    b.spawn(&[0]).unwrap();
    b.split_move(&[0], &[2, 3]).unwrap();
    let m = b.measure_detailed().unwrap();

    let json = serde_json::to_string(&m).unwrap();
    let back: Measurement = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}

/// Test that configuration survives JSON.
#[test]
fn test_config_json() {
    let config = EngineConfig::default().with_shots(2048).with_seed(7);
    let json = serde_json::to_string(&config).unwrap();
    let back: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

/// Test that a board rebuilt from a saved RNG state draws the same outcome.
#[test]
fn test_rng_state_reproduces_draws() {
    let state = EngineRng::new(99).state();
    let json = serde_json::to_string(&state).unwrap();
    let mut a = EngineRng::from_state(&serde_json::from_str(&json).unwrap());
    let mut b = EngineRng::from_state(&state);
    assert_eq!(a.unit(), b.unit());
}
