//! # Measurement Benchmarks
//!
//! Cost of one measurement as the active set grows, on a full-size board.
//!
//! Run: `cargo bench --bench measure`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quantum_ludo::{EngineConfig, QuantumBoard};

/// Board with `pawns` pawns, each split over the two squares ahead of it.
fn split_board(pawns: usize) -> QuantumBoard {
    let mut board = QuantumBoard::new(EngineConfig::default()).expect("default config is valid");
    let starts: Vec<usize> = (0..pawns).map(|p| p * 4).collect();
    board.spawn(&starts).expect("starts are on the board");
    for &s in &starts {
        board.split_move(&[s], &[s + 1, s + 2]).expect("destinations are on the board");
    }
    board
}

/// Benchmark measurement with single-block and chunked active sets
fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure");

    // 2..6 pawns fit one block; 8 pawns (24 active) is chunked.
    for pawns in [2, 4, 6, 8] {
        let board = split_board(pawns);
        group.bench_with_input(BenchmarkId::from_parameter(pawns), &board, |b, board| {
            b.iter(|| {
                let mut board = board.clone();
                black_box(board.measure().expect("measurement succeeds"))
            })
        });
    }

    group.finish();
}

/// Benchmark the noiseless distribution without sampling
fn bench_exact_distribution(c: &mut Criterion) {
    let board = split_board(6);
    c.bench_function("exact_distribution_6_pawns", |b| {
        b.iter(|| black_box(board.exact_distribution().expect("fits the budget")))
    });
}

criterion_group!(benches, bench_measure, bench_exact_distribution);
criterion_main!(benches);
