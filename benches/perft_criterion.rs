use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ferrule_chess::move_generation::move_generator::MoveGenerator;
use ferrule_chess::move_generation::perft::{perft, REFERENCE_POSITIONS};
use ferrule_chess::search::board_scoring::INFINITY;
use ferrule_chess::search::engine::SearchEngine;
use ferrule_chess::utils::fen_parser::parse_fen;

/// Selected with `FERRULE_BENCH_SUITE`; quick unless set to `standard`.
#[derive(Clone, Copy)]
enum Suite {
    Quick,
    Standard,
}

impl Suite {
    fn from_env() -> Self {
        match std::env::var("FERRULE_BENCH_SUITE") {
            Ok(value) if value.eq_ignore_ascii_case("standard") => Suite::Standard,
            _ => Suite::Quick,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Suite::Quick => "quick",
            Suite::Standard => "standard",
        }
    }

    fn max_nodes(self) -> u64 {
        match self {
            Suite::Quick => 10_000,
            Suite::Standard => 4_000_000,
        }
    }

    fn search_depth(self) -> u8 {
        match self {
            Suite::Quick => 4,
            Suite::Standard => 5,
        }
    }
}

fn bench_perft(c: &mut Criterion) {
    let suite = Suite::from_env();
    let generator = MoveGenerator::shared();

    let mut group = c.benchmark_group(format!("perft_{}", suite.name()));
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for reference in REFERENCE_POSITIONS {
        let board = parse_fen(reference.fen).expect("suite FEN should parse");

        for (depth, expected) in reference.depths_up_to(suite.max_nodes()) {
            // Refuse to time a generator that counts wrong.
            let mut check = board.clone();
            assert_eq!(
                perft(&generator, &mut check, depth),
                expected,
                "{} depth {depth}",
                reference.name
            );

            group.throughput(Throughput::Elements(expected));
            let mut bench_board = board.clone();
            group.bench_function(BenchmarkId::new(reference.name, depth), |b| {
                b.iter(|| black_box(perft(&generator, black_box(&mut bench_board), depth)));
            });
        }
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let suite = Suite::from_env();
    let depth = suite.search_depth();

    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for reference in &REFERENCE_POSITIONS[..2] {
        let mut board = parse_fen(reference.fen).expect("suite FEN should parse");
        group.bench_function(BenchmarkId::new(reference.name, depth), |b| {
            b.iter(|| {
                // Fresh tables so every iteration does the same work.
                let mut engine = SearchEngine::default();
                let score = engine.search(black_box(&mut board), depth, -INFINITY, INFINITY);
                black_box((score, engine.best_move()))
            });
        });
    }

    group.finish();
}

criterion_group!(perft_benches, bench_perft, bench_search);
criterion_main!(perft_benches);
