use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use shape_links::game_state::board_types::*;
use shape_links::search::board_scoring::{BoardScorer, CenterScorer, HoneycombScorer};
use shape_links::search::cancellation::CancellationToken;
use shape_links::search::negamax::{negamax, SearchContext, SearchVariant};
use shape_links::search::score::{LOSS_SCORE, WIN_SCORE};
use shape_links::search::transposition_table::TranspositionTable;
use shape_links::search::zobrist::ZobristKeys;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    moves: &'static [(usize, PShape)],
    depth: u8,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "empty",
        moves: &[],
        depth: 6,
    },
    BenchCase {
        name: "midgame",
        moves: &[
            (3, PShape::Round),
            (3, PShape::Square),
            (2, PShape::Round),
            (4, PShape::Square),
            (2, PShape::Square),
            (5, PShape::Round),
        ],
        depth: 6,
    },
];

fn setup_board(case: &BenchCase) -> Board {
    let mut board = Board::default();
    for &(col, shape) in case.moves {
        board
            .apply_move(Move::new(col, shape))
            .expect("benchmark moves should apply");
    }
    board
}

fn run_search<S: BoardScorer + ?Sized>(
    board: &mut Board,
    keys: &ZobristKeys,
    scorer: &S,
    variant: SearchVariant,
    depth: u8,
    use_tt: bool,
) -> u64 {
    let mut tt = TranspositionTable::with_entries(1 << 18);
    let cancel = CancellationToken::new();
    let key = keys.hash_board(board);
    let mut ctx = SearchContext::new(scorer, keys, use_tt.then_some(&mut tt), &cancel, variant);
    negamax(board, key, 0, depth, LOSS_SCORE, WIN_SCORE, &mut ctx)
        .expect("benchmark search should complete");
    ctx.nodes
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("negamax");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    let keys = ZobristKeys::with_seed(7, 6, 2024);

    for case in CASES {
        for (variant, use_tt) in [
            (SearchVariant::AlphaBeta, false),
            (SearchVariant::AlphaBeta, true),
            (SearchVariant::Pvs, true),
        ] {
            let bench_name = format!(
                "{}_d{}_{}{}",
                case.name,
                case.depth,
                variant.as_str(),
                if use_tt { "_tt" } else { "" }
            );
            let mut board = setup_board(case);

            group.bench_with_input(
                BenchmarkId::from_parameter(bench_name),
                &case.depth,
                |b, &depth| {
                    b.iter(|| {
                        let nodes = run_search(
                            black_box(&mut board),
                            &keys,
                            &HoneycombScorer,
                            variant,
                            depth,
                            use_tt,
                        );
                        black_box(nodes)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_scorers(c: &mut Criterion) {
    let mut group = c.benchmark_group("scorers");
    let board = setup_board(&CASES[1]);

    group.bench_function("honeycomb", |b| {
        b.iter(|| HoneycombScorer.score(black_box(&board), PColor::White))
    });
    group.bench_function("center", |b| {
        b.iter(|| CenterScorer.score(black_box(&board), PColor::White))
    });

    group.finish();
}

criterion_group!(search_benches, bench_search, bench_scorers);
criterion_main!(search_benches);
