use chess_rules::game::{has_any_legal_move, legal_moves, would_leave_king_in_check};
use chess_rules::{Board, Color, GameEngine, Move, ScriptedPlayer};
use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use std::hint::black_box;

/// Play ~20 random moves on a fresh board to create a realistic mid-game position.
/// Uses a fixed seed for reproducibility across benchmark runs.
fn setup_midgame() -> Board {
    let board = Board::standard();
    let mut rng = StdRng::seed_from_u64(42);
    let mut color = Color::White;
    for _ in 0..20 {
        let moves = legal_moves(&board, color);
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        board.move_piece(mv.from, mv.to);
        color = color.opposite();
    }
    board
}

fn idle_engine(board: Board) -> GameEngine {
    GameEngine::from_board(
        board,
        Box::new(ScriptedPlayer::new(Color::White, [])),
        Box::new(ScriptedPlayer::new(Color::Black, [])),
        Color::White,
    )
}

// ---------------------------------------------------------------------------
// Microbenchmarks
// ---------------------------------------------------------------------------

fn bench_legal_moves(c: &mut Criterion) {
    let board = setup_midgame();
    c.bench_function("legal_moves", |b| {
        b.iter(|| black_box(legal_moves(&board, Color::White)))
    });
}

fn bench_has_any_legal_move(c: &mut Criterion) {
    let board = setup_midgame();
    c.bench_function("has_any_legal_move", |b| {
        b.iter(|| black_box(has_any_legal_move(&board, Color::Black)))
    });
}

fn bench_square_attacked(c: &mut Criterion) {
    let board = setup_midgame();
    let Some(king) = board.find_king(Color::White) else {
        return;
    };
    c.bench_function("is_square_attacked", |b| {
        b.iter(|| black_box(board.is_square_attacked(king, Color::Black)))
    });
}

fn bench_simulate(c: &mut Criterion) {
    let board = setup_midgame();
    let moves = legal_moves(&board, Color::White);
    let Some(mv) = moves.first() else {
        return;
    };
    c.bench_function("would_leave_king_in_check", |b| {
        b.iter(|| black_box(would_leave_king_in_check(&board, mv, Color::White)))
    });
}

fn bench_checkmate_detection(c: &mut Criterion) {
    let engine = idle_engine(setup_midgame());
    c.bench_function("is_checkmate", |b| {
        b.iter(|| black_box(engine.is_checkmate(Color::Black)))
    });
}

// ---------------------------------------------------------------------------
// Integration benchmarks
// ---------------------------------------------------------------------------

fn bench_random_playout(c: &mut Criterion) {
    c.bench_function("random_playout", |b| {
        b.iter(|| {
            let mut engine = idle_engine(Board::standard());
            let mut rng = StdRng::seed_from_u64(123);
            while engine.status().is_active() && engine.move_count() < 200 {
                let moves = engine.legal_moves(engine.turn());
                let Some(mv) = moves.choose(&mut rng) else {
                    break;
                };
                let _ = engine.try_move(Move::new(mv.from, mv.to));
            }
            black_box(engine.status())
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(1_000);
    targets =
        bench_legal_moves,
        bench_has_any_legal_move,
        bench_square_attacked,
        bench_simulate,
        bench_checkmate_detection,
);
criterion_group!(
    name = playouts;
    config = Criterion::default().sample_size(10);
    targets =
        bench_random_playout,
);
criterion_main!(benches, playouts);
