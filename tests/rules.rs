use chess_rules::game::{legal_moves, would_leave_king_in_check};
use chess_rules::{Board, Color, Move, Piece, PieceType, Position, Squares};
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rstest::rstest;

fn pos(s: &str) -> Position {
    Position::from_algebraic(s).expect("Failed to parse square")
}

/// Plays `plies` random legal moves from the standard position.
fn random_board(seed: u64, plies: usize) -> Board {
    let board = Board::standard();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut color = Color::White;
    for _ in 0..plies {
        let moves = legal_moves(&board, color);
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        assert!(board.move_piece(mv.from, mv.to));
        color = color.opposite();
    }
    board
}

fn assert_generation_matches_geometry(squares: &Squares) {
    for (from, piece) in squares.occupied() {
        let generated = piece.possible_moves(from, squares);
        for to in Position::all() {
            assert_eq!(
                generated.contains(&to),
                piece.can_move(from, to, squares),
                "{} on {}: possible_moves and can_move disagree about {}\n{}",
                piece,
                from,
                to,
                squares
            );
        }
    }
}

#[rstest]
#[case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")]
#[case("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR")]
#[case("8/8/3p4/2P1P3/3Q4/2p1p3/3P4/8")]
#[case("k7/8/1K6/8/8/8/8/2Q5")]
#[case("4k3/8/8/8/8/8/8/R3K2R")]
fn test_generation_matches_geometry_on_fixtures(#[case] placement: &str) {
    let squares = Squares::from_placement(placement).expect("Failed to parse placement");
    assert_generation_matches_geometry(&squares);
}

#[rstest]
fn test_generation_matches_geometry_on_random_games(
    #[values(1, 7, 42, 1234, 9001)] seed: u64,
    #[values(10, 40)] plies: usize,
) {
    let board = random_board(seed, plies);
    assert_generation_matches_geometry(&board.snapshot());
}

#[rstest]
#[case(PieceType::Rook, "d4", "d6", "f4")]
#[case(PieceType::Bishop, "d4", "f6", "b2")]
#[case(PieceType::Queen, "d4", "d6", "f6")]
fn test_sliders_stop_at_first_piece(
    #[case] piece_type: PieceType,
    #[case] from: &str,
    #[case] friendly: &str,
    #[case] enemy: &str,
) {
    let board = Board::empty();
    let slider = Piece::new(piece_type, Color::White);
    board.set_piece(pos(from), Some(slider));
    board.set_piece(pos(friendly), Some(Piece::new(PieceType::Pawn, Color::White)));
    board.set_piece(pos(enemy), Some(Piece::new(PieceType::Pawn, Color::Black)));

    let squares = board.snapshot();
    let moves = slider.possible_moves(pos(from), &squares);

    let (from, friendly, enemy) = (pos(from), pos(friendly), pos(enemy));
    assert!(!moves.contains(&friendly));
    assert!(moves.contains(&enemy));

    for (blocker, included) in [(friendly, false), (enemy, true)] {
        let d_rank = (blocker.rank - from.rank).signum();
        let d_file = (blocker.file - from.file).signum();

        let mut square = from.offset(d_rank, d_file);
        while square != blocker {
            assert!(moves.contains(&square), "{} should be reachable", square);
            square = square.offset(d_rank, d_file);
        }
        assert_eq!(moves.contains(&blocker), included);

        let mut beyond = blocker.offset(d_rank, d_file);
        while beyond.is_valid() {
            assert!(!moves.contains(&beyond), "{} lies behind {}", beyond, blocker);
            beyond = beyond.offset(d_rank, d_file);
        }
    }
}

#[rstest]
fn test_simulation_always_restores(#[values(3, 11, 99)] seed: u64) {
    let board = random_board(seed, 30);
    let before = board.snapshot();

    let mut probes = 0;
    for color in [Color::White, Color::Black] {
        for (from, piece) in before.occupied().filter(|(_, p)| p.color == color) {
            for to in piece.possible_moves(from, &before) {
                let mv = Move::new(from, to);
                would_leave_king_in_check(&board, &mv, color);
                assert_eq!(board.snapshot(), before, "{} left the board changed", mv);
                probes += 1;
            }
        }
    }
    assert!(probes > 0);
}

#[test]
fn test_simulation_restores_when_move_is_refused() {
    // The bishop on e2 is pinned: the probe answers true and must still undo.
    let board = Board::from_placement("k3r3/8/8/8/8/8/4B3/4K3").expect("Failed to parse");
    let before = board.snapshot();

    assert!(would_leave_king_in_check(&board, &Move::new(pos("e2"), pos("d3")), Color::White));
    assert_eq!(board.snapshot(), before);

    assert!(!would_leave_king_in_check(&board, &Move::new(pos("e2"), pos("e3")), Color::White));
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_pawn_attacks_only_diagonally_for_king_safety() {
    // A black pawn directly in front of the white king does not attack it.
    let board = Board::from_placement("4k3/8/8/8/8/8/4p3/4K3").expect("Failed to parse");
    assert!(!board.is_square_attacked(pos("e1"), Color::Black));

    let board = Board::from_placement("4k3/8/8/8/8/8/3p4/4K3").expect("Failed to parse");
    assert!(board.is_square_attacked(pos("e1"), Color::Black));
}

#[test]
fn test_concurrent_legality_probes() {
    let board = random_board(5, 24);
    let expected_white = legal_moves(&board, Color::White);
    let expected_black = legal_moves(&board, Color::Black);

    std::thread::scope(|s| {
        let white = s.spawn(|| legal_moves(&board, Color::White));
        let black = s.spawn(|| legal_moves(&board, Color::Black));
        assert_eq!(white.join().expect("white probe panicked"), expected_white);
        assert_eq!(black.join().expect("black probe panicked"), expected_black);
    });
}
