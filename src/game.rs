use crate::board::{Board, Squares};
use crate::color::Color;
use crate::error::MoveError;
use crate::outcome::GameStatus;
use crate::pieces::PieceType;
use crate::player::Player;
use crate::position::Position;
use crate::r#move::{Move, MoveFlags};
use std::fmt;

/// Fills in the captured piece and flags for `from -> to` as the grid stands.
fn annotate(squares: &Squares, from: Position, to: Position) -> Move {
    let mut mv = Move::with_capture(from, to, squares.piece_at(to).copied());
    if squares
        .piece_at(from)
        .is_some_and(|p| p.piece_type == PieceType::Pawn)
        && (to.rank - from.rank).abs() == 2
    {
        mv.flags |= MoveFlags::DOUBLE_PUSH;
    }
    mv
}

fn king_attacked(squares: &Squares, color: Color) -> bool {
    squares
        .find_king(color)
        .is_some_and(|king| squares.is_square_attacked(king, color.opposite()))
}

/// Every move the pieces of `color` could make by their own rules, excluding
/// captures of the opposing king.
fn candidate_moves(board: &Board, color: Color) -> Vec<Move> {
    board.with_squares(|squares| {
        squares
            .occupied()
            .filter(|(_, piece)| piece.color == color)
            .flat_map(|(from, piece)| {
                piece
                    .possible_moves(from, squares)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .filter(|&(_, to)| {
                !squares
                    .piece_at(to)
                    .is_some_and(|target| target.piece_type == PieceType::King)
            })
            .map(|(from, to)| annotate(squares, from, to))
            .collect()
    })
}

/// Whether playing `mv` would leave the king of `color` attacked. The board is
/// restored before this returns, whatever the answer.
pub fn would_leave_king_in_check(board: &Board, mv: &Move, color: Color) -> bool {
    board.simulate(mv.from, mv.to, |squares| king_attacked(squares, color))
}

/// Fully legal moves for `color`, in rank-major order of the moving piece.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    candidate_moves(board, color)
        .into_iter()
        .filter(|mv| !would_leave_king_in_check(board, mv, color))
        .collect()
}

#[hotpath::measure]
pub fn has_any_legal_move(board: &Board, color: Color) -> bool {
    candidate_moves(board, color)
        .iter()
        .any(|mv| !would_leave_king_in_check(board, mv, color))
}

/// Runs one game between two players: asks the side to move for a move,
/// checks it, applies it and decides whether the game is over.
pub struct GameEngine {
    board: Board,
    initial: Squares,
    white: Box<dyn Player>,
    black: Box<dyn Player>,
    turn: Color,
    status: GameStatus,
    resigned_by: Option<Color>,
    move_history: Vec<Move>,
}

impl GameEngine {
    /// A game from the standard starting position, White to move.
    pub fn new(white: Box<dyn Player>, black: Box<dyn Player>) -> Self {
        Self::from_board(Board::standard(), white, black, Color::White)
    }

    pub fn from_board(
        board: Board,
        white: Box<dyn Player>,
        black: Box<dyn Player>,
        turn: Color,
    ) -> Self {
        if white.color() != Color::White || black.color() != Color::Black {
            log::warn!(
                "players seated against their colors: {} plays White, {} plays Black",
                white.name(),
                black.name()
            );
        }

        GameEngine {
            initial: board.snapshot(),
            board,
            white,
            black,
            turn,
            status: GameStatus::Active,
            resigned_by: None,
            move_history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn current_player(&self) -> &dyn Player {
        self.player(self.turn)
    }

    pub fn player(&self, color: Color) -> &dyn Player {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    pub fn resigned_by(&self) -> Option<Color> {
        self.resigned_by
    }

    /// Checks `mv` for the side to move without touching the board.
    pub fn validate_move(&self, mv: &Move) -> Result<(), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver(self.status));
        }

        let piece = self
            .board
            .get_piece(mv.from)
            .ok_or(MoveError::NoPiece(mv.from))?;

        if piece.color != self.turn {
            return Err(MoveError::WrongColor {
                square: mv.from,
                color: piece.color,
            });
        }

        let (reachable, target) = self.board.with_squares(|squares| {
            (
                piece.can_move(mv.from, mv.to, squares),
                squares.piece_at(mv.to).copied(),
            )
        });
        if !reachable {
            return Err(MoveError::IllegalGeometry {
                piece,
                from: mv.from,
                to: mv.to,
            });
        }

        if target.is_some_and(|t| t.piece_type == PieceType::King) {
            return Err(MoveError::KingCapture(mv.to));
        }

        if self.would_move_put_king_in_check(mv) {
            return Err(MoveError::LeavesKingInCheck {
                from: mv.from,
                to: mv.to,
                color: self.turn,
            });
        }

        Ok(())
    }

    pub fn is_valid_move(&self, mv: &Move) -> bool {
        self.validate_move(mv).is_ok()
    }

    /// Whether `mv` would leave the mover's own king attacked. The mover is
    /// whoever owns the piece on `mv.from`, or the side to move if it is empty.
    pub fn would_move_put_king_in_check(&self, mv: &Move) -> bool {
        let color = self
            .board
            .get_piece(mv.from)
            .map_or(self.turn, |piece| piece.color);
        would_leave_king_in_check(&self.board, mv, color)
    }

    /// Validates and plays `mv` for the side to move, then settles the status
    /// for the opponent. The turn passes only while the game stays active.
    pub fn try_move(&mut self, mv: Move) -> Result<GameStatus, MoveError> {
        self.validate_move(&mv)?;

        let record = self
            .board
            .with_squares(|squares| annotate(squares, mv.from, mv.to));

        if !self.board.move_piece(mv.from, mv.to) {
            // validate_move has just run the same geometry check
            let piece = self.board.get_piece(mv.from).ok_or(MoveError::NoPiece(mv.from))?;
            return Err(MoveError::IllegalGeometry {
                piece,
                from: mv.from,
                to: mv.to,
            });
        }

        log::debug!("{} plays {}", self.turn, record);
        self.move_history.push(record);

        self.status = self.evaluate_status(self.turn);
        if self.status.is_active() {
            self.turn = self.turn.opposite();
        } else {
            log::info!("game over after {} moves: {}", self.move_count(), self.status);
        }

        Ok(self.status)
    }

    /// Outcome of the position for the side that has to answer `mover`'s move.
    fn evaluate_status(&self, mover: Color) -> GameStatus {
        let opponent = mover.opposite();

        if self.is_checkmate(opponent) {
            GameStatus::win_for(mover)
        } else if self.is_stalemate(opponent) {
            GameStatus::Stalemate
        } else {
            GameStatus::Active
        }
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.with_squares(|squares| king_attacked(squares, color))
    }

    /// True when `color`'s king is attacked and no move removes the attack.
    /// A missing king counts as mated.
    pub fn is_checkmate(&self, color: Color) -> bool {
        let Some(king) = self.board.find_king(color) else {
            log::warn!("no {} king on the board, treating as checkmate", color);
            return true;
        };

        if !self.board.is_square_attacked(king, color.opposite()) {
            return false;
        }

        !self.has_any_valid_move(color)
    }

    /// True when `color`'s king is not attacked but `color` has no legal move.
    pub fn is_stalemate(&self, color: Color) -> bool {
        let Some(king) = self.board.find_king(color) else {
            return false;
        };

        if self.board.is_square_attacked(king, color.opposite()) {
            return false;
        }

        !self.has_any_valid_move(color)
    }

    pub fn has_any_valid_move(&self, color: Color) -> bool {
        has_any_legal_move(&self.board, color)
    }

    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        legal_moves(&self.board, color)
    }

    /// Asks the side to move until it supplies a legal move, or resigns.
    pub fn play_turn(&mut self) -> GameStatus {
        while self.status.is_active() {
            let player = match self.turn {
                Color::White => &mut self.white,
                Color::Black => &mut self.black,
            };

            let Some(mv) = player.request_move(&self.board) else {
                self.resign();
                break;
            };

            match self.try_move(mv) {
                Ok(status) => return status,
                Err(reason) => {
                    log::debug!("{} rejected for {}: {}", mv, self.turn, reason);
                    let player = match self.turn {
                        Color::White => &mut self.white,
                        Color::Black => &mut self.black,
                    };
                    player.move_rejected(&mv, &reason);
                }
            }
        }

        self.status
    }

    /// Plays turns until the game is over.
    pub fn run(&mut self) -> GameStatus {
        log::info!(
            "game started: {} (White) vs {} (Black)",
            self.white.name(),
            self.black.name()
        );

        while self.status.is_active() {
            self.play_turn();
        }

        self.status
    }

    /// The side to move gives up.
    pub fn resign(&mut self) {
        if self.status.is_active() {
            log::info!("{} resigns", self.turn);
            self.status = GameStatus::Resigned;
            self.resigned_by = Some(self.turn);
        }
    }

    pub fn agree_draw(&mut self) {
        if self.status.is_active() {
            log::info!("draw agreed after {} moves", self.move_count());
            self.status = GameStatus::Draw;
        }
    }

    /// Rebuilds the position from the starting grid and the recorded history.
    /// `None` if some recorded move no longer applies.
    pub fn replay_history(&self) -> Option<Squares> {
        let board = Board::from_squares(self.initial.clone());
        for mv in &self.move_history {
            if !board.move_piece(mv.from, mv.to) {
                log::warn!("recorded move {} does not replay", mv);
                return None;
            }
        }
        Some(board.snapshot())
    }
}

impl fmt::Display for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game(current_player: {}, status: {})\n{}",
            self.turn, self.status, self.board
        )
    }
}
