use crate::color::Color;
use crate::error::ParseError;
use crate::pieces::{Piece, PieceType};
use crate::position::{BOARD_SIZE, Position};
use std::fmt;
use std::ops::Deref;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const SIZE: usize = BOARD_SIZE as usize;

pub const STANDARD_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// The bare 8x8 grid. Piece rules read from this; `Board` guards it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Squares {
    cells: [[Option<Piece>; SIZE]; SIZE],
}

impl Squares {
    pub fn empty() -> Self {
        Squares {
            cells: [[None; SIZE]; SIZE],
        }
    }

    pub fn standard() -> Self {
        let mut squares = Squares::empty();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (color, back, pawns) in [(Color::Black, 0, 1), (Color::White, 7, 6)] {
            for (file, piece_type) in back_rank.iter().enumerate() {
                squares.cells[back][file] = Some(Piece::new(*piece_type, color));
                squares.cells[pawns][file] = Some(Piece::new(PieceType::Pawn, color));
            }
        }

        squares
    }

    /// Parses a FEN piece-placement field: eight ranks separated by `/`, the
    /// eighth rank first, digits standing for runs of empty squares.
    pub fn from_placement(placement: &str) -> Result<Self, ParseError> {
        let mut squares = Squares::empty();

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != SIZE {
            return Err(ParseError::InvalidPlacement(format!(
                "expected {} ranks, got {}",
                SIZE,
                ranks.len()
            )));
        }

        for (rank, rank_str) in ranks.iter().enumerate() {
            let mut file = 0;

            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else if let Some(piece) = Piece::from_char(c) {
                    if file >= SIZE {
                        return Err(ParseError::InvalidPlacement(format!(
                            "rank {} overflows the board",
                            SIZE - rank
                        )));
                    }
                    squares.cells[rank][file] = Some(piece);
                    file += 1;
                } else {
                    return Err(ParseError::InvalidPlacement(format!(
                        "unexpected character {:?}",
                        c
                    )));
                }
            }

            if file != SIZE {
                return Err(ParseError::InvalidPlacement(format!(
                    "rank {} has {} squares",
                    SIZE - rank,
                    file
                )));
            }
        }

        Ok(squares)
    }

    pub fn to_placement(&self) -> String {
        let mut placement = String::new();

        for (rank, row) in self.cells.iter().enumerate() {
            let mut empty_count = 0;

            for cell in row {
                if let Some(piece) = cell {
                    if empty_count > 0 {
                        placement.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    placement.push(piece.to_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                placement.push_str(&empty_count.to_string());
            }

            if rank + 1 < SIZE {
                placement.push('/');
            }
        }

        placement
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        if pos.is_valid() {
            self.cells[pos.rank as usize][pos.file as usize].as_ref()
        } else {
            None
        }
    }

    /// Writes `piece` into `pos` and hands back the previous occupant.
    /// Off-board positions are left alone.
    pub fn replace(&mut self, pos: Position, piece: Option<Piece>) -> Option<Piece> {
        if pos.is_valid() {
            std::mem::replace(&mut self.cells[pos.rank as usize][pos.file as usize], piece)
        } else {
            None
        }
    }

    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        self.replace(pos, None)
    }

    /// Occupied squares in rank-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &Piece)> {
        Position::all().filter_map(move |pos| self.piece_at(pos).map(|piece| (pos, piece)))
    }

    pub fn pieces_of_color(&self, color: Color) -> Vec<Position> {
        self.occupied()
            .filter(|(_, piece)| piece.color == color)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.occupied()
            .find(|(_, piece)| piece.piece_type == PieceType::King && piece.color == color)
            .map(|(pos, _)| pos)
    }

    #[hotpath::measure]
    pub fn is_square_attacked(&self, target: Position, by_color: Color) -> bool {
        self.occupied()
            .any(|(pos, piece)| piece.color == by_color && piece.can_move(pos, target, self))
    }

    /// Relocates the piece on `from` to `to` if its movement rules allow it,
    /// marking it as moved.
    pub fn move_piece(&mut self, from: Position, to: Position) -> bool {
        let allowed = self
            .piece_at(from)
            .is_some_and(|piece| piece.can_move(from, to, self));
        if !allowed {
            return false;
        }

        if let Some(mut piece) = self.take(from) {
            piece.set_moved();
            self.replace(to, Some(piece));
        }
        true
    }

    /// Applies `from -> to` until the returned guard is dropped.
    pub fn simulate(&mut self, from: Position, to: Position) -> SimulatedMove<'_> {
        SimulatedMove::new(self, from, to)
    }
}

impl Default for Squares {
    fn default() -> Self {
        Self::standard()
    }
}

/// A what-if move on a grid. The move is applied on construction and undone
/// when the guard is dropped, including during unwinding. `has_moved` is not
/// touched, so the undo is exact.
pub struct SimulatedMove<'a> {
    squares: &'a mut Squares,
    from: Position,
    to: Position,
    captured: Option<Piece>,
}

impl<'a> SimulatedMove<'a> {
    fn new(squares: &'a mut Squares, from: Position, to: Position) -> Self {
        let moving = squares.take(from);
        let captured = squares.replace(to, moving);
        SimulatedMove {
            squares,
            from,
            to,
            captured,
        }
    }

    pub fn captured(&self) -> Option<&Piece> {
        self.captured.as_ref()
    }
}

impl Deref for SimulatedMove<'_> {
    type Target = Squares;

    fn deref(&self) -> &Squares {
        self.squares
    }
}

impl Drop for SimulatedMove<'_> {
    fn drop(&mut self) {
        let moving = self.squares.replace(self.to, self.captured.take());
        self.squares.replace(self.from, moving);
    }
}

/// The game board: a grid behind a reader/writer lock.
///
/// Queries share the read lock, so they may run from several threads at once;
/// placement, moves and simulations take the write lock. Every method holds
/// the lock only for its own duration.
#[derive(Debug)]
pub struct Board {
    squares: RwLock<Squares>,
}

impl Board {
    pub fn standard() -> Self {
        Self::from_squares(Squares::standard())
    }

    pub fn empty() -> Self {
        Self::from_squares(Squares::empty())
    }

    pub fn from_squares(squares: Squares) -> Self {
        Board {
            squares: RwLock::new(squares),
        }
    }

    pub fn from_placement(placement: &str) -> Result<Self, ParseError> {
        Squares::from_placement(placement).map(Self::from_squares)
    }

    // The grid is plain data and every writer leaves it whole before it can
    // panic, so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Squares> {
        self.squares.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Squares> {
        self.squares.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        self.read().piece_at(pos).copied()
    }

    pub fn set_piece(&self, pos: Position, piece: Option<Piece>) {
        self.write().replace(pos, piece);
    }

    /// Checks the piece's movement rules and relocates it in one write-locked
    /// step. Returns false, leaving the board untouched, when there is no piece
    /// on `from` or the piece cannot reach `to`.
    pub fn move_piece(&self, from: Position, to: Position) -> bool {
        self.write().move_piece(from, to)
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.read().find_king(color)
    }

    pub fn is_square_attacked(&self, pos: Position, by_color: Color) -> bool {
        self.read().is_square_attacked(pos, by_color)
    }

    pub fn get_all_pieces_of_color(&self, color: Color) -> Vec<Position> {
        self.read().pieces_of_color(color)
    }

    /// Runs `probe` against the grid as it would be after `from -> to`, then
    /// restores the grid. Other callers wait for the whole probe and never see
    /// the hypothetical position.
    pub fn simulate<R>(&self, from: Position, to: Position, probe: impl FnOnce(&Squares) -> R) -> R {
        let mut squares = self.write();
        let simulated = squares.simulate(from, to);
        probe(&*simulated)
    }

    /// Runs `f` with shared access to the grid for several queries in a row.
    pub fn with_squares<R>(&self, f: impl FnOnce(&Squares) -> R) -> R {
        f(&self.read())
    }

    pub fn snapshot(&self) -> Squares {
        self.read().clone()
    }

    pub fn to_placement(&self) -> String {
        self.read().to_placement()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Self::from_squares(self.snapshot())
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot() == other.snapshot()
    }
}

impl fmt::Display for Squares {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, " ")?;
        for file in 0..SIZE {
            write!(f, " {}", (b'a' + file as u8) as char)?;
        }
        writeln!(f)?;

        for (rank, row) in self.cells.iter().enumerate() {
            write!(f, "{}", SIZE - rank)?;
            for cell in row {
                match cell {
                    Some(piece) => write!(f, " {}", piece.to_char())?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.read())
    }
}
