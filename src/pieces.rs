use crate::board::Squares;
use crate::color::Color;
use crate::position::{BOARD_SIZE, Position};
use arrayvec::ArrayVec;
use std::fmt;

/// Most destinations any piece can have: a queen in the middle of an open board.
pub const MAX_DESTINATIONS: usize = 27;

pub type Destinations = ArrayVec<Position, MAX_DESTINATIONS>;

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRECTIONS;
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PieceType::Pawn => "Pawn",
            PieceType::Knight => "Knight",
            PieceType::Bishop => "Bishop",
            PieceType::Rook => "Rook",
            PieceType::Queen => "Queen",
            PieceType::King => "King",
        };
        write!(f, "{}", s)
    }
}

/// A piece as it sits on the board. `has_moved` flips to true the first time
/// the board executes a move for it and never flips back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Piece {
            piece_type,
            color,
            has_moved: false,
        }
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn set_moved(&mut self) {
        self.has_moved = true;
    }

    pub fn to_char(&self) -> char {
        let c = match self.piece_type {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };

        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let piece_type = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };

        Some(Piece::new(piece_type, color))
    }

    /// Whether this piece's own movement pattern allows `from -> to` on `squares`.
    ///
    /// Only geometry, blocking and the destination's occupant are considered.
    /// Whether the move exposes the mover's king is the engine's concern.
    pub fn can_move(&self, from: Position, to: Position, squares: &Squares) -> bool {
        if !from.is_valid() || !to.is_valid() || from == to {
            return false;
        }

        let d_rank = to.rank - from.rank;
        let d_file = to.file - from.file;

        match self.piece_type {
            PieceType::King => {
                d_rank.abs() <= 1 && d_file.abs() <= 1 && self.can_land_on(to, squares)
            }
            PieceType::Knight => {
                let (r, f) = (d_rank.abs(), d_file.abs());
                ((r == 2 && f == 1) || (r == 1 && f == 2)) && self.can_land_on(to, squares)
            }
            PieceType::Rook => {
                (d_rank == 0 || d_file == 0) && self.slides_to(from, to, squares)
            }
            PieceType::Bishop => {
                d_rank.abs() == d_file.abs() && self.slides_to(from, to, squares)
            }
            PieceType::Queen => {
                (d_rank == 0 || d_file == 0 || d_rank.abs() == d_file.abs())
                    && self.slides_to(from, to, squares)
            }
            PieceType::Pawn => self.pawn_can_move(from, d_rank, d_file, to, squares),
        }
    }

    /// Every destination for which `can_move` holds, scanning outward from `from`.
    pub fn possible_moves(&self, from: Position, squares: &Squares) -> Destinations {
        let mut moves = Destinations::new();
        if !from.is_valid() {
            return moves;
        }

        match self.piece_type {
            PieceType::King => self.step_moves(from, &KING_OFFSETS, squares, &mut moves),
            PieceType::Knight => self.step_moves(from, &KNIGHT_OFFSETS, squares, &mut moves),
            PieceType::Rook => self.sliding_moves(from, &ROOK_DIRECTIONS, squares, &mut moves),
            PieceType::Bishop => self.sliding_moves(from, &BISHOP_DIRECTIONS, squares, &mut moves),
            PieceType::Queen => self.sliding_moves(from, &QUEEN_DIRECTIONS, squares, &mut moves),
            PieceType::Pawn => self.pawn_moves(from, squares, &mut moves),
        }

        moves
    }

    fn is_enemy(&self, other: &Piece) -> bool {
        other.color != self.color
    }

    /// Destination is empty or holds an opposing piece.
    fn can_land_on(&self, to: Position, squares: &Squares) -> bool {
        squares.piece_at(to).is_none_or(|target| self.is_enemy(target))
    }

    /// Straight or diagonal path with every intermediate square empty. Callers
    /// have already checked that `from -> to` is a rank, file or diagonal.
    fn slides_to(&self, from: Position, to: Position, squares: &Squares) -> bool {
        let rank_dir = (to.rank - from.rank).signum();
        let file_dir = (to.file - from.file).signum();

        let mut current = from.offset(rank_dir, file_dir);
        while current != to {
            if squares.piece_at(current).is_some() {
                return false;
            }
            current = current.offset(rank_dir, file_dir);
        }

        self.can_land_on(to, squares)
    }

    fn pawn_can_move(
        &self,
        from: Position,
        d_rank: i8,
        d_file: i8,
        to: Position,
        squares: &Squares,
    ) -> bool {
        let forward = self.color.forward();

        match (d_rank, d_file.abs()) {
            (r, 0) if r == forward => squares.piece_at(to).is_none(),
            (r, 0) if r == 2 * forward => {
                !self.has_moved
                    && from.rank == self.color.pawn_rank()
                    && squares.piece_at(from.offset(forward, 0)).is_none()
                    && squares.piece_at(to).is_none()
            }
            (r, 1) if r == forward => squares
                .piece_at(to)
                .is_some_and(|target| self.is_enemy(target)),
            _ => false,
        }
    }

    fn step_moves(
        &self,
        from: Position,
        offsets: &[(i8, i8)],
        squares: &Squares,
        moves: &mut Destinations,
    ) {
        for &(d_rank, d_file) in offsets {
            let to = from.offset(d_rank, d_file);
            if to.is_valid() && self.can_land_on(to, squares) {
                moves.push(to);
            }
        }
    }

    fn sliding_moves(
        &self,
        from: Position,
        directions: &[(i8, i8)],
        squares: &Squares,
        moves: &mut Destinations,
    ) {
        for &(rank_dir, file_dir) in directions {
            for distance in 1..BOARD_SIZE {
                let to = from.offset(rank_dir * distance, file_dir * distance);
                if !to.is_valid() {
                    break;
                }

                match squares.piece_at(to) {
                    None => moves.push(to),
                    Some(target) => {
                        if self.is_enemy(target) {
                            moves.push(to);
                        }
                        break;
                    }
                }
            }
        }
    }

    fn pawn_moves(&self, from: Position, squares: &Squares, moves: &mut Destinations) {
        let forward = self.color.forward();

        let one = from.offset(forward, 0);
        if one.is_valid() && squares.piece_at(one).is_none() {
            moves.push(one);

            let two = from.offset(2 * forward, 0);
            if !self.has_moved
                && from.rank == self.color.pawn_rank()
                && two.is_valid()
                && squares.piece_at(two).is_none()
            {
                moves.push(two);
            }
        }

        for d_file in [-1, 1] {
            let capture = from.offset(forward, d_file);
            if capture.is_valid()
                && squares
                    .piece_at(capture)
                    .is_some_and(|target| self.is_enemy(target))
            {
                moves.push(capture);
            }
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.piece_type)
    }
}
