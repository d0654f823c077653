use crate::error::ParseError;
use crate::pieces::Piece;
use crate::position::Position;
use bitflags::bitflags;

bitflags! {
    /// `SPECIAL` marks castling, en passant and promotion. None of those are
    /// part of the rule set: the engine never generates or sets it, and a king
    /// or pawn move that would need it is simply illegal.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        const CAPTURE = 0b00000001;
        const DOUBLE_PUSH = 0b00000010;
        const SPECIAL = 0b00000100;
    }
}

/// A proposed or recorded transition. Applying it is the board's job; the
/// value itself never changes board state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub captured: Option<Piece>,
    pub flags: MoveFlags,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move {
            from,
            to,
            captured: None,
            flags: MoveFlags::empty(),
        }
    }

    pub fn with_capture(from: Position, to: Position, captured: Option<Piece>) -> Self {
        let flags = if captured.is_some() {
            MoveFlags::CAPTURE
        } else {
            MoveFlags::empty()
        };
        Move {
            from,
            to,
            captured,
            flags,
        }
    }

    pub fn from_squares(from: &str, to: &str) -> Result<Self, ParseError> {
        Ok(Move::new(
            Position::from_algebraic(from)?,
            Position::from_algebraic(to)?,
        ))
    }

    /// Parses coordinate notation such as `e2e4`.
    pub fn from_lan(lan: &str) -> Result<Self, ParseError> {
        if lan.len() != 4 || !lan.is_ascii() {
            return Err(ParseError::InvalidMove(lan.to_string()));
        }

        Move::from_squares(&lan[0..2], &lan[2..4])
    }

    pub fn to_lan(&self) -> String {
        format!("{}{}", self.from.to_algebraic(), self.to.to_algebraic())
    }

    pub fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    pub fn is_special(&self) -> bool {
        self.flags.contains(MoveFlags::SPECIAL)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
