use crate::color::Color;
use crate::outcome::GameStatus;
use crate::pieces::Piece;
use crate::position::Position;

/// Why the engine refused a proposed move. Every variant is recoverable: the
/// same player is simply asked again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("no piece at {0}")]
    NoPiece(Position),

    #[error("the piece at {square} belongs to {color}")]
    WrongColor { square: Position, color: Color },

    #[error("{piece} cannot move from {from} to {to}")]
    IllegalGeometry {
        piece: Piece,
        from: Position,
        to: Position,
    },

    #[error("{from} -> {to} would leave the {color} king in check")]
    LeavesKingInCheck {
        from: Position,
        to: Position,
        color: Color,
    },

    #[error("the king on {0} cannot be captured")]
    KingCapture(Position),

    #[error("game is already over: {0}")]
    GameOver(GameStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid square notation: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0:?}")]
    InvalidMove(String),

    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),
}
