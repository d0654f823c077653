//! Chess rules: per-piece movement, attack detection, check, checkmate and
//! stalemate, driven by a turn-sequencing engine.
//!
//! Castling, en passant and promotion are not part of the rule set.

pub mod board;
pub mod color;
pub mod error;
pub mod game;
pub mod r#move;
pub mod outcome;
pub mod pieces;
pub mod player;
pub mod position;

pub use board::{Board, Squares};
pub use color::Color;
pub use error::{MoveError, ParseError};
pub use game::GameEngine;
pub use r#move::{Move, MoveFlags};
pub use outcome::GameStatus;
pub use pieces::{Piece, PieceType};
pub use player::{HumanPlayer, Player, ScriptedPlayer};
pub use position::Position;
