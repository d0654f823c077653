use crate::color::Color;
use std::fmt;

/// Where a game stands. `Active` is the only non-terminal state; once any
/// other value is reached the game never leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Active,
    WhiteWin,
    BlackWin,
    Draw,
    Resigned,
    Stalemate,
}

impl GameStatus {
    pub fn win_for(color: Color) -> GameStatus {
        match color {
            Color::White => GameStatus::WhiteWin,
            Color::Black => GameStatus::BlackWin,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, GameStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// The checkmating side, if the game ended in checkmate.
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameStatus::WhiteWin => Some(Color::White),
            GameStatus::BlackWin => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Active => "active",
            GameStatus::WhiteWin => "white_win",
            GameStatus::BlackWin => "black_win",
            GameStatus::Draw => "draw",
            GameStatus::Resigned => "resigned",
            GameStatus::Stalemate => "stalemate",
        };
        write!(f, "{}", s)
    }
}
