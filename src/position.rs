use crate::error::ParseError;
use std::fmt;

pub const BOARD_SIZE: i8 = 8;

/// A board coordinate. Rank index 0 is the eighth rank, file index 0 is the a-file.
///
/// Positions may be constructed off the board (e.g. by `offset`); callers check
/// `is_valid` before using one to index a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub rank: i8,
    pub file: i8,
}

impl Position {
    pub const fn new(rank: i8, file: i8) -> Self {
        Position { rank, file }
    }

    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.rank) && (0..BOARD_SIZE).contains(&self.file)
    }

    pub fn offset(&self, d_rank: i8, d_file: i8) -> Position {
        Position::new(self.rank + d_rank, self.file + d_file)
    }

    /// Iterates every square, rank-major (a8, b8, ..., h1).
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|rank| (0..BOARD_SIZE).map(move |file| Position::new(rank, file)))
    }

    pub fn to_algebraic(&self) -> String {
        if self.is_valid() {
            format!(
                "{}{}",
                (b'a' + self.file as u8) as char,
                BOARD_SIZE - self.rank
            )
        } else {
            format!("({},{})", self.rank, self.file)
        }
    }

    pub fn from_algebraic(s: &str) -> Result<Self, ParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }

        let (file_char, rank_char) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file_char) || !(b'1'..=b'8').contains(&rank_char) {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }

        let file = (file_char - b'a') as i8;
        let rank = BOARD_SIZE - (rank_char - b'0') as i8;

        Ok(Position { rank, file })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
