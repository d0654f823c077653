use crate::board::Board;
use crate::color::Color;
use crate::error::MoveError;
use crate::position::Position;
use crate::r#move::Move;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::rc::Rc;

/// Supplies moves to the engine.
///
/// Implementations hand back syntactically valid moves (both squares on the
/// board); malformed input is their own problem to retry. `None` means the
/// player resigns.
pub trait Player {
    fn color(&self) -> Color;

    fn name(&self) -> &str;

    fn request_move(&mut self, board: &Board) -> Option<Move>;

    /// Told when the engine refuses the last move; it will be asked again.
    fn move_rejected(&mut self, _mv: &Move, _reason: &MoveError) {}
}

/// A console player reading lines such as `e2 e4`.
///
/// The input is shared so that both sides of a hot-seat game can read from
/// one stream, e.g. a single locked stdin.
pub struct HumanPlayer<R, W> {
    color: Color,
    name: String,
    input: Rc<RefCell<R>>,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(color: Color, name: impl Into<String>, input: Rc<RefCell<R>>, output: W) -> Self {
        HumanPlayer {
            color,
            name: name.into(),
            input,
            output,
        }
    }

    fn parse_line(&self, line: &str, board: &Board) -> Result<Move, &'static str> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [from, to] = tokens.as_slice() else {
            return Err("Invalid input format. Use format: e2 e4");
        };

        let (Ok(from), Ok(to)) = (Position::from_algebraic(from), Position::from_algebraic(to))
        else {
            return Err("Invalid position format. Use format like: e2");
        };

        match board.get_piece(from) {
            Some(piece) if piece.color == self.color => {}
            _ => return Err("No piece of your color at that position"),
        }

        Ok(Move::with_capture(from, to, board.get_piece(to)))
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn color(&self) -> Color {
        self.color
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self, board: &Board) -> Option<Move> {
        loop {
            // Console write failures are not fatal to the game.
            let _ = write!(
                self.output,
                "{} ({}), enter your move (e.g., e2 e4): ",
                self.name, self.color
            );
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.borrow_mut().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            let line = line.trim();
            if line.eq_ignore_ascii_case("resign") || line.eq_ignore_ascii_case("quit") {
                return None;
            }

            match self.parse_line(line, board) {
                Ok(mv) => return Some(mv),
                Err(message) => {
                    let _ = writeln!(self.output, "{}", message);
                }
            }
        }
    }

    fn move_rejected(&mut self, _mv: &Move, reason: &MoveError) {
        let _ = writeln!(self.output, "Invalid move! Try again. ({})", reason);
    }
}

/// Plays a fixed list of moves in order, then resigns.
pub struct ScriptedPlayer {
    color: Color,
    name: String,
    moves: VecDeque<Move>,
}

impl ScriptedPlayer {
    pub fn new(color: Color, moves: impl IntoIterator<Item = Move>) -> Self {
        ScriptedPlayer {
            color,
            name: format!("{} script", color),
            moves: moves.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Player for ScriptedPlayer {
    fn color(&self) -> Color {
        self.color
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self, _board: &Board) -> Option<Move> {
        self.moves.pop_front()
    }
}
