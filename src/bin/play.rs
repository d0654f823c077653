use chess_rules::{Color, GameEngine, GameStatus, HumanPlayer};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

fn prompt_name(input: &RefCell<impl BufRead>, label: &str, default: &str) -> String {
    print!("Enter {} player name: ", label);
    let _ = io::stdout().flush();

    let mut line = String::new();
    match input.borrow_mut().read_line(&mut line) {
        Ok(n) if n > 0 && !line.trim().is_empty() => line.trim().to_string(),
        _ => default.to_string(),
    }
}

fn main() {
    let logger_env = env_logger::Env::default().filter_or("LOG_LEVEL", "warn");
    env_logger::Builder::from_env(logger_env)
        .format_timestamp_millis()
        .init();

    println!("Welcome to Chess!");

    let input = Rc::new(RefCell::new(io::stdin().lock()));

    let mut args = std::env::args().skip(1);
    let white_name = args
        .next()
        .unwrap_or_else(|| prompt_name(&*input, "White", "White"));
    let black_name = args
        .next()
        .unwrap_or_else(|| prompt_name(&*input, "Black", "Black"));

    println!("White: {}", white_name);
    println!("Black: {}", black_name);

    let white = HumanPlayer::new(Color::White, white_name, Rc::clone(&input), io::stdout());
    let black = HumanPlayer::new(Color::Black, black_name, input, io::stdout());
    let mut game = GameEngine::new(Box::new(white), Box::new(black));

    while game.status().is_active() {
        println!("\n{}", game.board());
        game.play_turn();
        if let Some(last) = game.move_history().last() {
            println!("Move executed: {}", last);
        }
    }

    println!("\nGame Over!");
    println!("{}", game.board());

    match game.status() {
        GameStatus::WhiteWin => println!("White wins by checkmate!"),
        GameStatus::BlackWin => println!("Black wins by checkmate!"),
        GameStatus::Stalemate => println!("Game ends in stalemate!"),
        GameStatus::Draw => println!("Game ends in a draw!"),
        GameStatus::Resigned => match game.resigned_by() {
            Some(color) => println!("{} resigns. {} wins!", color, color.opposite()),
            None => println!("Game ended by resignation."),
        },
        GameStatus::Active => println!("Game ended."),
    }
}
