use chess_rules::game::legal_moves;
use chess_rules::{Board, Color, GameEngine, GameStatus, Move, Player};
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use std::time::Instant;

const PLY_CAP: usize = 300;

/// Picks uniformly among the legal moves of its color.
struct RandomPlayer {
    color: Color,
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    fn new(color: Color, seed: u64) -> Self {
        RandomPlayer {
            color,
            name: format!("random {}", color),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn color(&self) -> Color {
        self.color
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self, board: &Board) -> Option<Move> {
        legal_moves(board, self.color).choose(&mut self.rng).copied()
    }
}

#[hotpath::main]
fn main() {
    let logger_env = env_logger::Env::default().filter_or("LOG_LEVEL", "info");
    env_logger::Builder::from_env(logger_env)
        .format_timestamp_millis()
        .init();

    let mut args = std::env::args().skip(1);
    let games: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(10);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let mut decisive = 0;
    let mut stalemates = 0;
    let mut capped = 0;
    let mut plies = 0;
    let start = Instant::now();

    for game_index in 0..games {
        let game_seed = seed.wrapping_add(game_index * 2);
        let mut game = GameEngine::new(
            Box::new(RandomPlayer::new(Color::White, game_seed)),
            Box::new(RandomPlayer::new(Color::Black, game_seed.wrapping_add(1))),
        );

        while game.status().is_active() {
            if game.move_count() >= PLY_CAP {
                game.agree_draw();
                break;
            }
            game.play_turn();
        }

        plies += game.move_count();
        match game.status() {
            GameStatus::WhiteWin | GameStatus::BlackWin => decisive += 1,
            GameStatus::Stalemate => stalemates += 1,
            GameStatus::Draw => capped += 1,
            _ => {}
        }
        log::debug!("game {}: {} after {} plies", game_index, game.status(), game.move_count());
    }

    let elapsed = start.elapsed();
    log::info!(
        "{} games, {} plies in {:.2?} ({:.0} plies/s): {} mates, {} stalemates, {} capped",
        games,
        plies,
        elapsed,
        plies as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        decisive,
        stalemates,
        capped
    );
}
