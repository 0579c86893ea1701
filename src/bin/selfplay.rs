use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use stonebot::board::{Board, Outcome, Player, WinRule, BOARD_SIZE};
use stonebot::difficulty::Difficulty;
use stonebot::engine::Engine;

#[derive(Parser, Debug)]
#[command(name = "stonebot-selfplay", about = "Pit two difficulty tiers against each other")]
struct Args {
    #[arg(long, default_value_t = 20)]
    games: usize,
    /// Tier playing Black
    #[arg(long, default_value = "medium")]
    black: Difficulty,
    /// Tier playing White
    #[arg(long, default_value = "easy")]
    white: Difficulty,
    #[arg(long)]
    model: Option<PathBuf>,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Seed for randomized openings
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn grid_of(board: &Board) -> Vec<Vec<u8>> {
    (0..BOARD_SIZE)
        .map(|r| {
            (0..BOARD_SIZE)
                .map(|c| board.get(r, c).player().map_or(0, Player::to_u8))
                .collect()
        })
        .collect()
}

fn play_game(engine: &Engine, black: Difficulty, white: Difficulty, rng: &mut SmallRng) -> Outcome {
    let mut board = Board::new();
    let mut to_move = Player::Black;

    // Randomized opening near the center so games differ.
    let row = (7i32 + rng.gen_range(-2..=2)) as usize;
    let col = (7i32 + rng.gen_range(-2..=2)) as usize;
    board.place(row, col, to_move).expect("opening cell occupied");
    let mut last = (row, col);
    to_move = to_move.opponent();

    loop {
        match board.terminal_after(last.0, last.1, WinRule::FiveOrMore) {
            Outcome::Ongoing => {}
            outcome => return outcome,
        }
        let difficulty = if to_move == Player::Black { black } else { white };
        let grid = grid_of(&board);
        let mv = engine
            .compute_move(&grid, to_move, difficulty, None)
            .expect("engine failed to move on an ongoing board");
        board
            .place(mv.row, mv.col, to_move)
            .expect("engine chose occupied cell");
        last = (mv.row, mv.col);
        to_move = to_move.opponent();
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let engine = match &args.model {
        Some(path) => Engine::with_model_file(path),
        None => Engine::new(),
    }
    .with_threads(args.threads);

    eprintln!(
        "Running {} games: {} (Black) vs {} (White), model {}",
        args.games,
        args.black,
        args.white,
        if engine.model_loaded() { "loaded" } else { "absent" }
    );

    let pb = ProgressBar::new(args.games as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}]")
            .expect("valid progress template"),
    );

    let mut black_wins = 0usize;
    let mut white_wins = 0usize;
    let mut draws = 0usize;
    for game in 0..args.games {
        let mut rng = SmallRng::seed_from_u64(args.seed.wrapping_add(game as u64));
        match play_game(&engine, args.black, args.white, &mut rng) {
            Outcome::Win(Player::Black) => black_wins += 1,
            Outcome::Win(Player::White) => white_wins += 1,
            _ => draws += 1,
        }
        pb.inc(1);
    }
    pb.finish();

    println!(
        "Black ({}) {} - {} White ({}), draws {}",
        args.black, black_wins, white_wins, args.white, draws
    );
}
