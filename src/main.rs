use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use stonebot::board::{Board, Player};
use stonebot::difficulty::Difficulty;
use stonebot::engine::Engine;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play gomoku against the engine", long_about = None)]
struct Args {
    /// Path to model weights file
    #[arg(long)]
    model: Option<PathBuf>,

    /// Difficulty: easy, medium, hard, expert
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,

    /// Your color: 'b' for black (moves first), 'w' for white
    #[arg(long, default_value = "b")]
    color: String,

    /// Root search threads
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Print search timing
    #[arg(long)]
    verbose: bool,
}

fn parse_color(color_str: &str) -> Result<Player> {
    match color_str.to_lowercase().as_str() {
        "b" | "black" => Ok(Player::Black),
        "w" | "white" => Ok(Player::White),
        _ => anyhow::bail!("Invalid color: use 'b' or 'w'"),
    }
}

fn get_human_move(board: &Board) -> Result<(usize, usize)> {
    loop {
        print!("Enter your move as 'row col' (e.g., 7 7): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let mut parts = input.trim().split_whitespace();
        let parsed = (
            parts.next().and_then(|s| s.parse::<usize>().ok()),
            parts.next().and_then(|s| s.parse::<usize>().ok()),
        );
        match parsed {
            (Some(row), Some(col)) if board.is_valid_move(row, col) => return Ok((row, col)),
            (Some(_), Some(_)) => println!("Illegal move!"),
            _ => println!("Invalid format! Use two numbers like '7 7'"),
        }
    }
}

fn grid_of(board: &Board) -> Vec<Vec<u8>> {
    (0..stonebot::BOARD_SIZE)
        .map(|r| {
            (0..stonebot::BOARD_SIZE)
                .map(|c| board.get(r, c).player().map_or(0, Player::to_u8))
                .collect()
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let human_color = parse_color(&args.color)?;

    let engine = match &args.model {
        Some(path) => {
            println!("Loading model from: {}", path.display());
            Engine::with_model_file(path)
        }
        None => Engine::new(),
    }
    .with_threads(args.threads);
    println!(
        "Engine ready (difficulty: {}, model: {}, device: {})",
        args.difficulty,
        if engine.model_loaded() { "loaded" } else { "heuristic only" },
        engine.device()
    );

    let mut board = Board::new();
    let mut to_move = Player::Black;

    loop {
        println!(
            "\n{}'s turn",
            if to_move == Player::Black { "Black (X)" } else { "White (O)" }
        );
        println!("{board}");

        let (row, col) = if to_move == human_color {
            get_human_move(&board)?
        } else {
            let start = Instant::now();
            let grid = grid_of(&board);
            let mv = engine.compute_move(&grid, to_move, args.difficulty, None)?;
            if args.verbose {
                println!(
                    "Engine plays ({}, {}) in {:.2}s",
                    mv.row,
                    mv.col,
                    start.elapsed().as_secs_f32()
                );
            } else {
                println!("Engine plays ({}, {})", mv.row, mv.col);
            }
            (mv.row, mv.col)
        };

        board.place(row, col, to_move)?;

        let grid = grid_of(&board);
        let report = engine.check_game_over(&grid, row, col)?;
        if report.is_over {
            println!("{board}");
            match report.winner {
                Some(Player::Black) => println!("Black (X) wins!"),
                Some(Player::White) => println!("White (O) wins!"),
                None => println!("Draw - the board is full."),
            }
            break;
        }

        to_move = to_move.opponent();
    }

    Ok(())
}
