//! Hand-crafted pattern evaluation.
//!
//! Scans every maximal same-color run on the board, weights it by length
//! and open ends, and squashes the signed sum into [-1, 1]. Deterministic
//! and side-effect-free, so it doubles as the fallback whenever the
//! neural model is unavailable.

use crate::board::{Board, Cell, Player, BOARD_SIZE, DIRECTIONS};
use crate::eval::{Evaluation, Evaluator};

/// Pattern weights. Order matters more than magnitude: an open four must
/// dominate everything below it, a closed four must beat any three.
pub mod weights {
    pub const FIVE: i32 = 100_000;
    pub const OPEN_FOUR: i32 = 10_000;
    pub const CLOSED_FOUR: i32 = 2_500;
    pub const OPEN_THREE: i32 = 2_000;
    pub const CLOSED_THREE: i32 = 500;
    pub const OPEN_TWO: i32 = 200;
    pub const CLOSED_TWO: i32 = 50;
}

/// Squash divisor: an open four lands around tanh(0.5) = 0.46.
const NORM: f32 = 20_000.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    /// Raw signed pattern score (side to move minus opponent), before
    /// squashing. Exposed for the search's leaf scoring tests.
    pub fn raw_score(board: &Board, to_move: Player) -> i32 {
        Self::pattern_sum(board, to_move) - Self::pattern_sum(board, to_move.opponent())
    }

    fn pattern_sum(board: &Board, player: Player) -> i32 {
        let mut sum = 0;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if board.get(row, col).player() != Some(player) {
                    continue;
                }
                for (dr, dc) in DIRECTIONS {
                    // Score each run once, from its first stone.
                    if same_color(board, row as i32 - dr, col as i32 - dc, player) {
                        continue;
                    }
                    sum += Self::run_weight(board, row, col, dr, dc, player);
                }
            }
        }
        sum
    }

    fn run_weight(board: &Board, row: usize, col: usize, dr: i32, dc: i32, player: Player) -> i32 {
        let mut len = 0usize;
        let mut r = row as i32;
        let mut c = col as i32;
        while same_color(board, r, c, player) {
            len += 1;
            r += dr;
            c += dc;
        }
        let open_after = is_empty(board, r, c);
        let open_before = is_empty(board, row as i32 - dr, col as i32 - dc);
        let open_ends = usize::from(open_after) + usize::from(open_before);

        match (len, open_ends) {
            (5.., _) => weights::FIVE,
            (4, 2) => weights::OPEN_FOUR,
            (4, 1) => weights::CLOSED_FOUR,
            (3, 2) => weights::OPEN_THREE,
            (3, 1) => weights::CLOSED_THREE,
            (2, 2) => weights::OPEN_TWO,
            (2, 1) => weights::CLOSED_TWO,
            _ => 0,
        }
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, board: &Board, to_move: Player) -> Evaluation {
        let raw = Self::raw_score(board, to_move) as f32;
        Evaluation {
            value: (raw / NORM).tanh(),
            policy: None,
        }
    }
}

#[inline]
fn same_color(board: &Board, row: i32, col: i32, player: Player) -> bool {
    row >= 0
        && row < BOARD_SIZE as i32
        && col >= 0
        && col < BOARD_SIZE as i32
        && board.get(row as usize, col as usize).player() == Some(player)
}

#[inline]
fn is_empty(board: &Board, row: i32, col: i32) -> bool {
    row >= 0
        && row < BOARD_SIZE as i32
        && col >= 0
        && col < BOARD_SIZE as i32
        && board.get(row as usize, col as usize) == Cell::Empty
}
