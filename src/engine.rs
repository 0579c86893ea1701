//! Public engine operations behind the AI service contract.
//!
//! An [`Engine`] is cheap to share: the only state is the optional model
//! handle, loaded once at startup and read-only afterwards. Every call
//! is a self-contained synchronous computation over its own board copy.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::board::{Board, Move, Outcome, Player, WinRule};
use crate::difficulty::Difficulty;
use crate::error::EngineError;
use crate::eval::{Evaluator, HeuristicEvaluator, Model, NeuralEvaluator};
use crate::search::{generate_ordered, Searcher};

/// Number of candidate moves reported by `evaluate_position`.
const TOP_MOVES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    Win,
    Draw,
}

impl GameOverReason {
    pub fn as_str(self) -> &'static str {
        match self {
            GameOverReason::Win => "win",
            GameOverReason::Draw => "draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub is_over: bool,
    pub winner: Option<Player>,
    pub reason: Option<GameOverReason>,
}

#[derive(Debug, Clone)]
pub struct PositionEvaluation {
    /// Value in [-1, 1] from the given player's perspective.
    pub value: f32,
    /// Up to five candidate moves with probabilities.
    pub top_moves: Vec<(Move, f32)>,
}

pub struct Engine {
    model: Option<Arc<Model>>,
    rule: WinRule,
    threads: usize,
}

impl Engine {
    /// Engine without a model: every tier runs on the heuristic.
    pub fn new() -> Engine {
        Engine {
            model: None,
            rule: WinRule::default(),
            threads: 1,
        }
    }

    /// Engine with a model loaded from `path`. A load failure is logged
    /// and degrades all neural tiers to the heuristic; the service must
    /// keep producing moves either way.
    pub fn with_model_file<P: AsRef<Path>>(path: P) -> Engine {
        let model = match Model::load(&path) {
            Ok(m) => {
                log::info!(
                    "loaded model {} (hidden_dim {})",
                    path.as_ref().display(),
                    m.meta.hidden_dim
                );
                Some(Arc::new(m))
            }
            Err(e) => {
                log::warn!(
                    "could not load model {}: {e:#}; neural tiers degrade to heuristic",
                    path.as_ref().display()
                );
                None
            }
        };
        Engine {
            model,
            rule: WinRule::default(),
            threads: 1,
        }
    }

    pub fn with_rule(mut self, rule: WinRule) -> Engine {
        self.rule = rule;
        self
    }

    /// Root-level search threads (1 = serial).
    pub fn with_threads(mut self, threads: usize) -> Engine {
        self.threads = threads.max(1);
        self
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Inference device reported by the health endpoint.
    pub fn device(&self) -> &'static str {
        "cpu"
    }

    /// Choose the best move for `player` at the given difficulty.
    ///
    /// The caller's grid is never mutated; the search runs on an
    /// internal copy. With a `movetime` deadline, the move of the
    /// deepest fully-completed iteration is returned, and
    /// `SearchTimeout` only if depth 1 itself did not finish.
    pub fn compute_move(
        &self,
        grid: &[Vec<u8>],
        player: Player,
        difficulty: Difficulty,
        movetime: Option<Duration>,
    ) -> Result<Move, EngineError> {
        let board = Board::from_grid(grid)?;
        if board.scan_winner(self.rule).is_some() || board.is_full() {
            return Err(EngineError::GameAlreadyOver);
        }

        let config = difficulty.config();
        let evaluator = self.evaluator_for(config.use_model);
        let mut params = config.search_params(self.rule, self.threads);
        params.movetime = movetime;

        let mut searcher = Searcher::new(evaluator.as_ref());
        let result = searcher.search(&board, player, params);
        log::debug!(
            "computed {difficulty} move: depth {} score {} nodes {}",
            result.depth,
            result.score,
            result.nodes
        );
        result.best.ok_or(EngineError::SearchTimeout)
    }

    /// True iff (row, col) is on the board and empty. A malformed grid
    /// is simply not a valid target.
    pub fn validate_move(&self, grid: &[Vec<u8>], row: usize, col: usize) -> bool {
        match Board::from_grid(grid) {
            Ok(board) => board.is_valid_move(row, col),
            Err(_) => false,
        }
    }

    /// Terminal classification from the last move's lines.
    pub fn check_game_over(
        &self,
        grid: &[Vec<u8>],
        last_row: usize,
        last_col: usize,
    ) -> Result<GameOver, EngineError> {
        let board = Board::from_grid(grid)?;
        if !Board::in_range(last_row, last_col) {
            return Err(EngineError::OutOfRange {
                row: last_row,
                col: last_col,
            });
        }
        let report = match board.terminal_after(last_row, last_col, self.rule) {
            Outcome::Win(p) => GameOver {
                is_over: true,
                winner: Some(p),
                reason: Some(GameOverReason::Win),
            },
            Outcome::Draw => GameOver {
                is_over: true,
                winner: None,
                reason: Some(GameOverReason::Draw),
            },
            Outcome::Ongoing => GameOver {
                is_over: false,
                winner: None,
                reason: None,
            },
        };
        Ok(report)
    }

    /// One evaluator call, no search. The policy head supplies the move
    /// distribution when a model is loaded; otherwise the distribution
    /// is derived from the move-ordering scores.
    pub fn evaluate_position(
        &self,
        grid: &[Vec<u8>],
        player: Player,
    ) -> Result<PositionEvaluation, EngineError> {
        let board = Board::from_grid(grid)?;
        // Best available evaluator; no tier is involved here.
        let evaluator: Box<dyn Evaluator> = match &self.model {
            Some(model) => Box::new(NeuralEvaluator::new(model.clone())),
            None => Box::new(HeuristicEvaluator),
        };
        let eval = evaluator.evaluate(&board, player);

        let top_moves = match eval.policy {
            Some(policy) => top_moves_from_policy(&board, &policy),
            None => top_moves_from_ordering(&board, player),
        };

        Ok(PositionEvaluation {
            value: eval.value,
            top_moves,
        })
    }

    fn evaluator_for(&self, want_model: bool) -> Box<dyn Evaluator> {
        if want_model {
            if let Some(model) = &self.model {
                return Box::new(NeuralEvaluator::new(model.clone()));
            }
            log::warn!("neural evaluator requested but no model loaded, using heuristic");
        }
        Box::new(HeuristicEvaluator)
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

/// Top-K legal cells by policy probability, renormalized over legal mass.
fn top_moves_from_policy(board: &Board, policy: &[f32]) -> Vec<(Move, f32)> {
    use crate::board::BOARD_SIZE;

    let mut legal: Vec<(Move, f32)> = Vec::new();
    let mut mass = 0.0f32;
    for (idx, &p) in policy.iter().enumerate() {
        let mv = Move::new(idx / BOARD_SIZE, idx % BOARD_SIZE);
        if board.is_valid_move(mv.row, mv.col) {
            legal.push((mv, p));
            mass += p;
        }
    }
    legal.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.index().cmp(&b.0.index()))
    });
    legal.truncate(TOP_MOVES);
    if mass > 0.0 {
        for (_, p) in &mut legal {
            *p /= mass;
        }
    }
    legal
}

/// Heuristic path: move-ordering scores shifted positive and normalized
/// into a distribution over all candidates.
fn top_moves_from_ordering(board: &Board, player: Player) -> Vec<(Move, f32)> {
    let candidates = generate_ordered(board, player, 2);
    if candidates.is_empty() {
        return Vec::new();
    }
    let min = candidates.iter().map(|sm| sm.score).min().unwrap_or(0);
    let total: f32 = candidates
        .iter()
        .map(|sm| (sm.score - min + 1) as f32)
        .sum();
    candidates
        .iter()
        .take(TOP_MOVES)
        .map(|sm| (sm.mv, (sm.score - min + 1) as f32 / total))
        .collect()
}
