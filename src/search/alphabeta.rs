//! Depth-limited negamax with alpha-beta pruning.
//!
//! The searcher owns one mutable working board per call and walks it
//! with the place/remove pair, so the hot path does not allocate.
//! Iterative deepening drives the movetime deadline: a depth iteration
//! that the clock interrupts is discarded and the previous completed
//! iteration's move is returned. Root candidates may be split across
//! rayon workers; each worker searches its own board clone with a
//! private transposition table and the results are reduced on
//! (score, candidate index), so the chosen move is identical no matter
//! how many threads ran.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::board::{Board, Move, Outcome, Player, WinRule};
use crate::eval::Evaluator;
use crate::search::movegen::generate_ordered;
use crate::search::tt::{Bound, Entry, Tt};
use crate::search::zobrist;

/// Terminal win magnitude, minus ply so shallower wins score higher.
/// Far above anything an evaluator can produce.
pub const WIN_SCORE: i32 = 1_000_000;
pub const DRAW_SCORE: i32 = 0;
const INF: i32 = WIN_SCORE + 1;

/// Evaluator values in [-1, 1] map into this integer leaf range.
pub const EVAL_SCALE: f32 = 10_000.0;

/// Scores at or above this are forced wins (threshold leaves room for
/// the deepest possible ply adjustment).
pub const WIN_THRESHOLD: i32 = WIN_SCORE - 1_000;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub depth: u32,
    /// Chebyshev candidate radius around existing stones.
    pub radius: u32,
    /// Candidate caps at the root and at interior nodes.
    pub root_candidates: usize,
    pub inner_candidates: usize,
    pub threads: usize,
    pub movetime: Option<Duration>,
    pub use_tt: bool,
    pub rule: WinRule,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: 2,
            radius: 2,
            root_candidates: 30,
            inner_candidates: 20,
            threads: 1,
            movetime: None,
            use_tt: true,
            rule: WinRule::FiveOrMore,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    pub best: Option<Move>,
    pub score: i32,
    /// Deepest fully-completed iteration.
    pub depth: u32,
    pub nodes: u64,
}

pub struct Searcher<'a> {
    evaluator: &'a dyn Evaluator,
    params: SearchParams,
    tt: Arc<Tt>,
    nodes: u64,
    deadline: Option<Instant>,
    stopped: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(evaluator: &'a dyn Evaluator) -> Self {
        Self {
            evaluator,
            params: SearchParams::default(),
            tt: Arc::new(Tt::new()),
            nodes: 0,
            deadline: None,
            stopped: false,
        }
    }

    /// Iterative-deepening driver. Returns `best: None` only when the
    /// deadline expired before even depth 1 completed.
    pub fn search(&mut self, board: &Board, to_move: Player, params: SearchParams) -> SearchResult {
        self.params = params;
        self.nodes = 0;
        self.deadline = params.movetime.map(|d| Instant::now() + d);
        self.tt = if params.use_tt {
            Arc::new(Tt::with_capacity_entries(1 << 16))
        } else {
            Arc::new(Tt::new())
        };

        let mut best = SearchResult::default();
        for depth in 1..=params.depth.max(1) {
            self.tt.bump_generation();
            self.stopped = false;
            let result = self.search_depth(board, to_move, depth);
            if self.stopped {
                break;
            }
            best = result;
            best.depth = depth;
            // A forced win cannot improve at deeper iterations.
            if best.score >= WIN_THRESHOLD {
                break;
            }
            if let Some(dl) = self.deadline {
                if Instant::now() >= dl {
                    break;
                }
            }
        }
        best.nodes = self.nodes;
        best
    }

    fn search_depth(&mut self, board: &Board, to_move: Player, depth: u32) -> SearchResult {
        let mut candidates = generate_ordered(board, to_move, self.params.radius);
        candidates.truncate(self.params.root_candidates);
        if candidates.is_empty() {
            return SearchResult {
                best: None,
                score: DRAW_SCORE,
                depth,
                nodes: self.nodes,
            };
        }

        if self.params.threads > 1 && depth > 1 && candidates.len() > 1 {
            return self.search_depth_parallel(board, to_move, depth, &candidates);
        }

        let mut work = board.clone();
        let hash = zobrist::compute(&work, to_move);
        let mut alpha = -INF;
        let beta = INF;
        let mut best_move = None;
        let mut best_score = -INF;

        for sm in &candidates {
            work.place(sm.mv.row, sm.mv.col, to_move)
                .expect("generator returned an occupied cell");
            let child_hash = zobrist::toggle_move(hash, sm.mv.row, sm.mv.col, to_move);
            let score = -self.alphabeta(
                &mut work,
                to_move.opponent(),
                depth - 1,
                -beta,
                -alpha,
                sm.mv,
                1,
                child_hash,
            );
            work.remove(sm.mv.row, sm.mv.col);

            self.check_time();
            if self.stopped {
                return SearchResult::default();
            }
            if score > best_score {
                best_score = score;
                best_move = Some(sm.mv);
            }
            if score > alpha {
                alpha = score;
            }
            // Immediate win: nothing can beat mate-in-one.
            if score >= WIN_SCORE - 1 {
                break;
            }
        }

        if self.params.use_tt {
            self.tt.put(Entry {
                key: hash,
                depth,
                score: best_score,
                best: best_move,
                bound: Bound::Exact,
                gen: 0,
            });
        }

        SearchResult {
            best: best_move,
            score: best_score,
            depth,
            nodes: self.nodes,
        }
    }

    /// Root split: every candidate subtree gets its own board clone,
    /// worker state, and full window.
    fn search_depth_parallel(
        &mut self,
        board: &Board,
        to_move: Player,
        depth: u32,
        candidates: &[crate::search::movegen::ScoredMove],
    ) -> SearchResult {
        let evaluator = self.evaluator;
        let params = self.params;
        let deadline = self.deadline;
        let hash = zobrist::compute(board, to_move);

        let results: Vec<(usize, i32, u64, bool)> = candidates
            .par_iter()
            .enumerate()
            .map(|(i, sm)| {
                let mut child = board.clone();
                child
                    .place(sm.mv.row, sm.mv.col, to_move)
                    .expect("generator returned an occupied cell");
                let child_hash = zobrist::toggle_move(hash, sm.mv.row, sm.mv.col, to_move);
                let mut worker = Searcher {
                    evaluator,
                    params,
                    tt: Arc::new(if params.use_tt {
                        Tt::with_capacity_entries(1 << 14)
                    } else {
                        Tt::new()
                    }),
                    nodes: 0,
                    deadline,
                    stopped: false,
                };
                let score = -worker.alphabeta(
                    &mut child,
                    to_move.opponent(),
                    depth - 1,
                    -INF,
                    INF,
                    sm.mv,
                    1,
                    child_hash,
                );
                (i, score, worker.nodes, worker.stopped)
            })
            .collect();

        let mut best: Option<(usize, i32)> = None;
        for &(i, score, nodes, stopped) in &results {
            self.nodes += nodes;
            if stopped {
                self.stopped = true;
            }
            // Reduce on (score, index): equal scores keep the earlier
            // candidate, matching single-threaded first-in-order.
            match best {
                Some((bi, bs)) if score < bs || (score == bs && i > bi) => {}
                _ => best = Some((i, score)),
            }
        }
        if self.stopped {
            return SearchResult::default();
        }

        let (idx, score) = best.expect("non-empty candidate list");
        SearchResult {
            best: Some(candidates[idx].mv),
            score,
            depth,
            nodes: self.nodes,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn alphabeta(
        &mut self,
        board: &mut Board,
        to_move: Player,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        last: Move,
        ply: i32,
        hash: u64,
    ) -> i32 {
        self.nodes += 1;
        if self.nodes & 1023 == 0 {
            self.check_time();
        }
        if self.stopped {
            return 0;
        }

        // The stone at `last` belongs to the opponent of the side to move.
        match board.terminal_after(last.row, last.col, self.params.rule) {
            Outcome::Win(_) => return -(WIN_SCORE - ply),
            Outcome::Draw => return DRAW_SCORE,
            Outcome::Ongoing => {}
        }
        if depth == 0 {
            return self.leaf(board, to_move);
        }

        if self.params.use_tt {
            if let Some(e) = self.tt.get(hash) {
                if e.depth >= depth {
                    match e.bound {
                        Bound::Exact => return e.score,
                        Bound::Lower => {
                            if e.score >= beta {
                                return e.score;
                            }
                        }
                        Bound::Upper => {
                            if e.score <= alpha {
                                return e.score;
                            }
                        }
                    }
                }
            }
        }

        let mut moves = generate_ordered(board, to_move, self.params.radius);
        moves.truncate(self.params.inner_candidates);
        if moves.is_empty() {
            return DRAW_SCORE;
        }
        // TT move first, when one survives the truncation.
        if self.params.use_tt {
            if let Some(e) = self.tt.get(hash) {
                if let Some(ttm) = e.best {
                    if let Some(pos) = moves.iter().position(|sm| sm.mv == ttm) {
                        let sm = moves.remove(pos);
                        moves.insert(0, sm);
                    }
                }
            }
        }

        let orig_alpha = alpha;
        let mut best = -INF;
        let mut best_move = None;

        for sm in &moves {
            board
                .place(sm.mv.row, sm.mv.col, to_move)
                .expect("generator returned an occupied cell");
            let child_hash = zobrist::toggle_move(hash, sm.mv.row, sm.mv.col, to_move);
            let score = -self.alphabeta(
                board,
                to_move.opponent(),
                depth - 1,
                -beta,
                -alpha,
                sm.mv,
                ply + 1,
                child_hash,
            );
            board.remove(sm.mv.row, sm.mv.col);

            if self.stopped {
                return 0;
            }
            if score > best {
                best = score;
                best_move = Some(sm.mv);
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break;
            }
        }

        if self.params.use_tt {
            let bound = if best <= orig_alpha {
                Bound::Upper
            } else if best >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.put(Entry {
                key: hash,
                depth,
                score: best,
                best: best_move,
                bound,
                gen: 0,
            });
        }

        best
    }

    #[inline]
    fn leaf(&self, board: &Board, to_move: Player) -> i32 {
        (self.evaluator.evaluate(board, to_move).value * EVAL_SCALE) as i32
    }

    #[inline]
    fn check_time(&mut self) {
        if let Some(dl) = self.deadline {
            if Instant::now() >= dl {
                self.stopped = true;
            }
        }
    }
}
