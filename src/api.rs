//! Wire contract consumed by the transport collaborator.
//!
//! Field names and the 0/1/2 cell encoding are the interface the
//! backend speaks; the handlers here are the only glue between those
//! shapes and the engine. Transport itself (HTTP, routing) lives
//! outside this crate.

use serde::{Deserialize, Serialize};

use crate::board::Player;
use crate::difficulty::Difficulty;
use crate::engine::Engine;
use crate::error::EngineError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub board_state: Vec<Vec<u8>>,
    pub current_player: u8,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    pub row: usize,
    pub col: usize,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub board_state: Vec<Vec<u8>>,
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub is_valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverRequest {
    pub board_state: Vec<Vec<u8>>,
    pub last_move_row: usize,
    pub last_move_col: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverResponse {
    pub is_over: bool,
    /// 1 or 2 for a win, 0 for a draw, null while the game is ongoing.
    pub winner: Option<u8>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub board_state: Vec<Vec<u8>>,
    pub current_player: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopMove {
    pub row: usize,
    pub col: usize,
    pub probability: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub value: f32,
    pub top_moves: Vec<TopMove>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
    pub device: String,
}

fn parse_player(code: u8) -> Result<Player, EngineError> {
    Player::from_u8(code)
        .ok_or_else(|| EngineError::InvalidBoard(format!("current_player must be 1 or 2, got {code}")))
}

pub fn handle_move(engine: &Engine, req: &MoveRequest) -> Result<MoveResponse, EngineError> {
    let player = parse_player(req.current_player)?;
    let mv = engine.compute_move(&req.board_state, player, req.difficulty, None)?;
    Ok(MoveResponse {
        row: mv.row,
        col: mv.col,
        difficulty: req.difficulty,
    })
}

pub fn handle_validate(engine: &Engine, req: &ValidateRequest) -> ValidateResponse {
    ValidateResponse {
        is_valid: engine.validate_move(&req.board_state, req.row, req.col),
    }
}

pub fn handle_game_over(
    engine: &Engine,
    req: &GameOverRequest,
) -> Result<GameOverResponse, EngineError> {
    let report = engine.check_game_over(&req.board_state, req.last_move_row, req.last_move_col)?;
    let winner = if report.is_over {
        Some(report.winner.map_or(0, Player::to_u8))
    } else {
        None
    };
    Ok(GameOverResponse {
        is_over: report.is_over,
        winner,
        reason: report.reason.map(|r| r.as_str().to_string()),
    })
}

pub fn handle_evaluate(
    engine: &Engine,
    req: &EvaluateRequest,
) -> Result<EvaluateResponse, EngineError> {
    let player = parse_player(req.current_player)?;
    let eval = engine.evaluate_position(&req.board_state, player)?;
    Ok(EvaluateResponse {
        value: eval.value,
        top_moves: eval
            .top_moves
            .into_iter()
            .map(|(mv, probability)| TopMove {
                row: mv.row,
                col: mv.col,
                probability,
            })
            .collect(),
    })
}

pub fn handle_health(engine: &Engine) -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        model_loaded: engine.model_loaded(),
        device: engine.device().to_string(),
    }
}
