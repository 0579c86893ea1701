//! The transport collaborator depends on these exact field names and
//! encodings; a rename here is a breaking API change.

use pretty_assertions::assert_eq;
use serde_json::json;

use stonebot::api::{
    handle_evaluate, handle_game_over, handle_health, handle_move, handle_validate,
    EvaluateRequest, GameOverRequest, MoveRequest, ValidateRequest,
};
use stonebot::board::BOARD_SIZE;
use stonebot::difficulty::Difficulty;
use stonebot::engine::Engine;
use stonebot::error::EngineError;

fn empty_grid_json() -> serde_json::Value {
    json!(vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE])
}

#[test]
fn move_request_parses_wire_fields() {
    let req: MoveRequest = serde_json::from_value(json!({
        "board_state": empty_grid_json(),
        "current_player": 1,
        "difficulty": "expert"
    }))
    .unwrap();
    assert_eq!(req.current_player, 1);
    assert_eq!(req.difficulty, Difficulty::Expert);
}

#[test]
fn move_request_difficulty_defaults_to_medium() {
    let req: MoveRequest = serde_json::from_value(json!({
        "board_state": empty_grid_json(),
        "current_player": 2
    }))
    .unwrap();
    assert_eq!(req.difficulty, Difficulty::Medium);
}

#[test]
fn move_response_shape() {
    let engine = Engine::new();
    let req: MoveRequest = serde_json::from_value(json!({
        "board_state": empty_grid_json(),
        "current_player": 1,
        "difficulty": "easy"
    }))
    .unwrap();
    let resp = handle_move(&engine, &req).unwrap();
    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({"row": 7, "col": 7, "difficulty": "easy"})
    );
}

#[test]
fn invalid_player_is_a_client_error() {
    let engine = Engine::new();
    let req: MoveRequest = serde_json::from_value(json!({
        "board_state": empty_grid_json(),
        "current_player": 3
    }))
    .unwrap();
    assert!(matches!(
        handle_move(&engine, &req),
        Err(EngineError::InvalidBoard(_))
    ));
}

#[test]
fn validate_response_shape() {
    let engine = Engine::new();
    let req: ValidateRequest = serde_json::from_value(json!({
        "board_state": empty_grid_json(),
        "row": 7,
        "col": 7
    }))
    .unwrap();
    let resp = handle_validate(&engine, &req);
    assert_eq!(serde_json::to_value(&resp).unwrap(), json!({"is_valid": true}));
}

#[test]
fn game_over_win_encodes_winner_and_reason() {
    let mut grid = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
    for col in 2..7 {
        grid[7][col] = 1;
    }
    let engine = Engine::new();
    let req: GameOverRequest = serde_json::from_value(json!({
        "board_state": grid,
        "last_move_row": 7,
        "last_move_col": 6
    }))
    .unwrap();
    let resp = handle_game_over(&engine, &req).unwrap();
    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({"is_over": true, "winner": 1, "reason": "win"})
    );
}

#[test]
fn game_over_draw_encodes_winner_zero() {
    let grid: Vec<Vec<u8>> = (0..BOARD_SIZE)
        .map(|r| {
            (0..BOARD_SIZE)
                .map(|c| 1 + ((c / 2 + r) % 2) as u8)
                .collect()
        })
        .collect();
    let engine = Engine::new();
    let req = GameOverRequest {
        board_state: grid,
        last_move_row: 0,
        last_move_col: 0,
    };
    let resp = handle_game_over(&engine, &req).unwrap();
    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({"is_over": true, "winner": 0, "reason": "draw"})
    );
}

#[test]
fn game_over_ongoing_has_null_winner() {
    let mut grid = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
    grid[7][7] = 1;
    let engine = Engine::new();
    let req = GameOverRequest {
        board_state: grid,
        last_move_row: 7,
        last_move_col: 7,
    };
    let resp = handle_game_over(&engine, &req).unwrap();
    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({"is_over": false, "winner": null, "reason": null})
    );
}

#[test]
fn evaluate_response_lists_probabilistic_moves() {
    let mut grid = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
    grid[7][7] = 1;
    grid[8][8] = 2;
    let engine = Engine::new();
    let req = EvaluateRequest {
        board_state: grid,
        current_player: 1,
    };
    let resp = handle_evaluate(&engine, &req).unwrap();
    let value = serde_json::to_value(&resp).unwrap();
    assert!(value["value"].is_number());
    let moves = value["top_moves"].as_array().unwrap();
    assert!(!moves.is_empty() && moves.len() <= 5);
    for m in moves {
        assert!(m["row"].is_number() && m["col"].is_number());
        assert!(m["probability"].as_f64().unwrap() > 0.0);
    }
}

#[test]
fn health_reports_model_state_and_device() {
    let engine = Engine::new();
    let resp = handle_health(&engine);
    let value = serde_json::to_value(&resp).unwrap();
    assert_eq!(value["status"], "healthy");
    assert_eq!(value["model_loaded"], false);
    assert_eq!(value["device"], "cpu");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}
