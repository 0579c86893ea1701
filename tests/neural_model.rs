use std::fs;
use std::path::PathBuf;

use stonebot::board::{Board, Player, BOARD_SIZE};
use stonebot::difficulty::Difficulty;
use stonebot::engine::Engine;
use stonebot::eval::{Evaluator, Model, NeuralEvaluator};

const INPUT_DIM: usize = 3 * BOARD_SIZE * BOARD_SIZE;
const POLICY_DIM: usize = BOARD_SIZE * BOARD_SIZE;
const HIDDEN: usize = 4;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("stonebot-test-{}-{}", std::process::id(), name))
}

/// Serialize a zero-weight model, then let the caller tweak the policy
/// bias and value bias.
fn write_model(name: &str, bp_patch: &[(usize, f32)], bv: f32) -> PathBuf {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"STNVAL01");
    bytes.extend_from_slice(&1u32.to_le_bytes()); // version
    bytes.extend_from_slice(&(INPUT_DIM as u32).to_le_bytes());
    bytes.extend_from_slice(&(HIDDEN as u32).to_le_bytes());

    let push_f32s = |vals: &[f32]| {
        let mut local = Vec::with_capacity(vals.len() * 4);
        for v in vals {
            local.extend_from_slice(&v.to_le_bytes());
        }
        local
    };
    bytes.extend(push_f32s(&vec![0.0; HIDDEN * INPUT_DIM])); // w1
    bytes.extend(push_f32s(&vec![0.0; HIDDEN])); // b1
    bytes.extend(push_f32s(&vec![0.0; POLICY_DIM * HIDDEN])); // wp
    let mut bp = vec![0.0f32; POLICY_DIM];
    for &(idx, v) in bp_patch {
        bp[idx] = v;
    }
    bytes.extend(push_f32s(&bp));
    bytes.extend(push_f32s(&vec![0.0; HIDDEN])); // wv
    bytes.extend(push_f32s(&[bv]));

    let path = temp_path(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn load_and_predict_zero_model() {
    let path = write_model("zero", &[], 0.0);
    let model = Model::load(&path).unwrap();
    assert_eq!(model.meta.hidden_dim, HIDDEN);

    let planes = vec![0.0f32; INPUT_DIM];
    let (value, policy) = model.predict(&planes);
    assert_eq!(value, 0.0);
    assert_eq!(policy.len(), POLICY_DIM);
    let total: f32 = policy.iter().sum();
    assert!((total - 1.0).abs() < 1e-4, "policy must sum to 1, got {total}");
    // Zero logits give a uniform distribution.
    assert!((policy[0] - 1.0 / POLICY_DIM as f32).abs() < 1e-6);
    fs::remove_file(path).unwrap();
}

#[test]
fn value_head_applies_tanh() {
    let path = write_model("tanh", &[], 0.5);
    let model = Model::load(&path).unwrap();
    let (value, _) = model.predict(&vec![0.0f32; INPUT_DIM]);
    assert!((value - 0.5f32.tanh()).abs() < 1e-6);
    fs::remove_file(path).unwrap();
}

#[test]
fn bad_magic_is_rejected() {
    let path = temp_path("badmagic");
    fs::write(&path, b"NOTMODEL........").unwrap();
    assert!(Model::load(&path).is_err());
    fs::remove_file(path).unwrap();
}

#[test]
fn truncated_file_is_rejected() {
    let path = write_model("truncated", &[], 0.0);
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    assert!(Model::load(&path).is_err());
    fs::remove_file(path).unwrap();
}

#[test]
fn neural_evaluator_exposes_policy() {
    let center = 7 * BOARD_SIZE + 8;
    let path = write_model("policy", &[(center, 5.0)], 0.0);
    let model = std::sync::Arc::new(Model::load(&path).unwrap());
    let evaluator = NeuralEvaluator::new(model);

    let mut board = Board::new();
    board.place(7, 7, Player::Black).unwrap();
    let eval = evaluator.evaluate(&board, Player::White);
    let policy = eval.policy.expect("neural evaluator must report a policy");
    let best = policy
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(best, center, "biased policy cell should dominate");
    fs::remove_file(path).unwrap();
}

#[test]
fn engine_prefers_biased_policy_cell_in_top_moves() {
    let target = 7 * BOARD_SIZE + 8;
    let path = write_model("topmoves", &[(target, 5.0)], 0.0);
    let engine = Engine::with_model_file(&path);
    assert!(engine.model_loaded());

    let mut grid = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
    grid[7][7] = 1;
    let eval = engine.evaluate_position(&grid, Player::White).unwrap();
    let (top, _) = eval.top_moves[0];
    assert_eq!((top.row, top.col), (7, 8));
    fs::remove_file(path).unwrap();
}

#[test]
fn missing_model_degrades_to_heuristic_and_still_moves() {
    let engine = Engine::with_model_file(temp_path("does-not-exist"));
    assert!(!engine.model_loaded());

    let mut grid = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
    grid[7][7] = 1;
    let mv = engine
        .compute_move(&grid, Player::White, Difficulty::Hard, None)
        .unwrap();
    assert!(grid[mv.row][mv.col] == 0, "degraded engine must still move legally");
}
