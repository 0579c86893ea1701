//! Neural position evaluation.
//!
//! The model is a small dual-head network over the 3-plane encoding:
//! one shared hidden layer, a 225-way policy head (softmax) and a scalar
//! value head (tanh). Weights are loaded once at process start from a
//! flat little-endian file and never mutated afterwards; every search
//! shares the same `Arc<Model>` handle.
//!
//! Per the service contract, model unavailability is never a user-facing
//! error: callers fall back to [`HeuristicEvaluator`] and keep playing.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::board::{Board, Player, BOARD_SIZE};
use crate::encoder::{encode_planes, INPUT_DIM};
use crate::eval::{Evaluation, Evaluator, HeuristicEvaluator};

pub const POLICY_DIM: usize = BOARD_SIZE * BOARD_SIZE;

const MAGIC: &[u8; 8] = b"STNVAL01";

#[derive(Debug, Clone, Copy)]
pub struct ModelMeta {
    pub version: u32,
    pub input_dim: usize,
    pub hidden_dim: usize,
}

/// Loaded network weights.
pub struct Model {
    pub meta: ModelMeta,
    w1: Vec<f32>, // hidden x input
    b1: Vec<f32>, // hidden
    wp: Vec<f32>, // policy x hidden
    bp: Vec<f32>, // policy
    wv: Vec<f32>, // hidden
    bv: f32,
}

impl Model {
    /// Load weights from disk.
    ///
    /// Format:
    /// magic: 8 bytes b"STNVAL01"
    /// u32 version (LE)
    /// u32 input_dim, u32 hidden_dim (LE)
    /// f32 w1[hidden * input]
    /// f32 b1[hidden]
    /// f32 wp[225 * hidden]
    /// f32 bp[225]
    /// f32 wv[hidden]
    /// f32 bv[1]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Model> {
        let f = File::open(&path)
            .with_context(|| format!("open model file: {}", path.as_ref().display()))?;
        let mut r = BufReader::new(f);

        let mut magic = [0u8; 8];
        r.read_exact(&mut magic).context("read magic")?;
        if &magic != MAGIC {
            bail!("bad model magic");
        }
        let version = read_u32(&mut r).context("read version")?;
        let input_dim = read_u32(&mut r).context("read input_dim")? as usize;
        let hidden_dim = read_u32(&mut r).context("read hidden_dim")? as usize;
        if input_dim != INPUT_DIM {
            bail!("model input_dim {} does not match board encoding {}", input_dim, INPUT_DIM);
        }
        if hidden_dim == 0 || hidden_dim > 4096 {
            bail!("implausible hidden_dim {}", hidden_dim);
        }

        let w1 = read_f32s(&mut r, hidden_dim * input_dim).context("read w1")?;
        let b1 = read_f32s(&mut r, hidden_dim).context("read b1")?;
        let wp = read_f32s(&mut r, POLICY_DIM * hidden_dim).context("read wp")?;
        let bp = read_f32s(&mut r, POLICY_DIM).context("read bp")?;
        let wv = read_f32s(&mut r, hidden_dim).context("read wv")?;
        let bv = read_f32s(&mut r, 1).context("read bv")?[0];

        Ok(Model {
            meta: ModelMeta { version, input_dim, hidden_dim },
            w1,
            b1,
            wp,
            bp,
            wv,
            bv,
        })
    }

    /// Forward pass: tanh value plus softmax policy over all 225 cells.
    pub fn predict(&self, planes: &[f32]) -> (f32, Vec<f32>) {
        debug_assert_eq!(planes.len(), self.meta.input_dim);
        let hidden = self.meta.hidden_dim;

        let mut h = self.b1.clone();
        for (j, hj) in h.iter_mut().enumerate() {
            let row = &self.w1[j * self.meta.input_dim..(j + 1) * self.meta.input_dim];
            let mut acc = *hj;
            for (w, x) in row.iter().zip(planes) {
                acc += w * x;
            }
            *hj = acc.max(0.0); // ReLU
        }

        let mut value = self.bv;
        for (w, x) in self.wv.iter().zip(&h) {
            value += w * x;
        }
        let value = value.tanh();

        let mut logits = self.bp.clone();
        for (j, lj) in logits.iter_mut().enumerate() {
            let row = &self.wp[j * hidden..(j + 1) * hidden];
            for (w, x) in row.iter().zip(&h) {
                *lj += w * x;
            }
        }
        let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let mut sum = 0.0;
        for l in &mut logits {
            *l = (*l - max).exp();
            sum += *l;
        }
        for l in &mut logits {
            *l /= sum;
        }

        (value, logits)
    }
}

/// Evaluator backed by a loaded model, with the heuristic as a safety
/// net: non-finite outputs (corrupt weights) degrade per evaluation
/// instead of poisoning the search.
pub struct NeuralEvaluator {
    model: Arc<Model>,
    fallback: HeuristicEvaluator,
}

impl NeuralEvaluator {
    pub fn new(model: Arc<Model>) -> NeuralEvaluator {
        NeuralEvaluator {
            model,
            fallback: HeuristicEvaluator,
        }
    }
}

impl Evaluator for NeuralEvaluator {
    fn evaluate(&self, board: &Board, to_move: Player) -> Evaluation {
        let planes = encode_planes(board, to_move);
        let (value, policy) = self.model.predict(&planes);
        if !value.is_finite() || policy.iter().any(|p| !p.is_finite()) {
            log::warn!("model produced non-finite output, degrading to heuristic");
            return self.fallback.evaluate(board, to_move);
        }
        Evaluation {
            value: value.clamp(-1.0, 1.0),
            policy: Some(policy),
        }
    }
}

fn read_u32(r: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32s(r: &mut impl Read, n: usize) -> Result<Vec<f32>> {
    let mut bytes = vec![0u8; n * 4];
    r.read_exact(&mut bytes).context("weight blob truncated")?;
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
