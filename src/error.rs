use thiserror::Error;

/// Errors surfaced by the public engine operations.
///
/// Neural-evaluator unavailability is deliberately absent: the engine
/// degrades to the heuristic evaluator instead of failing (see `eval`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("coordinates ({row}, {col}) outside the 15x15 board")]
    OutOfRange { row: usize, col: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("game is already over")]
    GameAlreadyOver,

    #[error("search deadline expired before depth 1 completed")]
    SearchTimeout,
}
