//! Error taxonomy for the engine.
//!
//! Everything here is recoverable: a malformed snapshot is retried, a failed
//! save is logged and skipped. "No candidate move" is not an error at all -
//! finders return `Option` and the orchestrator moves on to the next one.

use thiserror::Error;

/// Errors surfaced by the engine proper.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The oracle handed back a board or analysis grid that does not describe
    /// a coherent position (wrong size, mismatched grids, unknown markers).
    #[error("invalid board state: {0}")]
    InvalidBoardState(String),

    /// A move was submitted that the rules reject. The orchestrator validates
    /// before submitting, so seeing this means the oracle and the engine
    /// disagree about the position.
    #[error("illegal move at ({0}, {1})")]
    IllegalMove(usize, usize),
}

/// Errors from the weight-store boundary. Kept separate from [`EngineError`]:
/// a failed save is logged and swallowed by the session, never escalated.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("learning data i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("learning data encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
