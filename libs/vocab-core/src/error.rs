//! Error types for vocab-core.

use thiserror::Error;
use uuid::Uuid;

use crate::types::QuestionType;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the scheduling and assessment engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The vocabulary pool cannot supply the requested question type.
    #[error("insufficient pool for {kind:?}: {available} usable items, {required} required")]
    InsufficientPool {
        kind: QuestionType,
        available: usize,
        required: usize,
    },

    /// Quality outside 0..=5 reached the scheduler. Always a caller bug.
    #[error("quality {0} is outside 0..=5")]
    InvalidQuality(u8),

    #[error("malformed answer for question {question_id}: {reason}")]
    MalformedAnswer { question_id: Uuid, reason: String },

    #[error("session {0} is already completed")]
    SessionCompleted(Uuid),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
