use thiserror::Error;

use crate::persistence::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed answer event for {question_id}: {reason}")]
    MalformedEvent { question_id: String, reason: String },

    #[error("invalid question {question_id}: {reason}")]
    InvalidQuestion { question_id: String, reason: String },

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(String),

    #[error("cannot evaluate answer: {0}")]
    InvalidAnswerFormat(String),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
