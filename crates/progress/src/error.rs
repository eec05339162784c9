use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("question id {id} is outside 1..={max}")]
    InvalidQuestionId { id: i64, max: usize },
    #[error("question {got} cannot be answered yet, next expected question is {expected}")]
    OutOfSequence { expected: u32, got: u32 },
    #[error("catalog has no questions")]
    EmptyCatalog,
    #[error("catalog entry {position} is numbered {found}")]
    MisnumberedCatalog { position: usize, found: u32 },
    #[error("session store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        let code = match err {
            ProgressError::InvalidQuestionId { .. } | ProgressError::OutOfSequence { .. } => {
                ErrorCode::Validation
            }
            ProgressError::EmptyCatalog
            | ProgressError::MisnumberedCatalog { .. }
            | ProgressError::Store(_) => ErrorCode::Internal,
        };
        ApiError::new(code, err.to_string())
    }
}
