use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid article id {id:?}: {reason}")]
    InvalidId { id: String, reason: String },

    #[error("invalid article status: {0}")]
    InvalidStatus(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

pub type TypeResult<T> = Result<T, TypeError>;
