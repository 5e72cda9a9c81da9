use folio_types::{ArticleId, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("article not found: {0}")]
    NotFound(ArticleId),

    #[error("invalid article: {0}")]
    Validation(#[from] TypeError),

    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cloud storage error: {0}")]
    Upload(String),

    #[error("signed read URLs are not configured")]
    SigningDisabled,
}

pub type ArticleResult<T> = Result<T, ArticleError>;
