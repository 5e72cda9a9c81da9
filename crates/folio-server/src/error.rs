use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_articles::ArticleError;
use folio_markdown::MarkdownError;
use folio_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Article(#[from] ArticleError),

    #[error(transparent)]
    Markdown(#[from] MarkdownError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Article(ArticleError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Article(ArticleError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Article(ArticleError::Store(StoreError::InvalidKey { .. })) => {
                StatusCode::BAD_REQUEST
            }
            Self::Markdown(MarkdownError::InvalidSlug(_)) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::InvalidKey { .. }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, status = status.as_u16(), "server error");
        } else {
            tracing::warn!(error = %message, status = status.as_u16(), "client error");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
