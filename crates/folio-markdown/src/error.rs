use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error("invalid slug {0:?}")]
    InvalidSlug(String),

    #[error("front matter error: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MarkdownResult<T> = Result<T, MarkdownError>;
