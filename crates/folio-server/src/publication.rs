//! Read-only endpoints over the markdown library and the portfolio document.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use folio_markdown::{MarkdownArticle, MarkdownArticleMetadata, MarkdownLibrary, MarkdownResult};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TagQuery {
    pub tag: Option<String>,
}

/// Run a library read off the async runtime; the library does blocking I/O.
async fn with_library<T, F>(library: MarkdownLibrary, f: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce(&MarkdownLibrary) -> MarkdownResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&library))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

/// `GET /api/publication/articles`
pub async fn list_articles(
    State(state): State<AppState>,
) -> ServerResult<Json<Vec<MarkdownArticleMetadata>>> {
    let articles = with_library(state.library, |lib| lib.all_articles()).await?;
    Ok(Json(articles))
}

/// `GET /api/publication/articles/{slug}`
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ServerResult<Json<MarkdownArticle>> {
    with_library(state.library, move |lib| Ok(lib.article_by_slug(&slug)))
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound("Article not found".into()))
}

/// `GET /api/publication/tags[?tag=]`
///
/// Without a tag this answers the tag cloud; with one it answers the
/// articles carrying that tag.
pub async fn tags(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> ServerResult<Response> {
    let response = match query.tag.filter(|t| !t.is_empty()) {
        Some(tag) => {
            let articles = with_library(state.library, move |lib| lib.articles_by_tag(&tag)).await?;
            Json(articles).into_response()
        }
        None => Json(with_library(state.library, |lib| lib.all_tags()).await?).into_response(),
    };
    Ok(response)
}

/// `GET /api/portfolio`
pub async fn portfolio(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    state
        .portfolio
        .map(|doc| Json(Value::clone(&doc)))
        .ok_or_else(|| ServerError::NotFound("Portfolio not configured".into()))
}
