//! Article REST API backed by the bucket.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::Json;
use bytes::Bytes;
use folio_types::{Article, ArticleDraft, ArticleId, ArticleMetadata, ArticleStatus};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

const NOT_FOUND: &str = "Article not found";

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

impl StatusQuery {
    /// Requested status, published when absent.
    fn status(&self) -> ServerResult<ArticleStatus> {
        match self.status.as_deref() {
            None | Some("") => Ok(ArticleStatus::Published),
            Some(raw) => raw
                .parse()
                .map_err(|e: folio_types::TypeError| ServerError::BadRequest(e.to_string())),
        }
    }
}

fn parse_id(raw: &str) -> ServerResult<ArticleId> {
    ArticleId::parse(raw).map_err(|e| ServerError::BadRequest(e.to_string()))
}

/// `GET /api/blogs?status=`
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ServerResult<Json<Vec<ArticleMetadata>>> {
    let articles = state.articles.list_articles(query.status()?).await?;
    Ok(Json(articles))
}

/// `POST /api/blogs`
pub async fn save_blog(
    State(state): State<AppState>,
    payload: Result<Json<ArticleDraft>, JsonRejection>,
) -> ServerResult<Json<Article>> {
    let Json(draft) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let saved = state.articles.save_draft(draft).await?;
    info!(id = %saved.id(), status = %saved.status(), "saved article");
    Ok(Json(saved))
}

/// `GET /api/blogs/{id}?status=`
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> ServerResult<Json<Article>> {
    let id = parse_id(&id)?;
    state
        .articles
        .get_article(&id, query.status()?)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(NOT_FOUND.into()))
}

/// `DELETE /api/blogs/{id}?status=`
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    state.articles.delete_article(&id, query.status()?).await?;
    Ok(Json(json!({ "success": true })))
}

/// `POST /api/blogs/{id}/publish`
pub async fn publish_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Article>> {
    let id = parse_id(&id)?;
    let article = state.articles.publish_article(&id).await?;
    Ok(Json(article))
}

struct UploadedFile {
    name: String,
    content_type: String,
    data: Bytes,
}

/// `POST /api/blogs/upload` with multipart fields `file` and `id`.
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<Value>> {
    let bad_request = |e: MultipartError| ServerError::BadRequest(e.body_text());

    let mut file = None;
    let mut id = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(folio_store::DEFAULT_CONTENT_TYPE)
                    .to_string();
                let data = field.bytes().await.map_err(bad_request)?;
                file = Some(UploadedFile {
                    name,
                    content_type,
                    data,
                });
            }
            Some("id") => {
                let text = field.text().await.map_err(bad_request)?;
                if !text.is_empty() {
                    id = Some(text);
                }
            }
            _ => {}
        }
    }

    let (Some(file), Some(id)) = (file, id) else {
        return Err(ServerError::BadRequest("Missing file or id".into()));
    };
    let id = parse_id(&id)?;

    info!(
        id = %id,
        file = %file.name,
        content_type = %file.content_type,
        "starting upload"
    );
    let public_url = state
        .articles
        .upload_media(&id, &file.name, file.data, &file.content_type)
        .await?;

    Ok(Json(json!({ "publicUrl": public_url })))
}
