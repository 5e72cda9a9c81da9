use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{blogs, files, handler, publication};

/// Build the axum router with all Folio endpoints.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_size;

    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/api/blogs", get(blogs::list_blogs).post(blogs::save_blog))
        .route("/api/blogs/upload", post(blogs::upload_media))
        .route("/api/blogs/:id", get(blogs::get_blog).delete(blogs::delete_blog))
        .route("/api/blogs/:id/publish", post(blogs::publish_blog))
        .route("/api/publication/articles", get(publication::list_articles))
        .route("/api/publication/articles/:slug", get(publication::get_article))
        .route("/api/publication/tags", get(publication::tags))
        .route("/api/portfolio", get(publication::portfolio))
        .route("/files/:bucket/*key", get(files::get_object))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
