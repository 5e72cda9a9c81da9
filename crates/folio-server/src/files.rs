//! Serves bucket objects over HTTP when the server itself is the public
//! base URL.
//!
//! Media is public. Anything else needs a signature from the configured
//! [`folio_store::UrlSigner`].
//!
//! Stored content types come from uploaders and are not trusted: every
//! response is sandboxed and unsniffable, and only image, audio and video
//! types (minus SVG) are served inline.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use folio_store::DEFAULT_CONTENT_TYPE;
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

const PUBLIC_PREFIX: &str = "media/";

#[derive(Debug, Default, Deserialize)]
pub struct SignedQuery {
    pub expires: Option<i64>,
    pub signature: Option<String>,
}

/// `GET /files/{bucket}/{*key}`
pub async fn get_object(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<SignedQuery>,
) -> ServerResult<Response> {
    let store = state.articles.store();
    if bucket != store.bucket() {
        return Err(ServerError::NotFound(format!("unknown bucket: {bucket}")));
    }
    folio_store::validate_key(&key)?;

    if !key.starts_with(PUBLIC_PREFIX) {
        authorize(&state, &key, &query)?;
    }

    let object = store
        .get(&key)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("object not found: {key}")))?;

    let content_type = HeaderValue::from_str(&object.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let mut response = object.data.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static("sandbox"));
    if !is_inline_safe(&object.content_type) {
        headers.insert(header::CONTENT_DISPOSITION, HeaderValue::from_static("attachment"));
    }
    Ok(response)
}

fn is_inline_safe(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence == "image/svg+xml" {
        return false;
    }
    ["image/", "video/", "audio/"]
        .iter()
        .any(|prefix| essence.starts_with(prefix))
}

fn authorize(state: &AppState, key: &str, query: &SignedQuery) -> ServerResult<()> {
    let forbidden = || ServerError::Forbidden("Invalid or expired signature".into());
    let signer = state.signer.as_ref().ok_or_else(forbidden)?;
    let (Some(expires), Some(signature)) = (query.expires, query.signature.as_deref()) else {
        return Err(forbidden());
    };
    if signer.verify(key, expires, signature, Utc::now()) {
        Ok(())
    } else {
        Err(forbidden())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_only_for_passive_media() {
        assert!(is_inline_safe("image/png"));
        assert!(is_inline_safe("Video/MP4"));
        assert!(is_inline_safe("audio/mpeg; codecs=mp3"));
        assert!(!is_inline_safe("image/svg+xml"));
        assert!(!is_inline_safe("text/html"));
        assert!(!is_inline_safe("application/json"));
        assert!(!is_inline_safe(""));
    }
}
