use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use folio_store::{public_url, ObjectStore, UrlSigner};
use folio_types::{
    sort_newest_first, Article, ArticleDraft, ArticleId, ArticleMetadata, ArticleStatus,
};
use tracing::{debug, info, warn};

use crate::error::{ArticleError, ArticleResult};
use crate::media::media_destination;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Object key of an article in the given state.
pub fn article_key(id: &ArticleId, status: ArticleStatus) -> String {
    format!("{}/{}.json", status.prefix(), id)
}

/// Draft/published article storage on top of an [`ObjectStore`].
#[derive(Clone)]
pub struct ArticleRepository {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
    signer: Option<UrlSigner>,
}

impl ArticleRepository {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into(),
            signer: None,
        }
    }

    /// Enable signed read URLs.
    pub fn with_signer(mut self, signer: UrlSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Persist an article under the prefix matching its status.
    ///
    /// Saving a published article also removes its draft copy. That cleanup
    /// is best-effort: a failure is logged and the save still succeeds.
    pub async fn save_article(&self, article: &Article) -> ArticleResult<Article> {
        let key = article_key(article.id(), article.status());
        let body = serde_json::to_vec(article)?;
        self.store
            .put(&key, Bytes::from(body), JSON_CONTENT_TYPE)
            .await?;
        debug!(%key, "saved article");

        if article.status().is_published() {
            let draft_key = article_key(article.id(), ArticleStatus::Draft);
            if let Err(e) = self.remove_if_present(&draft_key).await {
                warn!(key = %draft_key, error = %e, "failed to remove draft after publishing");
            }
        }

        Ok(article.clone())
    }

    async fn remove_if_present(&self, key: &str) -> ArticleResult<()> {
        if self.store.exists(key).await? {
            self.store.delete(key).await?;
            debug!(%key, "removed superseded draft");
        }
        Ok(())
    }

    async fn read_article(&self, key: &str) -> ArticleResult<Option<Article>> {
        match self.store.get(key).await? {
            Some(obj) => Ok(Some(serde_json::from_slice(&obj.data)?)),
            None => Ok(None),
        }
    }

    /// Load an article, preferring the copy in `status` and falling back to
    /// the other prefix. Returns `Ok(None)` if neither copy exists.
    pub async fn get_article(
        &self,
        id: &ArticleId,
        status: ArticleStatus,
    ) -> ArticleResult<Option<Article>> {
        if let Some(article) = self.read_article(&article_key(id, status)).await? {
            return Ok(Some(article));
        }
        self.read_article(&article_key(id, status.other())).await
    }

    /// Metadata of every article in `status`, newest first.
    ///
    /// Objects that are not valid article JSON are skipped with a warning.
    pub async fn list_articles(&self, status: ArticleStatus) -> ArticleResult<Vec<ArticleMetadata>> {
        let prefix = format!("{}/", status.prefix());
        let listing = self.store.list(&prefix).await?;

        let mut articles = Vec::with_capacity(listing.len());
        for info in listing.iter().filter(|o| o.key.ends_with(".json")) {
            let Some(obj) = self.store.get(&info.key).await? else {
                continue;
            };
            match serde_json::from_slice::<ArticleMetadata>(&obj.data) {
                Ok(meta) => articles.push(meta),
                Err(e) => warn!(key = %info.key, error = %e, "skipping unreadable article"),
            }
        }

        sort_newest_first(&mut articles);
        Ok(articles)
    }

    /// Delete the copy of an article in `status`. Returns `true` if it existed.
    pub async fn delete_article(&self, id: &ArticleId, status: ArticleStatus) -> ArticleResult<bool> {
        let key = article_key(id, status);
        let existed = self.store.delete(&key).await?;
        debug!(%key, existed, "deleted article");
        Ok(existed)
    }

    /// Build an article from a create/update request and save it.
    pub async fn save_draft(&self, draft: ArticleDraft) -> ArticleResult<Article> {
        let article = draft.into_article(Utc::now())?;
        self.save_article(&article).await
    }

    /// Move an article to the published prefix, stamping `updatedAt`.
    pub async fn publish_article(&self, id: &ArticleId) -> ArticleResult<Article> {
        let mut article = self
            .get_article(id, ArticleStatus::Draft)
            .await?
            .ok_or_else(|| ArticleError::NotFound(id.clone()))?;

        article.meta.status = ArticleStatus::Published;
        article.meta.updated_at = Utc::now();
        let saved = self.save_article(&article).await?;
        info!(id = %id, "published article");
        Ok(saved)
    }

    /// Public URL of an object in the bucket.
    pub fn public_url(&self, key: &str) -> String {
        public_url(&self.public_base_url, self.store.bucket(), key)
    }

    /// Store a media file for an article and return its public URL.
    pub async fn upload_media(
        &self,
        article_id: &ArticleId,
        file_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> ArticleResult<String> {
        let destination = media_destination(article_id, file_name, Utc::now().timestamp_millis());
        info!(
            bucket = self.store.bucket(),
            %destination,
            bytes = data.len(),
            "starting media upload"
        );

        if let Err(e) = self.store.put(&destination, data, content_type).await {
            warn!(%destination, error = %e, "media upload failed");
            return Err(ArticleError::Upload(e.to_string()));
        }

        let url = self.public_url(&destination);
        info!(%url, "media upload complete");
        Ok(url)
    }

    /// Expiring read URL for an object, valid for seven days.
    pub fn read_url(&self, destination: &str) -> ArticleResult<String> {
        folio_store::validate_key(destination)?;
        let signer = self.signer.as_ref().ok_or(ArticleError::SigningDisabled)?;
        Ok(signer.sign_default(destination, Utc::now()))
    }
}

impl std::fmt::Debug for ArticleRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleRepository")
            .field("bucket", &self.store.bucket())
            .field("public_base_url", &self.public_base_url)
            .field("signed_urls", &self.signer.is_some())
            .finish()
    }
}
