use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TypeError, TypeResult};
use crate::id::ArticleId;
use crate::slug::slugify;
use crate::status::ArticleStatus;

/// An article without its content, as shown in list views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: ArticleStatus,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A full article: metadata plus the editor's rich-text document tree.
///
/// The document tree is stored and returned as-is; nothing in Folio
/// interprets it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(flatten)]
    pub meta: ArticleMetadata,
    #[serde(default)]
    pub content: Value,
}

impl Article {
    pub fn id(&self) -> &ArticleId {
        &self.meta.id
    }

    pub fn status(&self) -> ArticleStatus {
        self.meta.status
    }

    /// Clone the metadata, leaving the content behind.
    pub fn metadata(&self) -> ArticleMetadata {
        self.meta.clone()
    }

    pub fn into_parts(self) -> (ArticleMetadata, Value) {
        (self.meta, self.content)
    }
}

/// Anything ordered by creation time in list views.
pub trait Chronological {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Chronological for ArticleMetadata {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Chronological for Article {
    fn created_at(&self) -> DateTime<Utc> {
        self.meta.created_at
    }
}

/// Sort newest first. The sort is stable, so equal timestamps keep input order.
pub fn sort_newest_first<T: Chronological>(items: &mut [T]) {
    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// Create/update request body.
///
/// Every field but `title` may be omitted; [`ArticleDraft::into_article`]
/// fills in the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: Value,
}

impl ArticleDraft {
    /// Build the article to persist, stamping `updatedAt` with `now`.
    ///
    /// - `id` is generated when absent
    /// - `status` defaults to draft
    /// - `slug` is derived from the title when absent or empty
    /// - `createdAt` is kept when supplied, otherwise `now`
    pub fn into_article(self, now: DateTime<Utc>) -> TypeResult<Article> {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .ok_or(TypeError::MissingField("title"))?;

        let id = match self.id.as_deref() {
            Some(id) if !id.is_empty() => ArticleId::parse(id)?,
            _ => ArticleId::generate(),
        };

        let slug = match self.slug {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&title),
        };

        Ok(Article {
            meta: ArticleMetadata {
                id,
                title,
                excerpt: self.excerpt.unwrap_or_default(),
                cover_image: self.cover_image.filter(|c| !c.is_empty()),
                tags: self.tags.unwrap_or_default(),
                status: self.status.unwrap_or_default(),
                slug,
                created_at: self.created_at.unwrap_or(now),
                updated_at: now,
            },
            content: self.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn sample() -> Article {
        Article {
            meta: ArticleMetadata {
                id: ArticleId::parse("abc123").unwrap(),
                title: "Hello".into(),
                excerpt: "short".into(),
                cover_image: None,
                tags: vec!["rust".into()],
                status: ArticleStatus::Draft,
                slug: "hello".into(),
                created_at: ts(1_700_000_000),
                updated_at: ts(1_700_000_100),
            },
            content: json!({"type": "doc", "content": []}),
        }
    }

    #[test]
    fn json_is_camel_case_and_flat() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], "abc123");
        assert_eq!(value["status"], "draft");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("coverImage").is_none());
        assert_eq!(value["content"]["type"], "doc");
        assert!(value.get("meta").is_none());
    }

    #[test]
    fn parses_stored_json() {
        let raw = r#"{
            "id": "x1",
            "title": "Stored",
            "excerpt": "e",
            "coverImage": "https://img",
            "tags": ["a", "b"],
            "status": "published",
            "slug": "stored",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-02T10:00:00.000Z",
            "content": {"type": "doc"}
        }"#;
        let article: Article = serde_json::from_str(raw).unwrap();
        assert_eq!(article.status(), ArticleStatus::Published);
        assert_eq!(article.meta.cover_image.as_deref(), Some("https://img"));
        assert_eq!(article.meta.tags, vec!["a", "b"]);
    }

    #[test]
    fn metadata_without_excerpt_or_tags() {
        let raw = r#"{"id":"x","title":"t","status":"draft","slug":"t",
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#;
        let meta: ArticleMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.excerpt, "");
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn metadata_drops_content() {
        let article = sample();
        let meta = article.metadata();
        let value = serde_json::to_value(&meta).unwrap();
        assert!(value.get("content").is_none());
        assert_eq!(meta.id, *article.id());
    }

    #[test]
    fn draft_defaults() {
        let now = ts(1_800_000_000);
        let draft = ArticleDraft {
            title: Some("My First Post".into()),
            ..Default::default()
        };
        let article = draft.into_article(now).unwrap();
        assert_eq!(article.meta.slug, "my-first-post");
        assert_eq!(article.status(), ArticleStatus::Draft);
        assert!(article.meta.tags.is_empty());
        assert_eq!(article.meta.created_at, now);
        assert_eq!(article.meta.updated_at, now);
        assert_eq!(article.id().as_str().len(), crate::id::GENERATED_LEN);
        assert_eq!(article.content, Value::Null);
    }

    #[test]
    fn draft_keeps_supplied_fields() {
        let now = ts(1_800_000_000);
        let created = ts(1_700_000_000);
        let draft = ArticleDraft {
            id: Some("keep-me".into()),
            title: Some("Title".into()),
            slug: Some("custom".into()),
            status: Some(ArticleStatus::Published),
            created_at: Some(created),
            tags: Some(vec!["x".into()]),
            content: json!({"type": "doc"}),
            ..Default::default()
        };
        let article = draft.into_article(now).unwrap();
        assert_eq!(article.id().as_str(), "keep-me");
        assert_eq!(article.meta.slug, "custom");
        assert_eq!(article.status(), ArticleStatus::Published);
        assert_eq!(article.meta.created_at, created);
        assert_eq!(article.meta.updated_at, now);
    }

    #[test]
    fn draft_requires_title() {
        let err = ArticleDraft::default().into_article(Utc::now()).unwrap_err();
        assert_eq!(err, TypeError::MissingField("title"));
    }

    #[test]
    fn draft_rejects_bad_id() {
        let draft = ArticleDraft {
            id: Some("../escape".into()),
            title: Some("t".into()),
            ..Default::default()
        };
        assert!(matches!(
            draft.into_article(Utc::now()),
            Err(TypeError::InvalidId { .. })
        ));
    }

    #[test]
    fn newest_first() {
        let mut a = sample();
        a.meta.created_at = ts(10);
        let mut b = sample();
        b.meta.created_at = ts(30);
        let mut c = sample();
        c.meta.created_at = ts(20);
        let mut items = vec![a.meta, b.meta, c.meta];
        sort_newest_first(&mut items);
        let order: Vec<i64> = items.iter().map(|m| m.created_at.timestamp()).collect();
        assert_eq!(order, vec![30, 20, 10]);
    }
}
