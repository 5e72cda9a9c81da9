use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use folio_types::{has_tag, sort_newest_first, tag_counts, Chronological, TagCount};
use serde::Serialize;
use tracing::error;

use crate::error::{MarkdownError, MarkdownResult};
use crate::front_matter::{split_front_matter, timestamp_or, FrontMatter};
use crate::render::render_html;

const EXTENSION: &str = "md";

/// A markdown article without its rendered body.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownArticleMetadata {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: String,
}

impl Chronological for MarkdownArticleMetadata {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A markdown article with its body rendered to HTML.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkdownArticle {
    #[serde(flatten)]
    pub meta: MarkdownArticleMetadata,
    pub content: String,
}

/// Read-only view over a directory of markdown articles.
#[derive(Clone, Debug)]
pub struct MarkdownLibrary {
    dir: PathBuf,
    default_author: String,
}

impl MarkdownLibrary {
    pub fn new(dir: impl Into<PathBuf>, default_author: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            default_author: default_author.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slugs of every `*.md` file, sorted. Empty if the directory is missing.
    pub fn all_slugs(&self) -> MarkdownResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut slugs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if is_valid_slug(stem) => slugs.push(stem.to_string()),
                _ => {}
            }
        }
        slugs.sort();
        Ok(slugs)
    }

    /// A slug names a file directly inside the library directory. Anything
    /// that could reach outside it, or a hidden file, is rejected.
    fn path_for(&self, slug: &str) -> MarkdownResult<PathBuf> {
        if !is_valid_slug(slug) {
            return Err(MarkdownError::InvalidSlug(slug.to_string()));
        }
        Ok(self.dir.join(format!("{slug}.{EXTENSION}")))
    }

    /// Load and render one article.
    ///
    /// Returns `Ok(None)` when no file exists for `slug`.
    pub fn try_article_by_slug(&self, slug: &str) -> MarkdownResult<Option<MarkdownArticle>> {
        let path = self.path_for(slug)?;
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let (yaml, body) = split_front_matter(&source);
        let fm = FrontMatter::parse(yaml)?;
        let now = Utc::now();

        let meta = MarkdownArticleMetadata {
            id: slug.to_string(),
            slug: slug.to_string(),
            title: fm.title.unwrap_or_else(|| "Untitled".to_string()),
            excerpt: fm.excerpt.unwrap_or_default(),
            cover_image: fm.cover_image,
            tags: fm.tags.unwrap_or_default(),
            created_at: timestamp_or(fm.created_at.as_deref(), now, "createdAt"),
            updated_at: timestamp_or(fm.updated_at.as_deref(), now, "updatedAt"),
            author: fm.author.unwrap_or_else(|| self.default_author.clone()),
        };

        Ok(Some(MarkdownArticle {
            meta,
            content: render_html(body),
        }))
    }

    /// Load and render one article, logging and swallowing any failure.
    pub fn article_by_slug(&self, slug: &str) -> Option<MarkdownArticle> {
        match self.try_article_by_slug(slug) {
            Ok(article) => article,
            Err(e) => {
                error!(slug, error = %e, "failed to read markdown article");
                None
            }
        }
    }

    /// Metadata of every readable article, newest first.
    pub fn all_articles(&self) -> MarkdownResult<Vec<MarkdownArticleMetadata>> {
        let mut articles: Vec<MarkdownArticleMetadata> = self
            .all_slugs()?
            .iter()
            .filter_map(|slug| self.article_by_slug(slug))
            .map(|article| article.meta)
            .collect();
        sort_newest_first(&mut articles);
        Ok(articles)
    }

    /// Articles carrying `tag`, compared case-insensitively.
    pub fn articles_by_tag(&self, tag: &str) -> MarkdownResult<Vec<MarkdownArticleMetadata>> {
        Ok(self
            .all_articles()?
            .into_iter()
            .filter(|article| has_tag(&article.tags, tag))
            .collect())
    }

    /// Tag usage across all articles, most used first.
    pub fn all_tags(&self) -> MarkdownResult<Vec<TagCount>> {
        let articles = self.all_articles()?;
        Ok(tag_counts(articles.iter().flat_map(|a| &a.tags)))
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}
