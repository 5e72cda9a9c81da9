//! Foundation types for Folio.
//!
//! Every other Folio crate depends on `folio-types`. It holds the article data
//! model shared by the bucket-backed and markdown-backed publication variants.
//!
//! # Key Types
//!
//! - [`Article`] -- a blog post with its rich-text document tree
//! - [`ArticleMetadata`] -- an article minus its content, used for list views
//! - [`ArticleStatus`] -- draft or published; selects the storage prefix
//! - [`ArticleId`] -- validated identifier, safe to embed in object keys
//! - [`ArticleDraft`] -- create/update request with defaulting rules
//! - [`TagCount`] -- tag usage counts for tag clouds

pub mod article;
pub mod error;
pub mod id;
pub mod slug;
pub mod status;
pub mod tags;

pub use article::{sort_newest_first, Article, ArticleDraft, ArticleMetadata, Chronological};
pub use error::{TypeError, TypeResult};
pub use id::ArticleId;
pub use slug::slugify;
pub use status::ArticleStatus;
pub use tags::{has_tag, tag_counts, TagCount};
