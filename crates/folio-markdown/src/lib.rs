//! Static markdown articles.
//!
//! The alternative to bucket-backed articles: a directory of `*.md` files,
//! each with a YAML front matter block, read on demand and rendered to HTML.
//! The file stem is both the id and the slug of the article.

pub mod error;
pub mod front_matter;
pub mod library;
pub mod render;

pub use error::{MarkdownError, MarkdownResult};
pub use front_matter::{split_front_matter, FrontMatter};
pub use library::{MarkdownArticle, MarkdownArticleMetadata, MarkdownLibrary};
pub use render::render_html;
