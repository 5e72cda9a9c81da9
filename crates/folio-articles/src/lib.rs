//! Article persistence for Folio.
//!
//! Each article is one JSON object in the bucket. The article's status picks
//! the prefix:
//!
//! ```text
//! drafts/{id}.json      draft articles
//! articles/{id}.json    published articles
//! media/{id}/{file}     uploaded media referenced from article content
//! ```
//!
//! Publishing writes the published copy first and then removes the draft.
//! The two steps are not atomic; if the draft removal fails both copies
//! remain, and reads that ask for the published copy still find it first.

pub mod error;
pub mod media;
pub mod repository;

pub use error::{ArticleError, ArticleResult};
pub use media::media_destination;
pub use repository::{article_key, ArticleRepository, JSON_CONTENT_TYPE};
