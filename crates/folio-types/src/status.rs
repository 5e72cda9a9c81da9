use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;

/// Lifecycle state of an article.
///
/// The status decides which storage prefix holds the article object:
/// drafts live under `drafts/`, published articles under `articles/`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Object key prefix (without trailing slash) holding articles in this state.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Draft => "drafts",
            Self::Published => "articles",
        }
    }

    /// The opposite state, used for fallback lookups.
    pub fn other(&self) -> Self {
        match self {
            Self::Draft => Self::Published,
            Self::Published => Self::Draft,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the same spellings as [`FromStr`], so `"Published"` in a request
/// body means the same as `?status=Published`.
impl<'de> Deserialize<'de> for ArticleStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for ArticleStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(TypeError::InvalidStatus(s.to_string())),
        }
    }
}
