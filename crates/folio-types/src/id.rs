use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// URL-safe alphabet used for generated ids (nanoid-compatible).
const ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Length of generated ids.
pub const GENERATED_LEN: usize = 21;

/// Longest id accepted from callers.
pub const MAX_LEN: usize = 128;

/// Identifier of an article.
///
/// Ids are interpolated into object keys (`drafts/{id}.json`), so parsing
/// rejects anything that could escape its prefix or that a key component may
/// not hold: separators, `..`, a leading `.`, whitespace and control
/// characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(String);

impl ArticleId {
    /// Generate a fresh random id of [`GENERATED_LEN`] characters.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id = (0..GENERATED_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    /// Parse and validate a caller-supplied id.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidId {
            id: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if s.len() > MAX_LEN {
            return Err(invalid("too long"));
        }
        if s.contains("..") {
            return Err(invalid("must not contain '..'"));
        }
        if s.starts_with('.') {
            return Err(invalid("must not start with '.'"));
        }
        if let Some(ch) = s
            .chars()
            .find(|c| *c == '/' || *c == '\\' || c.is_whitespace() || c.is_control())
        {
            return Err(invalid(&format!("contains forbidden character: {ch:?}")));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArticleId({})", self.0)
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ArticleId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArticleId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ArticleId> for String {
    fn from(id: ArticleId) -> Self {
        id.0
    }
}

impl AsRef<str> for ArticleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_url_safe() {
        for _ in 0..100 {
            let id = ArticleId::generate();
            assert_eq!(id.as_str().len(), GENERATED_LEN);
            assert!(id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
            assert!(ArticleId::parse(id.as_str()).is_ok());
        }
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(ArticleId::generate(), ArticleId::generate());
    }

    #[test]
    fn accepts_plain_ids() {
        assert!(ArticleId::parse("V1StGXR8_Z5jdHi6B-myT").is_ok());
        assert!(ArticleId::parse("my-first-post").is_ok());
        assert!(ArticleId::parse("v1.0").is_ok());
    }

    #[test]
    fn rejects_traversal() {
        assert!(ArticleId::parse("").is_err());
        assert!(ArticleId::parse("..").is_err());
        assert!(ArticleId::parse(".hidden").is_err());
        assert!(ArticleId::parse(".").is_err());
        assert!(ArticleId::parse("a/b").is_err());
        assert!(ArticleId::parse("a\\b").is_err());
        assert!(ArticleId::parse("has space").is_err());
        assert!(ArticleId::parse("nul\0").is_err());
        assert!(ArticleId::parse(&"x".repeat(MAX_LEN + 1)).is_err());
    }

    #[test]
    fn serde_validates() {
        let id: ArticleId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert!(serde_json::from_str::<ArticleId>("\"../etc\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
