//! Slug derivation from article titles.
//!
//! A slug is the title lowercased, with each space replaced by `-`, and every
//! character that is neither a word character (`[A-Za-z0-9_]`) nor `-`
//! removed. Non-ASCII letters are dropped, not transliterated.

/// Derive a URL slug from a title.
///
/// # Examples
///
/// ```
/// use folio_types::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("GenAI & LLMOps: 2024!"), "genai--llmops-2024");
/// ```
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn spaces_become_dashes() {
        assert_eq!(slugify("Multi Agent Workflow"), "multi-agent-workflow");
        assert_eq!(slugify("two  spaces"), "two--spaces");
    }

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(slugify("What's new?"), "whats-new");
        assert_eq!(slugify("C++ & Rust"), "c--rust");
    }

    #[test]
    fn underscores_and_dashes_survive() {
        assert_eq!(slugify("snake_case-title"), "snake_case-title");
    }

    #[test]
    fn tabs_are_not_spaces() {
        assert_eq!(slugify("a\tb"), "ab");
    }

    #[test]
    fn non_ascii_is_dropped() {
        assert_eq!(slugify("Café Über"), "caf-ber");
    }

    #[test]
    fn empty_title() {
        assert_eq!(slugify(""), "");
    }

    proptest! {
        #[test]
        fn slug_charset(title in ".*") {
            let slug = slugify(&title);
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
        }

        #[test]
        fn slug_is_idempotent(title in ".*") {
            let once = slugify(&title);
            prop_assert_eq!(slugify(&once), once.clone());
        }
    }
}
