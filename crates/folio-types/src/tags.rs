use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of articles carrying a tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Count tag occurrences, most used first.
///
/// Tags are counted exactly as written. Ties are ordered by tag name.
pub fn tag_counts<'a, I>(tags: I) -> Vec<TagCount>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for tag in tags {
        *counts.entry(tag.as_str()).or_default() += 1;
    }

    let mut out: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Case-insensitive tag membership.
pub fn has_tag(tags: &[String], tag: &str) -> bool {
    let wanted = tag.to_lowercase();
    tags.iter().any(|t| t.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counts_sorted_by_frequency() {
        let a = tags(&["rust", "cloud"]);
        let b = tags(&["rust", "ai"]);
        let c = tags(&["rust", "cloud"]);
        let counts = tag_counts(a.iter().chain(&b).chain(&c));
        assert_eq!(
            counts,
            vec![
                TagCount { tag: "rust".into(), count: 3 },
                TagCount { tag: "cloud".into(), count: 2 },
                TagCount { tag: "ai".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn ties_by_name() {
        let a = tags(&["zeta", "alpha"]);
        let counts = tag_counts(&a);
        assert_eq!(counts[0].tag, "alpha");
        assert_eq!(counts[1].tag, "zeta");
    }

    #[test]
    fn counting_is_case_sensitive() {
        let a = tags(&["Rust", "rust"]);
        assert_eq!(tag_counts(&a).len(), 2);
    }

    #[test]
    fn membership_ignores_case() {
        let a = tags(&["GenAI", "Cloud"]);
        assert!(has_tag(&a, "genai"));
        assert!(has_tag(&a, "CLOUD"));
        assert!(!has_tag(&a, "rust"));
    }

    #[test]
    fn empty_input() {
        let none: Vec<String> = vec![];
        assert!(tag_counts(&none).is_empty());
    }
}
