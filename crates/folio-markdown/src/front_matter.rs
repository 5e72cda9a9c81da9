//! YAML front matter.
//!
//! A front matter block is the text between a first line of exactly `---`
//! and the next line of exactly `---`. Everything after the closing line is
//! the markdown body. A file without an opening `---` has no front matter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::error::MarkdownResult;

/// Fields recognised in an article's front matter. Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl FrontMatter {
    pub fn parse(yaml: &str) -> MarkdownResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).trim_end() == "---"
}

/// Split a file into `(front matter yaml, markdown body)`.
pub fn split_front_matter(source: &str) -> (&str, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return ("", source);
    };
    if !is_delimiter(first) {
        return ("", source);
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if is_delimiter(line) {
            let yaml = &source[yaml_start..offset];
            let body = &source[offset + line.len()..];
            return (yaml, body);
        }
        offset += line.len();
    }
    // Unterminated block: treat the whole file as body.
    ("", source)
}

/// Parse a front matter timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD` (midnight
/// UTC). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

/// Resolve an optional front matter timestamp, defaulting to `now`.
pub(crate) fn timestamp_or(raw: Option<&str>, now: DateTime<Utc>, field: &str) -> DateTime<Utc> {
    match raw {
        None => now,
        Some(raw) => parse_timestamp(raw).unwrap_or_else(|| {
            warn!(field, value = raw, "unparseable timestamp in front matter");
            now
        }),
    }
}
