use folio_types::ArticleId;

/// Object key for an uploaded media file.
///
/// `media/{article id}/{unix millis}-{file name}` with every run of
/// whitespace in the file name collapsed to a single `-`. Only the last
/// path component of `file_name` is kept.
pub fn media_destination(article_id: &ArticleId, file_name: &str, unix_millis: i64) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut cleaned = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                cleaned.push('-');
            }
            in_whitespace = true;
        } else {
            cleaned.push(c);
            in_whitespace = false;
        }
    }
    if cleaned.is_empty() {
        cleaned.push_str("upload");
    }

    format!("media/{article_id}/{unix_millis}-{cleaned}")
}
