use pulldown_cmark::{html, Options, Parser};

/// Render markdown to HTML with GitHub-flavoured extensions.
///
/// Tables, strikethrough, task lists and footnotes are enabled. Raw HTML in
/// the source is passed through unsanitized; article files are trusted.
pub fn render_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
