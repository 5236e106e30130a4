use scraper::Html;

/// Default display budget for article summaries, in characters.
pub const DEFAULT_SUMMARY_LENGTH: usize = 120;

pub const ELLIPSIS: &str = "...";

/// Extracts the text content of an HTML snippet and truncates it to
/// `max_len` characters, appending [`ELLIPSIS`] when anything was cut.
///
/// The snippet is parsed as a fragment and only its text nodes are kept, so
/// markup is never passed through. Whitespace runs collapse to a single space.
pub fn summarize(html: &str, max_len: usize) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let text = extract_text(html);
    truncate(&text, max_len)
}

/// Text content of an HTML fragment with whitespace collapsed.
pub fn extract_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::new();

    for chunk in fragment.root_element().text() {
        text.push_str(chunk);
        // Adjacent block elements would otherwise glue words together
        text.push(' ');
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `max_len` characters.
pub fn truncate(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
