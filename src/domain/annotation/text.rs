use crate::domain::article::RawArticle;
use html2text::from_read;
use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("valid url pattern"));
static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Text handed to the sentiment models: title, a space, then the description
/// (empty when absent)
pub fn scoring_text(article: &RawArticle) -> String {
    let description = article.description.as_deref().unwrap_or("");
    clean_text(&format!("{} {}", article.title, description))
}

/// Strip HTML markup and URLs, normalize whitespace
pub fn clean_text(text: &str) -> String {
    // Plain text is left alone, html2text would wrap and escape it
    let plain_text = if text.contains('<') {
        from_read(text.as_bytes(), usize::MAX)
    } else {
        text.to_string()
    };

    let without_urls = URL_PATTERN.replace_all(&plain_text, "");
    let normalized = WHITESPACE_PATTERN.replace_all(&without_urls, " ");

    normalized.trim().to_string()
}

/// Prefix of at most `max_chars` characters, cut on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
