use ammonia::Builder;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Strip all markup, dropping script and style bodies entirely. The result is
/// plain text with HTML special characters escaped.
pub fn sanitize_text(text: &str) -> String {
    Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(text)
        .to_string()
}

/// Resolve a link against the page it was scraped from. Anything that fails
/// to resolve falls back to the page URL.
pub fn resolve_link(link: &str, page_url: &str) -> String {
    if link.starts_with("http") {
        return link.to_string();
    }

    match Url::parse(page_url).and_then(|base| base.join(link)) {
        Ok(resolved) => resolved.to_string(),
        Err(err) => {
            debug!(link, page_url, error = %err, "link did not resolve, using page url");
            page_url.to_string()
        }
    }
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
