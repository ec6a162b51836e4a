pub mod cleaner;

pub use cleaner::{resolve_link, sanitize_text, truncate_chars};

use crate::{extractor::RawRecord, scrape::ExtractedRecord};

pub const TITLE_MAX_CHARS: usize = 80;
pub const DESCRIPTION_MAX_CHARS: usize = 140;

/// Turn one container's raw values into a finished record.
///
/// Title: `title`, `name`, container text, page URL.
/// Description: sanitized `description` or container text, capped after sanitizing.
/// Link: `link`, `url`, first anchor href, page URL; resolved against the page.
/// Metadata is passed through as extracted.
pub fn normalize(raw: RawRecord, page_url: &str) -> ExtractedRecord {
    let title = title(&raw, page_url);

    let description_source = raw
        .metadata
        .get("description")
        .map(String::as_str)
        .unwrap_or(&raw.text);
    let description = truncate_chars(&sanitize_text(description_source), DESCRIPTION_MAX_CHARS);

    let link = raw
        .metadata
        .get("link")
        .or_else(|| raw.metadata.get("url"))
        .map(String::as_str)
        .or_else(|| raw.first_href.as_deref().filter(|href| !href.is_empty()))
        .unwrap_or(page_url);
    let url = resolve_link(link, page_url);

    ExtractedRecord {
        title,
        description,
        url,
        metadata: raw.metadata,
    }
}

fn title(raw: &RawRecord, page_url: &str) -> String {
    if let Some(title) = raw
        .metadata
        .get("title")
        .or_else(|| raw.metadata.get("name"))
    {
        return title.clone();
    }

    let text = raw.text.trim();
    if text.is_empty() {
        page_url.to_string()
    } else {
        truncate_chars(text, TITLE_MAX_CHARS)
    }
}
