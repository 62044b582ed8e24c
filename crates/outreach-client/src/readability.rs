//! Main-content isolation for company pages, via Mozilla's Readability
//! algorithm as ported by `dom_smoothie`.
//!
//! Relative links inside the isolated article are resolved against the page
//! URL by the DOM pass itself. Thin results are rejected so the caller
//! converts the whole page instead.

use dom_smoothie::{Config, Readability};
use outreach_core::error::AppError;
use url::Url;

/// Articles with less text than this (non-whitespace chars) are not trusted.
const MIN_ARTICLE_CHARS: usize = 200;

/// Upper bound on elements the parser walks; huge pages are not worth it.
const MAX_ELEMENTS: usize = 9000;

/// Returns the main-content HTML of `html`, or `None` when nothing
/// substantial stands out.
pub fn isolate_main_content(html: &str, base_url: &str) -> Result<Option<String>, AppError> {
    // An unparseable base still gets extraction, just without link resolution.
    let document_url = Url::parse(base_url).ok().map(|_| base_url);

    let cfg = Config {
        max_elements_to_parse: MAX_ELEMENTS,
        ..Default::default()
    };

    let mut readability = Readability::new(html, document_url, Some(cfg))
        .map_err(|e| AppError::CleanerError(format!("readability setup failed: {e}")))?;
    let article = readability
        .parse()
        .map_err(|e| AppError::CleanerError(format!("readability failed: {e}")))?;

    let text_chars = article
        .text_content
        .chars()
        .filter(|c| !c.is_whitespace())
        .count();
    if text_chars < MIN_ARTICLE_CHARS {
        return Ok(None);
    }

    Ok(Some(article.content.to_string()))
}
