use std::borrow::Cow;
use std::sync::Arc;

use htmd::HtmlToMarkdown;
use outreach_core::error::AppError;
use outreach_core::traits::Cleaner;

use crate::readability::isolate_main_content;

const SKIPPED_TAGS: [&str; 9] = [
    "script", "style", "nav", "footer", "header", "aside", "noscript", "iframe", "svg",
];

/// Turns a company page into markdown for the prompt.
///
/// The main content is isolated with a Readability pass first (falling back
/// to the whole page when it fails or finds too little), then htmd converts
/// the HTML structurally while dropping navigation, footers and scripts.
#[derive(Clone)]
pub struct MarkdownExtractor {
    converter: Arc<HtmlToMarkdown>,
}

impl MarkdownExtractor {
    pub fn new() -> Self {
        let converter = HtmlToMarkdown::builder()
            .skip_tags(SKIPPED_TAGS.to_vec())
            .build();

        Self {
            converter: Arc::new(converter),
        }
    }
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner for MarkdownExtractor {
    fn clean(&self, html: &str, base_url: &str) -> Result<String, AppError> {
        let source = match isolate_main_content(html, base_url) {
            Ok(Some(article)) => Cow::Owned(article),
            Ok(None) => {
                tracing::debug!(url = %base_url, "No main content isolated, converting full page");
                Cow::Borrowed(html)
            }
            Err(e) => {
                tracing::debug!(url = %base_url, error = %e, "Readability pass failed, converting full page");
                Cow::Borrowed(html)
            }
        };

        let markdown = self
            .converter
            .convert(&source)
            .map_err(|e| AppError::CleanerError(e.to_string()))?;

        Ok(markdown.trim().to_string())
    }
}
