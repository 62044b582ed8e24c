use std::future::Future;

use crate::error::AppError;
use crate::models::{GeneratedEmail, ScrapeResult};

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Converts raw HTML into clean Markdown text.
///
/// `base_url` is the page the HTML came from; relative links are resolved
/// against it.
pub trait Cleaner: Send + Sync + Clone {
    fn clean(&self, html: &str, base_url: &str) -> Result<String, AppError>;
}

/// Turns a company URL into markdown.
///
/// Never fails: every problem is recorded in [`ScrapeResult::error`], so
/// callers can treat every implementation the same way.
pub trait Scraper: Send + Sync {
    fn scrape(&self, url: &str) -> impl Future<Output = ScrapeResult> + Send;
}

/// Sends a prompt to an LLM and returns the raw completion text.
pub trait CompletionClient: Send + Sync + Clone {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Delivers a finished email to its contact.
pub trait Mailer: Send + Sync {
    fn send(&self, email: &GeneratedEmail) -> impl Future<Output = Result<(), AppError>> + Send;
}
