//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{Contact, GeneratedEmail, ScrapeResult};
use crate::traits::{Cleaner, CompletionClient, Fetcher, Mailer, Scraper};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns queued responses and records requested URLs.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times `fetch` was called.
    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockCleaner
// ---------------------------------------------------------------------------

/// Mock cleaner that passes HTML through unchanged.
#[derive(Clone)]
pub struct MockCleaner {
    error: Arc<Mutex<Option<AppError>>>,
}

impl MockCleaner {
    /// Creates a cleaner that returns the input unchanged.
    pub fn passthrough() -> Self {
        Self {
            error: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a cleaner whose first call returns an error.
    pub fn with_error(error: AppError) -> Self {
        Self {
            error: Arc::new(Mutex::new(Some(error))),
        }
    }
}

impl Cleaner for MockCleaner {
    fn clean(&self, html: &str, _base_url: &str) -> Result<String, AppError> {
        let mut err = self.error.lock().unwrap();
        if let Some(e) = err.take() {
            return Err(e);
        }
        Ok(html.to_string())
    }
}

// ---------------------------------------------------------------------------
// MockScraper
// ---------------------------------------------------------------------------

/// Mock scraper returning canned markdown per URL; unknown URLs fail.
#[derive(Clone, Default)]
pub struct MockScraper {
    pages: Arc<Mutex<Vec<(String, String)>>>,
    pub scraped: Arc<Mutex<Vec<String>>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, markdown: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .push((url.to_string(), markdown.to_string()));
        self
    }
}

impl Scraper for MockScraper {
    async fn scrape(&self, url: &str) -> ScrapeResult {
        self.scraped.lock().unwrap().push(url.to_string());
        let pages = self.pages.lock().unwrap();
        match pages.iter().find(|(u, _)| u == url) {
            Some((_, md)) => ScrapeResult::content(url, md.clone()),
            None => ScrapeResult::failed(url, "connection refused"),
        }
    }
}

// ---------------------------------------------------------------------------
// MockCompletionClient
// ---------------------------------------------------------------------------

/// Mock LLM that returns queued completions and records prompts.
#[derive(Clone)]
pub struct MockCompletionClient {
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockCompletionClient {
    pub fn new(completion: &str) -> Self {
        Self::with_responses(vec![Ok(completion.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("SUBJECT: Default\nBODY:\nDefault body".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockMailer
// ---------------------------------------------------------------------------

/// Mock mailer that records recipients; listed addresses fail.
#[derive(Clone, Default)]
pub struct MockMailer {
    failing: Arc<Mutex<Vec<String>>>,
    delivered: Arc<Mutex<Vec<String>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(self, address: &str) -> Self {
        self.failing.lock().unwrap().push(address.to_string());
        self
    }

    /// Every recipient `send` was called for, in order.
    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

impl Mailer for MockMailer {
    async fn send(&self, email: &GeneratedEmail) -> Result<(), AppError> {
        let to = email.contact.email.clone();
        self.delivered.lock().unwrap().push(to.clone());
        if self.failing.lock().unwrap().contains(&to) {
            return Err(AppError::DeliveryError(format!("550 mailbox unavailable: {to}")));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a dummy Contact for testing.
pub fn make_test_contact() -> Contact {
    Contact {
        email: "grace@example.com".to_string(),
        name: "Grace Hopper".to_string(),
        company: "Compilers Inc".to_string(),
        role: "Engineering Manager".to_string(),
        url: "https://example.com".to_string(),
    }
}
