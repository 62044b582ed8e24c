use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error recorded when neither fetch strategy produced any markdown.
pub const NO_CONTENT_ERROR: &str = "no content extracted";

/// A target person at a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub name: String,
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub url: String,
}

/// Outcome of scraping one URL.
///
/// Exactly one of `markdown` / `error` carries information: either the
/// markdown is non-empty and there is no error, or the markdown is empty and
/// the error says why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScrapeRecord")]
pub struct ScrapeResult {
    url: String,
    markdown: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Wire shape of a persisted [`ScrapeResult`], normalized on load.
#[derive(Deserialize)]
struct ScrapeRecord {
    url: String,
    #[serde(default)]
    markdown: String,
    #[serde(default)]
    error: Option<String>,
}

impl From<ScrapeRecord> for ScrapeResult {
    fn from(record: ScrapeRecord) -> Self {
        match record.error {
            Some(error) if !error.trim().is_empty() => Self::failed(record.url, error),
            _ => Self::content(record.url, record.markdown),
        }
    }
}

impl ScrapeResult {
    /// Successful scrape. Empty markdown is recorded as [`NO_CONTENT_ERROR`].
    pub fn content(url: impl Into<String>, markdown: impl Into<String>) -> Self {
        let markdown = markdown.into();
        if markdown.is_empty() {
            return Self::failed(url, NO_CONTENT_ERROR);
        }
        Self {
            url: url.into(),
            markdown,
            error: None,
        }
    }

    /// Failed scrape. A blank error message is replaced by [`NO_CONTENT_ERROR`].
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            NO_CONTENT_ERROR.to_string()
        } else {
            error
        };
        Self {
            url: url.into(),
            markdown: String::new(),
            error: Some(error),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Delivery state of a generated email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Draft,
    Sent,
    Failed,
}

impl std::fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailStatus::Draft => write!(f, "draft"),
            EmailStatus::Sent => write!(f, "sent"),
            EmailStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A personalized email produced for one contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    pub contact: Contact,
    pub subject: String,
    pub body: String,
    pub status: EmailStatus,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedEmail {
    /// Creates a draft. Returns `None` if the subject or body is blank.
    pub fn draft(contact: Contact, subject: String, body: String) -> Option<Self> {
        if subject.trim().is_empty() || body.trim().is_empty() {
            return None;
        }
        Some(Self {
            contact,
            subject,
            body,
            status: EmailStatus::Draft,
            generated_at: Utc::now(),
        })
    }

    pub fn mark_sent(&mut self) {
        self.status = EmailStatus::Sent;
    }

    pub fn mark_failed(&mut self) {
        self.status = EmailStatus::Failed;
    }
}
