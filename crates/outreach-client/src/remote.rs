use std::time::Duration;

use outreach_core::error::AppError;
use outreach_core::models::ScrapeResult;
use outreach_core::rate_limit::RateLimiter;
use outreach_core::traits::Scraper;
use outreach_core::util::truncate_chars;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::fetcher::transport_error;

/// Scraper backed by a hosted scraping API (Firecrawl-compatible).
///
/// One authenticated `POST {base_url}/v1/scrape` per page. Every failure is
/// folded into the returned [`ScrapeResult`]; only building the HTTP client
/// can fail.
#[derive(Clone)]
pub struct RemoteApiScraper {
    client: Client,
    base_url: String,
    api_key: String,
    limiter: RateLimiter,
    max_content_length: usize,
    timeout: Duration,
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'a str; 1],
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

impl RemoteApiScraper {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
        limiter: RateLimiter,
        max_content_length: usize,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            limiter,
            max_content_length,
            timeout,
        })
    }

    async fn request_markdown(&self, url: &str) -> Result<String, AppError> {
        let endpoint = format!("{}/v1/scrape", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&ScrapeRequest {
                url,
                formats: ["markdown"],
            })
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::HttpError(format!(
                "scrape API returned HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to parse scrape API response: {e}")))?;

        if !parsed.success {
            return Err(AppError::Generic(format!(
                "scrape API reported failure: {}",
                parsed.error.as_deref().unwrap_or("unknown error")
            )));
        }

        parsed
            .data
            .and_then(|d| d.markdown)
            .filter(|md| !md.trim().is_empty())
            .ok_or_else(|| AppError::EmptyResponse(url.to_string()))
    }
}

impl Scraper for RemoteApiScraper {
    async fn scrape(&self, url: &str) -> ScrapeResult {
        self.limiter.acquire().await;

        match self.request_markdown(url).await {
            Ok(markdown) => {
                let markdown = truncate_chars(markdown.trim(), self.max_content_length);
                tracing::debug!(%url, length = markdown.chars().count(), "Remote scrape succeeded");
                ScrapeResult::content(url, markdown)
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "Remote scrape failed");
                ScrapeResult::failed(url, e.to_string())
            }
        }
    }
}
