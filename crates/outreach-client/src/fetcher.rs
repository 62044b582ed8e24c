use std::time::Duration;

use outreach_core::error::AppError;
use outreach_core::traits::Fetcher;
use reqwest::Client;
use url::Url;

const USER_AGENT: &str = concat!("Outreach/", env!("CARGO_PKG_VERSION"));

/// Plain HTTP fetcher using reqwest.
///
/// One GET per call, no JavaScript. An empty body is an error rather than
/// "zero bytes of content", so the caller can tell the page was useless.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
        })
    }
}

/// Rejects anything that is not an absolute http(s) URL.
pub(crate) fn check_scheme(url: &str) -> Result<Url, AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(AppError::HttpError(format!(
            "URL scheme '{scheme}' is not allowed (only http/https)"
        ))),
    }
}

/// Maps a reqwest transport error onto the shared taxonomy.
pub(crate) fn transport_error(e: reqwest::Error, timeout: Duration) -> AppError {
    if e.is_timeout() {
        AppError::Timeout(timeout)
    } else if e.is_connect() {
        AppError::NetworkError(format!("Connection failed: {e}"))
    } else {
        AppError::HttpError(e.to_string())
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let parsed = check_scheme(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))?;

        if body.trim().is_empty() {
            return Err(AppError::EmptyResponse(url.to_string()));
        }

        tracing::debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
