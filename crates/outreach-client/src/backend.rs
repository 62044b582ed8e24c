use outreach_core::config::{ScraperConfig, ScraperProvider};
use outreach_core::error::AppError;
use outreach_core::models::ScrapeResult;
use outreach_core::scrape::LocalScraper;
use outreach_core::traits::Scraper;

use crate::browser_fetcher::RenderedFetcher;
use crate::cleaner::MarkdownExtractor;
use crate::fetcher::ReqwestFetcher;
use crate::remote::RemoteApiScraper;

/// Local scraper wired with the production fetchers.
pub type DefaultLocalScraper = LocalScraper<ReqwestFetcher, RenderedFetcher, MarkdownExtractor>;

/// The scraping strategy selected by configuration.
pub enum ScraperBackend {
    Local(DefaultLocalScraper),
    Remote(RemoteApiScraper),
}

impl ScraperBackend {
    pub fn name(&self) -> &'static str {
        match self {
            ScraperBackend::Local(_) => "local",
            ScraperBackend::Remote(_) => "remote",
        }
    }
}

impl Scraper for ScraperBackend {
    async fn scrape(&self, url: &str) -> ScrapeResult {
        match self {
            ScraperBackend::Local(s) => s.scrape(url).await,
            ScraperBackend::Remote(s) => s.scrape(url).await,
        }
    }
}

/// Builds the scraper named by `config.provider`.
///
/// A remote provider whose key variable (`FIRECRAWL_API_KEY` by default) is
/// unset is a configuration error.
pub fn build_scraper(config: &ScraperConfig) -> Result<ScraperBackend, AppError> {
    let backend = match config.provider {
        ScraperProvider::Local => ScraperBackend::Local(LocalScraper::new(
            ReqwestFetcher::with_timeout(config.timeout())?,
            RenderedFetcher::new(config.timeout()),
            MarkdownExtractor::new(),
            config.rate_limiter(),
            config.policy(),
        )),
        ScraperProvider::Remote => ScraperBackend::Remote(RemoteApiScraper::new(
            &config.remote_base_url,
            config.remote_api_key()?,
            config.timeout(),
            config.rate_limiter(),
            config.max_content_length,
        )?),
    };

    tracing::info!(
        backend = backend.name(),
        rate_limit_ms = config.rate_limit_ms,
        "Scraper ready"
    );
    Ok(backend)
}
