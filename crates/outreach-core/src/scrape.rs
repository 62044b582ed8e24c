use crate::error::AppError;
use crate::models::{NO_CONTENT_ERROR, ScrapeResult};
use crate::rate_limit::RateLimiter;
use crate::traits::{Cleaner, Fetcher, Scraper};
use crate::util::{char_len, truncate_chars};

/// Default length (in characters) below which a page counts as thin content.
pub const DEFAULT_THIN_CONTENT_THRESHOLD: usize = 200;

/// Tunables for [`LocalScraper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapePolicy {
    /// Markdown shorter than this triggers the rendered fallback.
    pub thin_content_threshold: usize,
    /// Hard cap on returned markdown, in characters. `0` means unlimited.
    pub max_content_length: usize,
    /// Whether the rendered fallback may run at all.
    pub render_fallback: bool,
}

impl Default for ScrapePolicy {
    fn default() -> Self {
        Self {
            thin_content_threshold: DEFAULT_THIN_CONTENT_THRESHOLD,
            max_content_length: 8000,
            render_fallback: true,
        }
    }
}

/// Scrapes a page locally: plain HTTP first, headless rendering when the
/// plain fetch comes back thin.
///
/// Generic over both fetch strategies and the markdown extractor so the
/// fallback policy can be exercised without network access.
pub struct LocalScraper<F, R, C>
where
    F: Fetcher,
    R: Fetcher,
    C: Cleaner,
{
    fetcher: F,
    renderer: R,
    cleaner: C,
    limiter: RateLimiter,
    policy: ScrapePolicy,
}

impl<F, R, C> LocalScraper<F, R, C>
where
    F: Fetcher,
    R: Fetcher,
    C: Cleaner,
{
    pub fn new(
        fetcher: F,
        renderer: R,
        cleaner: C,
        limiter: RateLimiter,
        policy: ScrapePolicy,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            cleaner,
            limiter,
            policy,
        }
    }

    pub fn policy(&self) -> &ScrapePolicy {
        &self.policy
    }

    async fn fetch_markdown<T: Fetcher>(&self, source: &T, url: &str) -> Result<String, AppError> {
        let html = source.fetch(url).await?;
        self.cleaner.clean(&html, url)
    }
}

impl<F, R, C> Scraper for LocalScraper<F, R, C>
where
    F: Fetcher,
    R: Fetcher,
    C: Cleaner,
{
    /// 1. Wait for the rate limiter
    /// 2. Plain fetch + extract (errors count as empty content)
    /// 3. Rendered fetch + extract if the result is thin and fallback is on
    /// 4. Keep the longer candidate; equal lengths keep the plain fetch
    /// 5. Empty → error result, otherwise truncate
    async fn scrape(&self, url: &str) -> ScrapeResult {
        self.limiter.acquire().await;

        let mut markdown = match self.fetch_markdown(&self.fetcher, url).await {
            Ok(md) => md,
            Err(e) => {
                tracing::warn!(%url, error = %e, "Plain fetch failed");
                String::new()
            }
        };
        let plain_len = char_len(&markdown);

        if plain_len < self.policy.thin_content_threshold && self.policy.render_fallback {
            tracing::info!(%url, plain_len, "Thin content, falling back to headless rendering");
            match self.fetch_markdown(&self.renderer, url).await {
                Ok(rendered) => {
                    let rendered_len = char_len(&rendered);
                    if rendered_len > plain_len {
                        markdown = rendered;
                    } else {
                        tracing::debug!(%url, plain_len, rendered_len, "Keeping plain fetch result");
                    }
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "Rendered fetch failed");
                }
            }
        }

        if markdown.is_empty() {
            return ScrapeResult::failed(url, NO_CONTENT_ERROR);
        }

        let markdown = truncate_chars(&markdown, self.policy.max_content_length);
        tracing::debug!(%url, length = char_len(markdown), "Scraped");
        ScrapeResult::content(url, markdown)
    }
}
