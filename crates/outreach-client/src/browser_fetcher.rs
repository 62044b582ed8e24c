use std::path::PathBuf;
use std::time::Duration;

use outreach_core::error::AppError;
use outreach_core::traits::Fetcher;

use crate::fetcher::check_scheme;

/// Headless-browser fetcher used as the thin-content fallback.
///
/// Unlike [`super::ReqwestFetcher`] this executes the page's JavaScript
/// before reading the DOM, so client-rendered sites yield real content.
/// Every call launches its own Chromium process and tears it down before
/// returning; nothing is shared between calls.
///
/// Built without the `browser` feature, every fetch reports
/// [`AppError::RendererUnavailable`].
#[derive(Debug, Clone)]
pub struct RenderedFetcher {
    timeout: Duration,
    executable: Option<PathBuf>,
}

impl RenderedFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            executable: None,
        }
    }

    /// Pins the browser binary instead of discovering one per call.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for RenderedFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

/// Locates a Chrome/Chromium binary.
///
/// `CHROME_BIN` wins, then well-known install paths (the snap wrapper at
/// `/snap/bin/chromium` rejects headless flags, so the real binary inside
/// the snap is listed first), then a `$PATH` lookup.
#[cfg(feature = "browser")]
pub fn find_chrome_binary() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "/snap/chromium/current/usr/lib/chromium-browser/chrome",
        "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/google-chrome",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];
    const PATH_NAMES: &[&str] = &[
        "google-chrome-stable",
        "google-chrome",
        "chromium",
        "chromium-browser",
        "chrome",
    ];

    if let Ok(p) = std::env::var("CHROME_BIN") {
        let path = PathBuf::from(p);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!(path = %path.display(), "CHROME_BIN does not exist, searching elsewhere");
    }

    CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .or_else(|| PATH_NAMES.iter().find_map(|name| which::which(name).ok()))
}

#[cfg(feature = "browser")]
mod session {
    use std::path::Path;
    use std::time::Duration;

    use chromiumoxide::{Browser, BrowserConfig, Page};
    use futures::StreamExt;
    use outreach_core::error::AppError;
    use serde::Deserialize;
    use tokio::task::JoinHandle;
    use tokio::time::Instant;

    const POLL_INTERVAL: Duration = Duration::from_millis(250);

    /// Consecutive identical snapshots needed to call the DOM settled.
    const STABLE_POLLS: u32 = 2;

    const SNAPSHOT_JS: &str = "JSON.stringify({ready: document.readyState, length: document.documentElement ? document.documentElement.outerHTML.length : 0})";

    #[derive(Debug, Deserialize, PartialEq)]
    struct DomSnapshot {
        ready: String,
        length: u64,
    }

    /// One launched browser plus the task driving its CDP connection.
    ///
    /// [`BrowserSession::release`] is the normal exit. If the owning future
    /// is dropped first, `Drop` still stops the handler task and chromiumoxide
    /// kills the child process.
    pub(super) struct BrowserSession {
        browser: Browser,
        handler: JoinHandle<()>,
    }

    impl BrowserSession {
        pub(super) async fn launch(executable: &Path, timeout: Duration) -> Result<Self, AppError> {
            let config = BrowserConfig::builder()
                .chrome_executable(executable)
                .no_sandbox()
                .disable_default_args()
                .request_timeout(timeout)
                .arg("--headless=new")
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .arg("--disable-extensions")
                .arg("--no-first-run")
                .build()
                .map_err(|e| AppError::RendererUnavailable(format!("browser config error: {e}")))?;

            let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
                AppError::RendererUnavailable(format!(
                    "failed to launch {}: {e}",
                    executable.display()
                ))
            })?;

            // The CDP handler must be polled for the connection to make progress.
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        tracing::debug!(error = %e, "Browser CDP handler stopped");
                        break;
                    }
                }
            });

            Ok(Self { browser, handler })
        }

        pub(super) async fn render(&self, url: &str, timeout: Duration) -> Result<String, AppError> {
            let work = async {
                let page = self.browser.new_page(url).await.map_err(|e| {
                    AppError::HttpError(format!("Failed to navigate to {url}: {e}"))
                })?;

                if let Err(e) = wait_for_stable_dom(&page, timeout / 3).await {
                    tracing::debug!(%url, error = %e, "Page did not settle, reading DOM anyway");
                }

                page.content()
                    .await
                    .map_err(|e| AppError::HttpError(format!("Failed to read page content: {e}")))
            };

            tokio::time::timeout(timeout, work)
                .await
                .map_err(|_| AppError::Timeout(timeout))?
        }

        /// Closes the browser and reaps the child process.
        pub(super) async fn release(mut self) {
            if let Err(e) = self.browser.close().await {
                tracing::debug!(error = %e, "Browser close failed");
            }
            if let Err(e) = self.browser.wait().await {
                tracing::debug!(error = %e, "Waiting for browser exit failed");
            }
        }
    }

    impl Drop for BrowserSession {
        fn drop(&mut self) {
            self.handler.abort();
        }
    }

    async fn snapshot(page: &Page) -> Result<DomSnapshot, AppError> {
        let raw: String = page
            .evaluate(SNAPSHOT_JS)
            .await
            .map_err(|e| AppError::HttpError(format!("DOM snapshot failed: {e}")))?
            .into_value()
            .map_err(|e| AppError::HttpError(format!("DOM snapshot returned bad value: {e}")))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Polls until the document is complete and its size stops changing.
    async fn wait_for_stable_dom(page: &Page, budget: Duration) -> Result<(), AppError> {
        let deadline = Instant::now() + budget;
        let mut previous: Option<u64> = None;
        let mut stable = 0;

        loop {
            let current = snapshot(page).await?;
            if current.ready == "complete" && previous == Some(current.length) {
                stable += 1;
                if stable >= STABLE_POLLS {
                    return Ok(());
                }
            } else {
                stable = 0;
            }
            previous = Some(current.length);

            if Instant::now() + POLL_INTERVAL > deadline {
                return Err(AppError::Timeout(budget));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

}

#[cfg(feature = "browser")]
impl Fetcher for RenderedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        check_scheme(url)?;

        let executable = self
            .executable
            .clone()
            .or_else(find_chrome_binary)
            .ok_or_else(|| {
                AppError::RendererUnavailable("no Chrome/Chromium executable found".into())
            })?;
        tracing::debug!(%url, browser = %executable.display(), "Rendering page");

        let session = session::BrowserSession::launch(&executable, self.timeout).await?;
        let outcome = session.render(url, self.timeout).await;
        session.release().await;

        let html = outcome?;
        if html.trim().is_empty() {
            return Err(AppError::EmptyResponse(url.to_string()));
        }
        tracing::debug!(%url, bytes = html.len(), "Rendered page");
        Ok(html)
    }
}

#[cfg(not(feature = "browser"))]
impl Fetcher for RenderedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        check_scheme(url)?;
        tracing::debug!(%url, executable = ?self.executable, "Rendering disabled at build time");
        Err(AppError::RendererUnavailable(
            "built without the `browser` feature".into(),
        ))
    }
}
