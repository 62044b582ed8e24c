/// Smoke-test for the rendered fallback.
///
/// Launches a headless Chromium through `RenderedFetcher`, renders
/// <https://example.com>, then runs the markdown extractor over the result.
///
/// Run with:
///   cargo run -p outreach-client --example browser_smoke
use std::time::Duration;

use outreach_client::{MarkdownExtractor, RenderedFetcher};
use outreach_core::traits::{Cleaner, Fetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("outreach_client=debug")
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com".to_string());

    let fetcher = RenderedFetcher::new(Duration::from_secs(30));
    println!("Rendering {url} ...");
    let html = fetcher.fetch(&url).await?;
    println!("Got {} bytes of rendered HTML", html.len());

    let markdown = MarkdownExtractor::new().clean(&html, &url)?;
    anyhow::ensure!(!markdown.is_empty(), "extractor produced no markdown");

    println!("{} chars of markdown:\n", markdown.chars().count());
    println!("{}", markdown.chars().take(600).collect::<String>());
    Ok(())
}
