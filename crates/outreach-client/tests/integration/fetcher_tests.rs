use std::time::Duration;

use outreach_client::{MarkdownExtractor, RenderedFetcher, ReqwestFetcher};
use outreach_core::error::AppError;
use outreach_core::models::NO_CONTENT_ERROR;
use outreach_core::rate_limit::RateLimiter;
use outreach_core::scrape::{LocalScraper, ScrapePolicy};
use outreach_core::traits::{Fetcher, Scraper};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{company_page, serve_html};

fn local_scraper(
    policy: ScrapePolicy,
) -> LocalScraper<ReqwestFetcher, RenderedFetcher, MarkdownExtractor> {
    LocalScraper::new(
        ReqwestFetcher::with_timeout(Duration::from_secs(5)).unwrap(),
        RenderedFetcher::new(Duration::from_secs(5)).with_executable("/nonexistent/chromium"),
        MarkdownExtractor::new(),
        RateLimiter::unlimited(),
        policy,
    )
}

#[tokio::test]
async fn fetch_returns_body_on_200() {
    let server = MockServer::start().await;
    let url = serve_html(&server, "/about", 200, "<p>hello</p>").await;

    let html = ReqwestFetcher::new().unwrap().fetch(&url).await.unwrap();
    assert_eq!(html, "<p>hello</p>");
}

#[tokio::test]
async fn whitespace_body_is_an_empty_response() {
    let server = MockServer::start().await;
    let url = serve_html(&server, "/blank", 200, "  \n\t ").await;

    let err = ReqwestFetcher::new().unwrap().fetch(&url).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyResponse(_)), "{err:?}");
}

#[tokio::test]
async fn non_success_status_is_an_http_error() {
    let server = MockServer::start().await;
    let url = serve_html(&server, "/missing", 404, "not found").await;

    let err = ReqwestFetcher::new().unwrap().fetch(&url).await.unwrap_err();
    match err {
        AppError::HttpError(msg) => assert!(msg.contains("404"), "{msg}"),
        other => panic!("expected HttpError, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>late</p>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::with_timeout(Duration::from_millis(200)).unwrap();
    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::Timeout(d) if d == Duration::from_millis(200)),
        "{err:?}"
    );
    assert_eq!(err.to_string(), "Request timed out after 200ms");
}

#[tokio::test]
async fn local_scraper_extracts_article_markdown() {
    let server = MockServer::start().await;
    let url = serve_html(&server, "/about", 200, &company_page()).await;

    let result = local_scraper(ScrapePolicy::default()).scrape(&url).await;

    assert!(result.is_success(), "{:?}", result.error());
    let md = result.markdown();
    assert!(md.contains("About Compilers Inc"));
    assert!(md.contains(&format!("({}/careers)", server.uri())));
    assert!(!md.contains("track()"));
    assert!(!md.contains("Copyright"));
}

#[tokio::test]
async fn thin_page_survives_unavailable_renderer() {
    let server = MockServer::start().await;
    let url = serve_html(&server, "/spa", 200, "<div id=\"root\"><p>Loading</p></div>").await;

    let result = local_scraper(ScrapePolicy::default()).scrape(&url).await;

    assert!(result.is_success());
    assert_eq!(result.markdown(), "Loading");
}

#[tokio::test]
async fn server_error_yields_failed_result() {
    let server = MockServer::start().await;
    let url = serve_html(&server, "/down", 500, "oops").await;

    let policy = ScrapePolicy {
        render_fallback: false,
        ..ScrapePolicy::default()
    };
    let result = local_scraper(policy).scrape(&url).await;

    assert!(!result.is_success());
    assert_eq!(result.error(), Some(NO_CONTENT_ERROR));
    assert!(result.markdown().is_empty());
}

#[tokio::test]
async fn markdown_is_capped_at_max_content_length() {
    let server = MockServer::start().await;
    let url = serve_html(&server, "/about", 200, &company_page()).await;

    let policy = ScrapePolicy {
        max_content_length: 40,
        ..ScrapePolicy::default()
    };
    let result = local_scraper(policy).scrape(&url).await;

    assert!(result.is_success());
    assert_eq!(result.markdown().chars().count(), 40);
}
