use std::time::Duration;

use outreach_client::RemoteApiScraper;
use outreach_core::rate_limit::RateLimiter;
use outreach_core::traits::Scraper;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TEST_API_KEY, closed_port_url};

const TARGET: &str = "https://compilers.example/about";

fn scraper(server: &MockServer, max_content_length: usize) -> RemoteApiScraper {
    RemoteApiScraper::new(
        &format!("{}/", server.uri()),
        TEST_API_KEY,
        Duration::from_secs(5),
        RateLimiter::unlimited(),
        max_content_length,
    )
    .unwrap()
}

async fn respond_with(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn successful_scrape_sends_auth_and_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(body_json(json!({"url": TARGET, "formats": ["markdown"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"markdown": "# Compilers Inc\n\nWe build compilers.", "metadata": {"title": "x"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = scraper(&server, 0).scrape(TARGET).await;

    assert!(result.is_success(), "{:?}", result.error());
    assert_eq!(result.url(), TARGET);
    assert_eq!(result.markdown(), "# Compilers Inc\n\nWe build compilers.");
}

#[tokio::test]
async fn markdown_is_truncated() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"success": true, "data": {"markdown": "Ünïcödé content that is long"}})),
    )
    .await;

    let result = scraper(&server, 7).scrape(TARGET).await;
    assert_eq!(result.markdown(), "Ünïcödé");
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(500).set_body_string("upstream exploded")).await;

    let result = scraper(&server, 0).scrape(TARGET).await;

    assert!(!result.is_success());
    let error = result.error().unwrap();
    assert!(error.contains("500"), "{error}");
    assert!(error.contains("upstream exploded"), "{error}");
}

#[tokio::test]
async fn unparseable_json_is_an_error_result() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(200).set_body_string("<html>not json</html>")).await;

    let result = scraper(&server, 0).scrape(TARGET).await;

    assert!(!result.is_success());
    assert!(result.error().unwrap().contains("parse"));
}

#[tokio::test]
async fn reported_failure_is_an_error_result() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": "blocked by robots"})),
    )
    .await;

    let result = scraper(&server, 0).scrape(TARGET).await;

    assert!(!result.is_success());
    assert!(result.error().unwrap().contains("blocked by robots"));
}

#[tokio::test]
async fn empty_markdown_is_an_error_result() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"markdown": "   "}})),
    )
    .await;

    let result = scraper(&server, 0).scrape(TARGET).await;

    assert!(!result.is_success());
    assert!(result.markdown().is_empty());
    assert!(result.error().is_some());
}

#[tokio::test]
async fn missing_data_is_an_error_result() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(200).set_body_json(json!({"success": true}))).await;

    let result = scraper(&server, 0).scrape(TARGET).await;
    assert!(!result.is_success());
}

#[tokio::test]
async fn refused_connection_is_recorded_as_a_network_error() {
    let scraper = RemoteApiScraper::new(
        &closed_port_url(),
        TEST_API_KEY,
        Duration::from_secs(5),
        RateLimiter::unlimited(),
        0,
    )
    .unwrap();

    let result = scraper.scrape(TARGET).await;

    assert!(!result.is_success());
    assert_eq!(result.markdown(), "");
    let error = result.error().unwrap();
    assert!(error.starts_with("Network error"), "{error}");
}
