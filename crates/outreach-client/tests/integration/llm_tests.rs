use outreach_client::OpenAiClient;
use outreach_core::error::AppError;
use outreach_core::generate::{EmailGenerator, SenderProfile};
use outreach_core::models::{EmailStatus, ScrapeResult};
use outreach_core::rate_limit::RateLimiter;
use outreach_core::traits::CompletionClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TEST_API_KEY, contact};

const MODEL: &str = "openai/gpt-4o-mini";

fn client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::with_base_url(TEST_API_KEY, MODEL, &server.uri())
        .unwrap()
        .with_temperature(0.5)
        .with_max_tokens(300)
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

async fn respond_with(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn completion_sends_model_settings_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(body_partial_json(json!({
            "model": MODEL,
            "max_tokens": 300,
            "messages": [{"role": "user", "content": "Say hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).complete("Say hi").await.unwrap();
    assert_eq!(text, "hi");
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limit() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(429)).await;

    let err = client(&server).complete("x").await.unwrap_err();
    assert!(matches!(err, AppError::RateLimitExceeded));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(503).set_body_json(json!({"error": {"message": "model overloaded"}})),
    )
    .await;

    let err = client(&server).complete("x").await.unwrap_err();
    match err {
        AppError::LlmError {
            message,
            status_code,
            retryable,
        } => {
            assert_eq!(message, "model overloaded");
            assert_eq!(status_code, 503);
            assert!(retryable);
        }
        other => panic!("expected LlmError, got {other:?}"),
    }
}

#[tokio::test]
async fn client_error_is_not_retryable() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(401).set_body_string("bad key")).await;

    let err = client(&server).complete("x").await.unwrap_err();
    assert!(err.to_string().contains("401"), "{err}");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn error_object_in_a_success_reply_is_surfaced() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"error": {"message": "model not found", "code": 404}})),
    )
    .await;

    let err = client(&server).complete("x").await.unwrap_err();
    match err {
        AppError::LlmError {
            message, retryable, ..
        } => {
            assert_eq!(message, "model not found");
            assert!(!retryable);
        }
        other => panic!("expected LlmError, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_llm_error() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(200).set_body_json(json!({"choices": []}))).await;

    let err = client(&server).complete("x").await.unwrap_err();
    assert!(matches!(err, AppError::LlmError { .. }), "{err:?}");
}

#[tokio::test]
async fn generator_drafts_email_from_completion() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(completion(
            "Sure! Here it is.\nSUBJECT: Compiler work at Compilers Inc – Ada Lovelace\nBODY:\nHi Grace,\n\nI enjoyed your article.\n\nBest,\nAda",
        )),
    )
    .await;

    let generator = EmailGenerator::new(
        client(&server),
        RateLimiter::unlimited(),
        SenderProfile {
            name: "Ada Lovelace".into(),
            resume_text: "Wrote the first program.".into(),
            ..SenderProfile::default()
        },
    );
    let target = contact("https://compilers.example");
    let scrape = ScrapeResult::content("https://compilers.example", "We build compilers.");

    let email = generator.generate(&target, Some(&scrape)).await.unwrap();

    assert_eq!(email.subject, "Compiler work at Compilers Inc – Ada Lovelace");
    assert!(email.body.starts_with("Hi Grace,"));
    assert!(email.body.ends_with("Ada"));
    assert_eq!(email.status, EmailStatus::Draft);
    assert_eq!(email.contact, target);
}

#[tokio::test]
async fn generator_propagates_unparseable_completion() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(200).set_body_json(completion("I cannot help with that."))).await;

    let generator = EmailGenerator::new(client(&server), RateLimiter::unlimited(), SenderProfile::default());
    let err = generator
        .generate(&contact("https://compilers.example"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Parse(_)), "{err:?}");
}
