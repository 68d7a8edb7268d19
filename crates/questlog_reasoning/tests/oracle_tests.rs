//! Oracle behavior against fake provider endpoints.

use questlog_core::{Advisor, DailyLog, DateKey, HabitCatalog, ProgressSnapshot, Progression, UserStats};
use questlog_memory::{QuestCoordinator, SqliteStore};
use questlog_reasoning::providers::{AnthropicClient, GeminiClient, OpenAiClient};
use questlog_reasoning::{CompletionParams, LlmClient, Oracle, FALLBACK_MESSAGE, SILENT_MESSAGE};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEMINI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn snapshot() -> ProgressSnapshot {
    let date = DateKey::from_ymd(2024, 8, 20).unwrap();
    let mut log = DailyLog::empty(date);
    log.toggle("1");
    ProgressSnapshot::build(&HabitCatalog::starter(), &log, &UserStats::new(date))
}

fn gemini(server: &MockServer) -> Arc<dyn LlmClient> {
    Arc::new(
        GeminiClient::with_api_key(
            "gemini-2.5-flash",
            Some(server.uri().as_str()),
            Some("test-key".to_string()),
            None,
        )
        .unwrap(),
    )
}

fn oracle(client: Arc<dyn LlmClient>) -> Oracle {
    Oracle::new(client, CompletionParams::default())
}

#[tokio::test]
async fn test_gemini_success_is_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "thinkingConfig": { "thinkingBudget": 0 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "  One quest down, scout.\n" }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = oracle(gemini(&server)).advise(&snapshot()).await;
    assert_eq!(message, "One quest down, scout.");
}

#[tokio::test]
async fn test_server_error_yields_fallback_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let message = oracle(gemini(&server)).advise(&snapshot()).await;
    assert_eq!(message, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_quota_error_yields_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let message = oracle(gemini(&server)).advise(&snapshot()).await;
    assert_eq!(message, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_malformed_body_yields_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let message = oracle(gemini(&server)).advise(&snapshot()).await;
    assert_eq!(message, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_empty_answer_yields_silent_spirits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let message = oracle(gemini(&server)).advise(&snapshot()).await;
    assert_eq!(message, SILENT_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_host_yields_fallback() {
    // Port 9 (discard) is closed on test machines
    let client = GeminiClient::with_api_key(
        "gemini-2.5-flash",
        Some("http://127.0.0.1:9"),
        Some("k".to_string()),
        None,
    )
    .unwrap();
    let message = oracle(Arc::new(client)).advise(&snapshot()).await;
    assert_eq!(message, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_openai_compatible_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "The torch burns on." }, "finish_reason": "stop" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::with_api_key(
        "gpt-4o-mini",
        Some(format!("{}/v1", server.uri()).as_str()),
        Some("sk-test".to_string()),
        None,
    )
    .unwrap();
    let message = oracle(Arc::new(client)).advise(&snapshot()).await;
    assert_eq!(message, "The torch burns on.");
}

#[tokio::test]
async fn test_anthropic_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "ak-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "Rest, hero." }],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::with_api_key(
        "claude-3-5-haiku-latest",
        Some(server.uri().as_str()),
        Some("ak-test".to_string()),
        None,
    )
    .unwrap();
    let message = oracle(Arc::new(client)).advise(&snapshot()).await;
    assert_eq!(message, "Rest, hero.");
}

#[tokio::test]
async fn test_missing_key_yields_fallback() {
    let client = OpenAiClient::with_api_key("gpt-4o-mini", Some("http://127.0.0.1:9"), None, None).unwrap();
    let message = oracle(Arc::new(client)).advise(&snapshot()).await;
    assert_eq!(message, FALLBACK_MESSAGE);
}

/// A failed consultation still settles the panel with the fallback line.
#[tokio::test]
async fn test_failed_consult_resets_loading_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(SqliteStore::new(":memory:").await.unwrap());
    let advisor = Arc::new(oracle(gemini(&server)));
    let mut coord = QuestCoordinator::load(store, advisor, HabitCatalog::starter(), Progression::default())
        .await
        .unwrap();

    let message = coord.consult().await.unwrap();
    assert_eq!(message, FALLBACK_MESSAGE);
    assert_eq!(coord.panel().message, FALLBACK_MESSAGE);
    assert!(coord.panel().is_open);
    assert!(!coord.panel().is_loading);
}
