//! Mock API tests for the model discovery client.
//!
//! These tests use wiremock to simulate the provider listing endpoints:
//! Gemini's `GET /v1beta/models` and the OpenAI-compatible `GET /models`
//! shape used by OpenAI, DeepSeek, and OpenRouter.

use aminder_ai::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn openai_models_response() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [
            { "id": "gpt-4", "object": "model", "owned_by": "openai" },
            { "id": "gpt-4", "object": "model", "owned_by": "openai" },
            { "id": "gpt-3.5", "object": "model", "owned_by": "openai" }
        ]
    })
}

#[tokio::test]
async fn gemini_models_are_sorted_and_stripped() {
    init_test_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "name": "models/foo" },
                { "name": "models/bar" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("gemini", mock_server.uri(), "test-key");
    let models = client.discover_models(&request).await.unwrap();

    assert_eq!(models, vec!["bar", "foo"]);
}

#[tokio::test]
async fn openai_models_are_deduplicated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_models_response()))
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("openai", mock_server.uri(), "sk-test");
    let models = client.discover_models(&request).await.unwrap();

    assert_eq!(models, vec!["gpt-3.5", "gpt-4"]);
}

#[tokio::test]
async fn deepseek_uses_openai_compatible_protocol() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer sk-deepseek"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "deepseek-coder" },
                { "id": "deepseek-chat" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("deepseek", mock_server.uri(), "sk-deepseek");
    let models = client.discover_models(&request).await.unwrap();

    assert_eq!(models, vec!["deepseek-chat", "deepseek-coder"]);
}

#[tokio::test]
async fn openrouter_sends_attribution_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer sk-or"))
        .and(header("HTTP-Referer", "https://aminder.app"))
        .and(header("X-Title", "Aminder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "anthropic/claude-3-opus" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("openrouter", mock_server.uri(), "sk-or");
    let models = client.discover_models(&request).await.unwrap();

    assert_eq!(models, vec!["anthropic/claude-3-opus"]);
}

#[tokio::test]
async fn anthropic_issues_no_request() {
    let mock_server = MockServer::start().await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("anthropic", mock_server.uri(), "sk-ant");
    let models = client.discover_models(&request).await.unwrap();

    assert_eq!(
        models,
        vec![
            "claude-3-opus-20240229",
            "claude-3-sonnet-20240229",
            "claude-3-haiku-20240229",
            "claude-2.1",
            "claude-2.0"
        ]
    );
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn trailing_slashes_do_not_change_the_request_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "gpt-4" }]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();

    let plain = DiscoveryRequest::new("openai", mock_server.uri(), "sk-test");
    let slashed = DiscoveryRequest::new("openai", format!("{}///", mock_server.uri()), "sk-test");

    assert_eq!(
        client.discover_models(&plain).await.unwrap(),
        client.discover_models(&slashed).await.unwrap()
    );
}

#[tokio::test]
async fn http_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("openai", mock_server.uri(), "sk-bad");
    let err = client.discover_models(&request).await.unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    let message = err.to_string();
    assert!(message.contains("401"), "message was: {message}");
    assert!(
        message.contains("Incorrect API key provided"),
        "message was: {message}"
    );
}

#[tokio::test]
async fn unexpected_shape_yields_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("openai", mock_server.uri(), "sk-test");
    let models = client.discover_models(&request).await.unwrap();

    assert!(models.is_empty());
}

#[tokio::test]
async fn non_json_success_body_is_a_parse_error() {
    let mock_server = MockServer::start().await;

    // a 2xx body that is not JSON at all is corruption, not shape variance
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("openai", mock_server.uri(), "sk-test");
    let err = client.discover_models(&request).await.unwrap_err();

    assert!(matches!(err, AiError::ParseError(_)), "got: {err:?}");
}

#[tokio::test]
async fn discovery_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_models_response()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("openai", mock_server.uri(), "sk-test");

    let first = client.discover_models(&request).await.unwrap();
    let second = client.discover_models(&request).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_provider_falls_back_to_openai_protocol() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer sk-proxy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "llama-3-70b" }]
        })))
        .mount(&mock_server)
        .await;

    let client = ModelDiscovery::new();
    let request = DiscoveryRequest::new("my-local-proxy", mock_server.uri(), "sk-proxy");
    let models = client.discover_models(&request).await.unwrap();

    assert_eq!(models, vec!["llama-3-70b"]);

    // the registry, unlike the discovery client, rejects the identifier
    assert!(
        ProviderRegistry::global()
            .require_provider("my-local-proxy")
            .is_err()
    );
}

#[tokio::test]
async fn form_discovery_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_models_response()))
        .mount(&mock_server)
        .await;

    let mut form = AiConfigForm::new();
    form.set_provider("openai");
    form.set_api_key("sk-test");
    form.set_base_url(mock_server.uri());

    let client = ModelDiscovery::new();
    form.discover(&client).await.unwrap();

    assert_eq!(form.models(), ["gpt-3.5", "gpt-4"]);
    assert_eq!(form.selected_model(), Some("gpt-3.5"));
    assert!(form.model_selection_enabled());
}
