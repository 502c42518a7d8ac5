use std::sync::Arc;

use ai_llm_service::config::runtime_config::RuntimeConfig;
use ai_llm_service::error_handler::AiLlmError;
use ai_llm_service::model_gateway::ModelGateway;
use ai_llm_service::services::ollama_service::OllamaService;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MISSING_BIN: &str = "raggamuffin-test-missing-ollama-bin";

fn gateway_for(endpoint: &str) -> ModelGateway {
    let cfg = RuntimeConfig {
        endpoint: endpoint.to_string(),
        cli_bin: MISSING_BIN.to_string(),
        timeout_secs: Some(5),
        ..RuntimeConfig::default()
    };
    let runtime = OllamaService::new(cfg).expect("valid config");
    ModelGateway::new(Arc::new(runtime), "mxbai-embed-large")
}

#[tokio::test]
async fn embed_flattens_batched_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .and(body_partial_json(
            json!({ "model": "mxbai-embed-large", "input": "hello" }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "mxbai-embed-large",
            "embeddings": [[0.25, -0.5, 1.0]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway_for(&server.uri());
    let v = gw.embed("mxbai-embed-large", "hello").await.unwrap();
    assert_eq!(v, vec![0.25, -0.5, 1.0]);
}

#[tokio::test]
async fn embed_without_embeddings_field_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "model": "m" })))
        .mount(&server)
        .await;

    let gw = gateway_for(&server.uri());
    let err = gw.embed("m", "hello").await.unwrap_err();
    assert!(matches!(err, AiLlmError::InvalidResponse(_)), "{err}");

    let health = gw.check_service_health().await.unwrap_err();
    assert!(matches!(health, AiLlmError::ServiceUnavailable(_)), "{health}");
    assert!(health.to_string().contains("no embeddings"));
}

#[tokio::test]
async fn generate_returns_response_text_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "llama3", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3",
            "response": "  Blue.\n",
            "done": true
        })))
        .mount(&server)
        .await;

    let gw = gateway_for(&server.uri());
    let text = gw.generate("llama3", "What color is the sky?").await.unwrap();
    assert_eq!(text, "  Blue.\n");
}

#[tokio::test]
async fn missing_model_reports_listing_failure_in_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "model \"nope\" not found, try pulling it first"
        })))
        .mount(&server)
        .await;

    let gw = gateway_for(&server.uri());
    let err = gw.check_model_availability("nope").await.unwrap_err();
    match err {
        AiLlmError::ModelUnavailable { model, reason } => {
            assert_eq!(model, "nope");
            assert!(reason.contains("not found"), "{reason}");
            assert!(reason.contains("error retrieving available models"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn server_error_is_not_a_missing_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("out of memory"))
        .mount(&server)
        .await;

    let gw = gateway_for(&server.uri());
    let err = gw.check_model_availability("llama3").await.unwrap_err();
    assert!(matches!(err, AiLlmError::HttpStatus { .. }), "{err}");
}

#[tokio::test]
async fn unreachable_runtime_is_service_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let gw = gateway_for(&format!("http://127.0.0.1:{port}"));
    let err = gw.check_service_health().await.unwrap_err();
    assert!(matches!(err, AiLlmError::ServiceUnavailable(_)), "{err}");

    let err = gw.embed("mxbai-embed-large", "x").await.unwrap_err();
    assert!(matches!(err, AiLlmError::ServiceUnavailable(_)), "{err}");
}

#[tokio::test]
async fn listing_with_missing_binary_degrades_catalog() {
    let gw = gateway_for("http://127.0.0.1:1");
    let catalog = gw.catalog().await;
    assert!(catalog.is_degraded());
}
