//! OpenAI-compatible client tests with a mocked chat completions API

use quarry::llm::openai::OpenAIClient;
use quarry::llm::{GenerationParams, LLMClient};
use quarry::types::AppError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

fn mock_completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn client(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new(
        "gsk_test".to_string(),
        format!("{}/", server.uri()),
        "llama-3.3-70b-versatile".to_string(),
        GenerationParams::default(),
    )
}

// ============= Tests =============

#[tokio::test]
async fn test_generate_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_partial_json(json!({
            "model": "llama-3.3-70b-versatile",
            "max_tokens": 4000,
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_completion("Hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).generate("Hello").await.unwrap();
    assert_eq!(response, "Hi there");
}

#[tokio::test]
async fn test_generation_params_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"temperature": 0.5, "max_tokens": 256})))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_completion("Fast and safe")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAIClient::new(
        "gsk_test".to_string(),
        server.uri(),
        "llama-3.3-70b-versatile".to_string(),
        GenerationParams {
            temperature: 0.5,
            max_tokens: 256,
        },
    );
    let response = client.generate("Explain Rust").await.unwrap();
    assert_eq!(response, "Fast and safe");
}

#[tokio::test]
async fn test_http_error_is_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = client(&server).generate("Hello").await.unwrap_err();
    match err {
        AppError::LLM(msg) => {
            assert!(msg.contains("401"), "unexpected message: {msg}");
            assert!(msg.contains("invalid api key"));
        }
        other => panic!("expected LLM error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client(&server).generate("Hello").await.unwrap_err();
    assert_eq!(err.to_string(), "LLM error: No response from model");
}

#[tokio::test]
async fn test_malformed_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).generate("Hello").await.unwrap_err();
    assert!(matches!(err, AppError::LLM(ref m) if m.starts_with("Failed to parse response")));
}

#[tokio::test]
async fn test_unreachable_server_is_error() {
    let client = OpenAIClient::new(
        "gsk_test".to_string(),
        "http://127.0.0.1:1".to_string(),
        "m".to_string(),
        GenerationParams::default(),
    );
    let err = client.generate("Hello").await.unwrap_err();
    assert!(matches!(err, AppError::LLM(ref m) if m.starts_with("HTTP request failed")));
    assert_eq!(client.model_name(), "m");
}
