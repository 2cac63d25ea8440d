//! Ollama client tests with a mocked Ollama server
//!
//! Run with `--features ollama`.

#![cfg(feature = "ollama")]

use quarry::llm::ollama::OllamaClient;
use quarry::llm::{LLMClient, Provider};
use quarry::utils::config::{Config, LlmProviderKind};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

/// Create a mock Ollama chat completion response
fn mock_chat_response(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3.2",
        "created_at": "2024-01-01T00:00:00Z",
        "message": {
            "role": "assistant",
            "content": content
        },
        "done": true
    })
}

// ============= Tests =============

#[tokio::test]
async fn test_ollama_generate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"model": "llama3.2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_chat_response("Hello!")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "llama3.2".to_string())
        .await
        .unwrap();
    assert_eq!(client.generate("Hi").await.unwrap(), "Hello!");
    assert_eq!(client.model_name(), "llama3.2");
}

#[tokio::test]
async fn test_ollama_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "llama3.2".to_string())
        .await
        .unwrap();
    let err = client.generate("Hi").await.unwrap_err();
    assert!(err.to_string().contains("Ollama error"));
}

#[tokio::test]
async fn test_ollama_invalid_url() {
    let result = OllamaClient::new("http://localhost:notaport".to_string(), "m".to_string()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_provider_from_config_builds_ollama_client() {
    let server = MockServer::start().await;
    let mut config = Config::default();
    config.llm.provider = LlmProviderKind::Ollama;
    config.llm.model = "llama3.2".to_string();
    config.llm.ollama_url = server.uri();

    let provider = Provider::from_config(&config).unwrap();
    assert_eq!(provider.name(), "Ollama");
    let client = provider.create_client().await.unwrap();
    assert_eq!(client.model_name(), "llama3.2");
}
