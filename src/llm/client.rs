//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the language-model backends:
//! - **Groq**: any OpenAI-compatible chat completions endpoint (default)
//! - **Ollama**: local inference, behind the `ollama` feature

use crate::types::{AppError, Result};
use crate::utils::config::{Config, LlmProviderKind};
use async_trait::async_trait;

/// Text completion backend used by every research stage.
///
/// The pipeline only sees this trait, so a stage can be handed Groq, Ollama
/// or a test double interchangeably.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Complete a single user prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model the backend sends requests to
    fn model_name(&self) -> &str;
}

/// Sampling parameters shared by the providers that honor them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 4000,
        }
    }
}

/// Backend chosen from `[llm]` configuration
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI-compatible chat completions API (Groq by default)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Groq {
    ///     api_key: "gsk_...".to_string(),
    ///     api_base: "https://api.groq.com/openai/v1".to_string(),
    ///     model: "llama-3.3-70b-versatile".to_string(),
    ///     params: GenerationParams::default(),
    /// };
    /// ```
    Groq {
        api_key: String,
        api_base: String,
        model: String,
        params: GenerationParams,
    },

    /// Locally hosted Ollama server
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Resolve the configured provider.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when the Groq provider is selected and
    /// `GROQ_API_KEY` is unset.
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = &config.llm;
        match llm.provider {
            LlmProviderKind::Groq => {
                let api_key = config.credentials.groq_api_key.clone().ok_or_else(|| {
                    AppError::Config("GROQ_API_KEY is not set".to_string())
                })?;
                Ok(Provider::Groq {
                    api_key,
                    api_base: llm.api_base.clone(),
                    model: llm.model.clone(),
                    params: GenerationParams {
                        temperature: llm.temperature,
                        max_tokens: llm.max_tokens,
                    },
                })
            }
            LlmProviderKind::Ollama => Ok(Provider::Ollama {
                base_url: llm.ollama_url.clone(),
                model: llm.model.clone(),
            }),
        }
    }

    /// Build the client for this backend
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's cargo feature is not compiled in.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::Groq {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *params,
            ))),

            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone()).await?,
            )),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { model, .. } => Err(AppError::Config(format!(
                "Ollama provider requested for model '{}' but the `ollama` feature is not enabled",
                model
            ))),
        }
    }

    /// Display name used in startup and agent logs
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Groq { .. } => "Groq",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier configured for this provider
    pub fn model(&self) -> &str {
        match self {
            Provider::Groq { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}
