//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the language-model backends the
//! research pipeline talks to. Provider-specific code sits behind the
//! [`LLMClient`] trait so prompt stages never know which backend answered.
//!
//! # Supported Providers
//!
//! - Groq, or any other OpenAI-compatible `/chat/completions` API (always built)
//! - `ollama` - Local Ollama server (cargo feature)
//!
//! # Example
//!
//! ```ignore
//! use quarry::llm::Provider;
//!
//! let provider = Provider::from_config(&config)?;
//! let client = provider.create_client().await?;
//!
//! let response = client.generate("What is 2+2?").await?;
//! println!("{}", response);
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// OpenAI-compatible chat completions client.
pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{GenerationParams, LLMClient, Provider};
