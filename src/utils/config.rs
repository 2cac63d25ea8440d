//! Server configuration.
//!
//! Behavioral settings (server, LLM, search, prompt overrides) come from an
//! optional TOML file; every field has a default so an absent file is valid.
//! API credentials are only ever read from the process environment, with a
//! `.env` file loaded first when present.

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "quarry.toml";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub search: SearchConfig,

    /// Optional replacements for the built-in stage templates
    #[serde(default)]
    pub prompts: PromptOverrides,

    /// Never read from or written to the TOML file
    #[serde(skip)]
    pub credentials: Credentials,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory that download exports are written into
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// How long shutdown waits for in-flight research jobs
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_shutdown_grace_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            export_dir: default_export_dir(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    /// Groq (or any OpenAI-compatible chat completions endpoint)
    #[default]
    Groq,
    /// Local Ollama server, requires the `ollama` feature
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProviderKind,

    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    4000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            model: default_model(),
            api_base: default_api_base(),
            ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_api_base")]
    pub api_base: String,

    /// Depth used for the primary query; follow-ups always run `basic`
    #[serde(default = "default_search_depth")]
    pub search_depth: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_follow_up_max_results")]
    pub follow_up_max_results: u32,

    /// Domain allow-list applied to the primary query only
    #[serde(default = "default_include_domains")]
    pub include_domains: Vec<String>,

    /// Follow-up query templates; `{query}` is replaced with the user query
    #[serde(default = "default_follow_up_queries")]
    pub follow_up_queries: Vec<String>,
}

fn default_search_api_base() -> String {
    "https://api.tavily.com".to_string()
}

fn default_search_depth() -> String {
    "advanced".to_string()
}

fn default_max_results() -> u32 {
    15
}

fn default_follow_up_max_results() -> u32 {
    5
}

fn default_include_domains() -> Vec<String> {
    [
        "yourstory.com",
        "economictimes.indiatimes.com",
        "techcrunch.com",
        "inc42.com",
        "entrackr.com",
        "business-standard.com",
        "livemint.com",
        "startupnews.fyi",
        "forbesindia.com",
        "moneycontrol.com",
    ]
    .iter()
    .map(|d| d.to_string())
    .collect()
}

fn default_follow_up_queries() -> Vec<String> {
    vec![
        "{query} funding investment 2024 2025".to_string(),
        "{query} latest news recent developments".to_string(),
        "{query} market statistics".to_string(),
    ]
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: default_search_api_base(),
            search_depth: default_search_depth(),
            max_results: default_max_results(),
            follow_up_max_results: default_follow_up_max_results(),
            include_domains: default_include_domains(),
            follow_up_queries: default_follow_up_queries(),
        }
    }
}

// ============= Prompt Overrides =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptOverrides {
    pub researcher: Option<String>,
    pub summarizer: Option<String>,
    pub critic: Option<String>,
    pub writer: Option<String>,
}

// ============= Credentials =============

/// API credentials sourced from the environment
#[derive(Clone, Default)]
pub struct Credentials {
    pub groq_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub secret_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("groq_api_key", &self.groq_configured())
            .field("tavily_api_key", &self.tavily_configured())
            .field("secret_key", &self.secret_key_configured())
            .finish()
    }
}

impl Credentials {
    /// Read `GROQ_API_KEY`, `TAVILY_API_KEY` and `SECRET_KEY`.
    /// Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            groq_api_key: non_empty_var("GROQ_API_KEY"),
            tavily_api_key: non_empty_var("TAVILY_API_KEY"),
            secret_key: non_empty_var("SECRET_KEY"),
        }
    }

    pub fn groq_configured(&self) -> bool {
        self.groq_api_key.is_some()
    }

    pub fn tavily_configured(&self) -> bool {
        self.tavily_api_key.is_some()
    }

    pub fn secret_key_configured(&self) -> bool {
        self.secret_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration: `.env`, then the TOML file (explicit path,
    /// `QUARRY_CONFIG`, or `quarry.toml` if it exists), then `HOST`/`PORT`
    /// overrides, then credentials.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env::var("QUARRY_CONFIG").ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Ok(host) = env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }

        config.credentials = Credentials::from_env();
        Ok(config)
    }

    /// Parse a TOML file. Credentials are left empty.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Invalid config: {}", e)))
    }

    /// Search credentials are present, plus the LLM key when the provider needs one
    pub fn api_keys_configured(&self) -> bool {
        let llm_ready = match self.llm.provider {
            LlmProviderKind::Groq => self.credentials.groq_configured(),
            LlmProviderKind::Ollama => true,
        };
        llm_ready && self.credentials.tavily_configured()
    }

    /// Attach credentials, mostly useful in tests
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}
