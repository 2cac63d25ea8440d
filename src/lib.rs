//! # Quarry - AI Research Assistant Server
//!
//! Accepts a free-text research query, runs a staged pipeline in the
//! background (web search, fact extraction, summarization, critique, report
//! writing) and lets clients poll progress, read the rendered report and
//! download it as Markdown, PDF or JSON.
//!
//! ## Overview
//!
//! Quarry can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `quarry-server` binary
//! 2. **As a library** - Build an [`AppState`] and mount [`api::routes::create_router`]
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use quarry::{api::routes::create_router, AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let state = AppState::from_config(config);
//!     let app = create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference instead of Groq |
//!
//! ## Modules
//!
//! - [`api`] - HTTP handlers, routes and HTML views
//! - [`export`] - Markdown, JSON and PDF report files
//! - [`llm`] - Groq and Ollama completion clients
//! - [`render`] - Report text to sanitized HTML
//! - [`research`] - Job registry and pipeline orchestration
//! - [`tools`] - Web search
//! - [`types`] - `AppError` and request/response payloads
//! - [`utils`] - Configuration loading

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Web pages, JSON endpoints and the router.
pub mod api;
/// Report export formats.
pub mod export;
/// Language-model backends behind a common trait.
pub mod llm;
/// Report text to HTML conversion.
pub mod render;
/// Research job pipeline.
pub mod research;
/// External tools (web search).
pub mod tools;
/// Shared error type and API payloads.
pub mod types;
/// Configuration utilities.
pub mod utils;

// Public surface
pub use export::{ExportFormat, ExportMetadata, ReportExporter};
pub use llm::{LLMClient, Provider};
pub use research::{
    AgentFactory, BackgroundTasks, ConfigAgentFactory, Job, JobRegistry, JobStatus,
    ResearchCoordinator,
};
pub use tools::{SearchProvider, TavilySearch};
pub use types::{AppError, Result};
pub use utils::config::Config;

use std::sync::Arc;

/// State handed to every axum handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration, including credentials
    pub config: Arc<Config>,
    /// All research jobs created since startup
    pub jobs: Arc<JobRegistry>,
    /// Pipeline runner shared by every job
    pub coordinator: Arc<ResearchCoordinator>,
    /// Handles of running jobs, drained on shutdown
    pub tasks: Arc<BackgroundTasks>,
    /// Writes download files
    pub exporter: Arc<ReportExporter>,
}

impl AppState {
    /// Build state around a custom agent factory
    pub fn new(config: impl Into<Arc<Config>>, factory: Arc<dyn AgentFactory>) -> Self {
        let config = config.into();
        let jobs = Arc::new(JobRegistry::new());
        let exporter = ReportExporter::new(
            config.server.export_dir.clone(),
            ExportMetadata {
                ai_model: config.llm.model.clone(),
                search_engine: format!("tavily_{}", config.search.search_depth),
            },
        );

        Self {
            coordinator: Arc::new(ResearchCoordinator::new(jobs.clone(), factory)),
            tasks: Arc::new(BackgroundTasks::new()),
            exporter: Arc::new(exporter),
            jobs,
            config,
        }
    }

    /// Build state whose agents come from the configured providers
    pub fn from_config(config: Config) -> Self {
        let config = Arc::new(config);
        let factory = Arc::new(ConfigAgentFactory::new(Arc::clone(&config)));
        Self::new(config, factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_shares_one_config() {
        let mut config = Config::default();
        config.llm.model = "shared-model".to_string();
        let state = AppState::from_config(config);

        // Held by the state and by the agent factory
        assert_eq!(Arc::strong_count(&state.config), 2);
        assert_eq!(state.config.llm.model, "shared-model");
    }
}
