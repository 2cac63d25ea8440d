//! Web search backed by the Tavily API
//!
//! One broad, domain-scoped query is followed by a few narrower follow-up
//! queries. Every response is flattened into labelled plain text that the
//! researcher prompt consumes verbatim.

use crate::types::{AppError, Result};
use crate::utils::config::SearchConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Divider placed between formatted responses
pub const SECTION_DIVIDER_WIDTH: usize = 50;
/// Delimiter placed after each individual result
pub const RESULT_DELIMITER_WIDTH: usize = 30;

/// Source of aggregated search context for a research query
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run the full query set and return one block of text.
    ///
    /// Only a failure of the primary query is an error.
    async fn search(&self, query: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
    include_answer: bool,
    include_raw_content: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    include_domains: &'a [String],
}

/// Subset of the Tavily response the formatter uses
#[derive(Debug, Default, Deserialize)]
pub struct TavilyResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TavilyResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Tavily-backed [`SearchProvider`]
pub struct TavilySearch {
    http_client: reqwest::Client,
    api_key: String,
    config: SearchConfig,
}

impl TavilySearch {
    pub fn new(api_key: String, config: SearchConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            config,
        }
    }

    /// Follow-up queries with `{query}` substituted
    pub fn follow_up_queries(&self, query: &str) -> Vec<String> {
        self.config
            .follow_up_queries
            .iter()
            .map(|template| template.replace("{query}", query))
            .collect()
    }

    async fn request(&self, body: &TavilyRequest<'_>) -> Result<TavilyResponse> {
        let url = format!("{}/search", self.config.api_base.trim_end_matches('/'));

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Tavily request failed ({}): {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<String> {
        let primary = self
            .request(&TavilyRequest {
                query,
                search_depth: &self.config.search_depth,
                max_results: self.config.max_results,
                include_answer: true,
                include_raw_content: true,
                include_domains: &self.config.include_domains,
            })
            .await
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let mut sections = vec![format_response(&primary)];

        for follow_up in self.follow_up_queries(query) {
            let request = TavilyRequest {
                query: &follow_up,
                search_depth: "basic",
                max_results: self.config.follow_up_max_results,
                include_answer: true,
                include_raw_content: false,
                include_domains: &[],
            };

            match self.request(&request).await {
                Ok(response) => sections.push(format_response(&response)),
                Err(e) => {
                    tracing::warn!(query = %follow_up, error = %e, "Follow-up search skipped");
                }
            }
        }

        tracing::debug!(sections = sections.len(), "Search completed");
        Ok(join_sections(&sections))
    }
}

/// Flatten one response into labelled lines
pub fn format_response(response: &TavilyResponse) -> String {
    let mut formatted = Vec::new();

    if let Some(answer) = response.answer.as_deref().filter(|a| !a.is_empty()) {
        formatted.push(format!("**INSIGHT:** {}\n", answer));
    }

    for (i, result) in response.results.iter().enumerate() {
        formatted.push(format!(
            "**SOURCE {}:** {}",
            i + 1,
            result.title.as_deref().unwrap_or("No title")
        ));
        formatted.push(format!(
            "**URL:** {}",
            result.url.as_deref().unwrap_or("No URL")
        ));
        formatted.push(format!(
            "**CONTENT:** {}",
            result.content.as_deref().unwrap_or("No content")
        ));
        formatted.push("-".repeat(RESULT_DELIMITER_WIDTH));
    }

    formatted.join("\n")
}

/// Join formatted sections with the fixed-width divider
pub fn join_sections(sections: &[String]) -> String {
    let divider = format!("\n\n{}\n\n", "=".repeat(SECTION_DIVIDER_WIDTH));
    sections.join(&divider)
}
