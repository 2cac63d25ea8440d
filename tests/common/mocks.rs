//! Mock implementations for testing.
//!
//! Mock LLM clients, search providers and agent factories shared by the
//! integration test files, so the pipeline can run without network access.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use quarry::research::{prompts, AgentFactory, PromptStage, PromptTemplate, ResearchAgents};
use quarry::types::{AppError, Result};
use quarry::{LLMClient, SearchProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Mock LLM client with a fixed response.
///
/// Records every prompt it receives. A gated client waits for a permit
/// before answering, which lets tests observe intermediate job states.
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    gate: Option<Arc<Semaphore>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            gate: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    /// Answer only after a permit is added to `gate`.
    pub fn gated(response: &str, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(response)
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Mock search provider.
pub struct MockSearch {
    response: String,
    should_fail: bool,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &str) -> Result<String> {
        self.queries.lock().push(query.to_string());
        if self.should_fail {
            return Err(AppError::Search("Search failed: quota exceeded".to_string()));
        }
        Ok(self.response.clone())
    }
}

pub const SAMPLE_REPORT: &str = "# Executive Summary\n\
Rust adoption keeps growing.\n\
## Key Players\n\
- **Ferrous Systems** builds tooling\n\
- See https://example.com/rust for details";

/// Agent factory built from mocks. Each stage gets its own client so tests
/// can fail or gate a single stage.
pub struct MockAgentFactory {
    pub search: Arc<MockSearch>,
    pub researcher: Arc<MockLLMClient>,
    pub summarizer: Arc<MockLLMClient>,
    pub critic: Arc<MockLLMClient>,
    pub writer: Arc<MockLLMClient>,
    fail_creation: bool,
    calls: AtomicUsize,
}

impl MockAgentFactory {
    pub fn new() -> Self {
        Self {
            search: Arc::new(MockSearch::new("**SOURCE 1:** Rust\n**URL:** https://example.com")),
            researcher: Arc::new(MockLLMClient::new("FACTS")),
            summarizer: Arc::new(MockLLMClient::new("SUMMARY")),
            critic: Arc::new(MockLLMClient::new("CRITIQUE")),
            writer: Arc::new(MockLLMClient::new(SAMPLE_REPORT)),
            fail_creation: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Factory whose agent construction fails, as with missing credentials.
    pub fn failing() -> Self {
        Self {
            fail_creation: true,
            ..Self::new()
        }
    }

    pub fn with_search(mut self, search: MockSearch) -> Self {
        self.search = Arc::new(search);
        self
    }

    pub fn with_stage(mut self, stage: &str, client: MockLLMClient) -> Self {
        let client = Arc::new(client);
        match stage {
            "researcher" => self.researcher = client,
            "summarizer" => self.summarizer = client,
            "critic" => self.critic = client,
            "writer" => self.writer = client,
            other => panic!("unknown stage {other}"),
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn stage(name: &str, template: &str, client: &Arc<MockLLMClient>) -> PromptStage {
    let template = PromptTemplate::new(name, template).expect("valid template");
    PromptStage::new(template, client.clone() as Arc<dyn LLMClient>)
}

#[async_trait]
impl AgentFactory for MockAgentFactory {
    async fn create_agents(&self) -> Result<ResearchAgents> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creation {
            return Err(AppError::Config(
                "API keys not found in environment variables".to_string(),
            ));
        }

        Ok(ResearchAgents {
            search: self.search.clone() as Arc<dyn SearchProvider>,
            researcher: stage("researcher", prompts::RESEARCHER_TEMPLATE, &self.researcher),
            summarizer: stage("summarizer", prompts::SUMMARIZER_TEMPLATE, &self.summarizer),
            critic: stage("critic", prompts::CRITIC_TEMPLATE, &self.critic),
            writer: stage("writer", prompts::WRITER_TEMPLATE, &self.writer),
        })
    }
}
