use crate::{
    llm::{LLMClient, Provider},
    research::{
        jobs::{JobRegistry, JobStatus, JobUpdate},
        prompt::{PromptStage, PromptTemplate},
        prompts,
    },
    tools::search::{SearchProvider, TavilySearch},
    types::{AppError, Result},
    utils::config::Config,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinSet};
use tracing::Instrument;

/// Everything one pipeline run needs
pub struct ResearchAgents {
    pub search: Arc<dyn SearchProvider>,
    pub researcher: PromptStage,
    pub summarizer: PromptStage,
    pub critic: PromptStage,
    pub writer: PromptStage,
}

/// Builds a fresh set of agents for each job
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn create_agents(&self) -> Result<ResearchAgents>;
}

/// Builds agents from the server configuration
pub struct ConfigAgentFactory {
    config: Arc<Config>,
}

impl ConfigAgentFactory {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// The four stage templates, applying any configured overrides
    pub fn templates(&self) -> Result<[PromptTemplate; 4]> {
        let overrides = &self.config.prompts;
        let pick = |custom: &Option<String>, default: &'static str| -> String {
            custom.clone().unwrap_or_else(|| default.to_string())
        };

        Ok([
            PromptTemplate::new(
                "researcher",
                &pick(&overrides.researcher, prompts::RESEARCHER_TEMPLATE),
            )?,
            PromptTemplate::new(
                "summarizer",
                &pick(&overrides.summarizer, prompts::SUMMARIZER_TEMPLATE),
            )?,
            PromptTemplate::new("critic", &pick(&overrides.critic, prompts::CRITIC_TEMPLATE))?,
            PromptTemplate::new("writer", &pick(&overrides.writer, prompts::WRITER_TEMPLATE))?,
        ])
    }
}

#[async_trait]
impl AgentFactory for ConfigAgentFactory {
    async fn create_agents(&self) -> Result<ResearchAgents> {
        let credentials = &self.config.credentials;
        if !self.config.api_keys_configured() {
            return Err(AppError::Config(
                "API keys not found in environment variables".to_string(),
            ));
        }
        let tavily_key = credentials
            .tavily_api_key
            .clone()
            .ok_or_else(|| AppError::Config("TAVILY_API_KEY is not set".to_string()))?;

        let provider = Provider::from_config(&self.config)?;
        tracing::debug!(
            provider = provider.name(),
            model = provider.model(),
            "Creating LLM client"
        );
        let llm: Arc<dyn LLMClient> = Arc::from(provider.create_client().await?);
        let search: Arc<dyn SearchProvider> =
            Arc::new(TavilySearch::new(tavily_key, self.config.search.clone()));

        let [researcher, summarizer, critic, writer] = self.templates()?;

        Ok(ResearchAgents {
            search,
            researcher: PromptStage::new(researcher, Arc::clone(&llm)),
            summarizer: PromptStage::new(summarizer, Arc::clone(&llm)),
            critic: PromptStage::new(critic, Arc::clone(&llm)),
            writer: PromptStage::new(writer, llm),
        })
    }
}

/// Drives one research job through search and the four prompt stages
pub struct ResearchCoordinator {
    jobs: Arc<JobRegistry>,
    factory: Arc<dyn AgentFactory>,
}

impl ResearchCoordinator {
    pub fn new(jobs: Arc<JobRegistry>, factory: Arc<dyn AgentFactory>) -> Self {
        Self { jobs, factory }
    }

    /// Run the pipeline for `job_id` to a terminal state.
    ///
    /// Never returns an error: any failure is recorded on the job.
    pub async fn run(&self, job_id: &str, query: &str) {
        let span = tracing::info_span!("research", job_id = %job_id);

        async {
            tracing::info!("Starting research pipeline");
            match self.execute(job_id, query).await {
                Ok(report) => {
                    self.record(job_id, JobUpdate::completed(report));
                    tracing::info!("Research completed");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Research failed");
                    self.record(job_id, JobUpdate::failed(e.to_string()));
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, job_id: &str, query: &str) -> Result<String> {
        self.advance(job_id, JobStatus::Initializing, 0, "Setting up AI agents...");
        let agents = self.factory.create_agents().await?;
        tracing::info!("Agents initialized");

        self.advance(
            job_id,
            JobStatus::Searching,
            25,
            "Conducting advanced web search...",
        );
        let search_results = agents.search.search(query).await?;
        tracing::info!(chars = search_results.len(), "Search completed");

        let research_data = agents
            .researcher
            .invoke(&HashMap::from([
                ("query", query),
                ("search_results", search_results.as_str()),
            ]))
            .await?;
        tracing::info!("Research stage completed");

        self.advance(
            job_id,
            JobStatus::Summarizing,
            50,
            "Processing and summarizing information...",
        );
        let summary = agents
            .summarizer
            .invoke(&HashMap::from([("research_content", research_data.as_str())]))
            .await?;
        tracing::info!("Summarizer stage completed");

        self.advance(
            job_id,
            JobStatus::Critiquing,
            75,
            "Fact-checking and verification...",
        );
        let critique = agents
            .critic
            .invoke(&HashMap::from([("summary_content", summary.as_str())]))
            .await?;
        tracing::info!("Critic stage completed");

        self.advance(job_id, JobStatus::Writing, 90, "Generating final report...");
        let final_report = agents
            .writer
            .invoke(&HashMap::from([
                ("research_data", research_data.as_str()),
                ("summary", summary.as_str()),
                ("critique", critique.as_str()),
            ]))
            .await?;
        tracing::info!("Writer stage completed");

        Ok(final_report)
    }

    fn advance(&self, job_id: &str, status: JobStatus, progress: u8, message: &str) {
        tracing::info!(status = %status, progress, "{}", message);
        self.record(job_id, JobUpdate::stage(status, progress, message));
    }

    fn record(&self, job_id: &str, update: JobUpdate) {
        if let Err(e) = self.jobs.update(job_id, update) {
            tracing::warn!(error = %e, "Dropped job update");
        }
    }
}

/// Join handles for fire-and-forget background work
///
/// Requests never wait on these; the server drains them at shutdown.
#[derive(Default)]
pub struct BackgroundTasks {
    set: Mutex<JoinSet<()>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task`, reaping handles of tasks that already finished
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut set = self.set.lock();
        while let Some(finished) = set.try_join_next() {
            if let Err(e) = finished {
                tracing::error!(error = %e, "Background task panicked");
            }
        }
        set.spawn(task);
    }

    /// Tasks spawned and not yet reaped
    pub fn len(&self) -> usize {
        self.set.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.lock().is_empty()
    }

    /// Wait up to `grace` for running tasks, then abort the rest.
    /// Returns the number of tasks that were aborted.
    pub async fn shutdown(&self, grace: Duration) -> usize {
        let mut set = std::mem::take(&mut *self.set.lock());

        let drained = tokio::time::timeout(grace, async {
            while let Some(finished) = set.join_next().await {
                if let Err(e) = finished {
                    tracing::error!(error = %e, "Background task panicked");
                }
            }
        })
        .await;

        match drained {
            Ok(()) => 0,
            Err(_) => {
                let remaining = set.len();
                tracing::warn!(remaining, "Aborting unfinished research jobs");
                set.shutdown().await;
                remaining
            }
        }
    }
}

/// Aborts the wrapped task when dropped
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Launch `coordinator.run` for a freshly created job on a tracked task.
///
/// The pipeline runs on its own task so a panic anywhere inside it still
/// leaves the job in `error`. Aborting the tracked task aborts the pipeline.
pub fn spawn_research(
    tasks: &BackgroundTasks,
    coordinator: Arc<ResearchCoordinator>,
    job_id: String,
    query: String,
) {
    tasks.spawn(async move {
        let pipeline = {
            let (coordinator, job_id) = (Arc::clone(&coordinator), job_id.clone());
            tokio::spawn(async move { coordinator.run(&job_id, &query).await })
        };
        let _guard = AbortOnDrop(pipeline.abort_handle());

        if let Err(e) = pipeline.await {
            if e.is_panic() {
                tracing::error!(job_id = %job_id, "Research task panicked");
                coordinator.record(&job_id, JobUpdate::failed("Research task panicked"));
            }
        }
    });
}
