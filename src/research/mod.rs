//! Research Job Pipeline
//!
//! This module turns a user query into a written report and tracks progress
//! while it does so.
//!
//! # Architecture
//!
//! - [`jobs::JobRegistry`] - Process-wide map of job id to progress record
//! - [`prompt::PromptStage`] - A named template bound to an LLM client
//! - [`coordinator::ResearchCoordinator`] - Runs search then the four stages,
//!   recording each checkpoint in the registry
//! - [`coordinator::BackgroundTasks`] - Join handles for running jobs
//!
//! # Usage
//!
//! ```ignore
//! use quarry::research::coordinator::{spawn_research, ResearchCoordinator};
//!
//! let job_id = jobs.create(query.clone());
//! spawn_research(&tasks, coordinator.clone(), job_id.clone(), query);
//!
//! // later, from any request
//! let job = jobs.get(&job_id);
//! ```
//!
//! # Research Workflow
//!
//! 1. **Initializing** (0%) - Build search provider and stages
//! 2. **Searching** (25%) - Web search, then fact extraction
//! 3. **Summarizing** (50%) - Structured summary
//! 4. **Critiquing** (75%) - Accuracy review of the summary
//! 5. **Writing** (90%) - Final report
//! 6. **Completed** (100%), or **Error** from any earlier step

/// Pipeline orchestration and background task tracking.
pub mod coordinator;
/// Job records and the in-memory registry.
pub mod jobs;
/// Prompt templates and the reusable stage type.
pub mod prompt;
/// Built-in stage templates.
pub mod prompts;

pub use coordinator::{
    AgentFactory, BackgroundTasks, ConfigAgentFactory, ResearchAgents, ResearchCoordinator,
};
pub use jobs::{Job, JobRegistry, JobStatus, JobUpdate};
pub use prompt::{PromptStage, PromptTemplate};
