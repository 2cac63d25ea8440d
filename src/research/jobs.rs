//! In-memory job registry
//!
//! Every research request owns one [`Job`] for the lifetime of the process.
//! Pollers read snapshots; the single orchestrator task working on a job is
//! the only writer, and it mutates the record exclusively through
//! [`JobRegistry::update`].

use crate::types::{AppError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a research job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Initializing,
    Searching,
    Summarizing,
    Critiquing,
    Writing,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Initializing => "initializing",
            JobStatus::Searching => "searching",
            JobStatus::Summarizing => "summarizing",
            JobStatus::Critiquing => "critiquing",
            JobStatus::Writing => "writing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress record for one research request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub query: String,
    pub result: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    fn new(id: String, query: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Initializing,
            progress: 0,
            message: "Initializing AI Research Agents...".to_string(),
            query,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

/// Partial update merged into a [`Job`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    status: Option<JobStatus>,
    progress: Option<u8>,
    message: Option<String>,
    result: Option<String>,
    error: Option<String>,
}

impl JobUpdate {
    /// Move to a non-terminal pipeline stage
    pub fn stage(status: JobStatus, progress: u8, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            progress: Some(progress),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn completed(report: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            progress: Some(100),
            message: Some("Research completed successfully!".to_string()),
            result: Some(report.into()),
            error: None,
        }
    }

    /// Progress is left at the last checkpoint reached
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            status: Some(JobStatus::Error),
            progress: None,
            message: Some(format!("Research failed: {}", error)),
            result: None,
            error: Some(error),
        }
    }
}

/// Process-wide job store
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh job and return its id
    pub fn create(&self, query: impl Into<String>) -> String {
        let id = format!(
            "research_{}_{}",
            Utc::now().timestamp(),
            Uuid::new_v4().simple()
        );
        let job = Job::new(id.clone(), query.into());
        self.jobs.write().insert(id.clone(), job);
        id
    }

    /// Snapshot of a job
    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs.read().get(id).cloned()
    }

    /// Merge `update` into the job.
    ///
    /// # Errors
    ///
    /// [`AppError::Internal`] if the id is unknown or the job already reached
    /// a terminal state.
    pub fn update(&self, id: &str, update: JobUpdate) -> Result<()> {
        let mut jobs = self.jobs.write();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| AppError::Internal(format!("Unknown research job '{}'", id)))?;

        if job.status.is_terminal() {
            return Err(AppError::Internal(format!(
                "Research job '{}' is already {}",
                id, job.status
            )));
        }

        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(progress) = update.progress {
            job.progress = job.progress.max(progress.min(100));
        }
        if let Some(message) = update.message {
            job.message = message;
        }

        match job.status {
            JobStatus::Completed => {
                job.result = Some(update.result.unwrap_or_default());
                job.error = None;
            }
            JobStatus::Error => {
                job.error = Some(update.error.unwrap_or_else(|| "Unknown error".to_string()));
                job.result = None;
            }
            _ => {}
        }

        job.updated_at = Utc::now();
        Ok(())
    }

    /// Jobs that have not reached a terminal state
    pub fn active_count(&self) -> usize {
        self.jobs
            .read()
            .values()
            .filter(|job| !job.status.is_terminal())
            .count()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}
