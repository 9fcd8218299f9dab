//! Job queries
//!
//! Read-only view over previously submitted runs. Job history is kept by an
//! external tracking service; [`JobTracker`] is the read contract this crate
//! relies on.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status of a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Validating,
    ValidationFailed,
    LoadSucceeded,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Validating => "Validating",
            JobStatus::ValidationFailed => "Validation failed",
            JobStatus::LoadSucceeded => "Load succeeded",
        };
        f.write_str(s)
    }
}

/// A job id with its current status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: String,
    pub status: JobStatus,
}

/// Read contract of the job tracking service.
pub trait JobTracker: Send + Sync {
    /// All known jobs, ordered by job id.
    fn list_jobs(&self) -> Result<Vec<JobRecord>, PipelineError>;

    /// Status of one job; `NotFound` if the id is unknown.
    fn job_status(&self, job_id: &str) -> Result<JobStatus, PipelineError>;
}

/// Job tracker held in memory, ordered by job id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobTracker {
    jobs: BTreeMap<String, JobStatus>,
}

impl InMemoryJobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker preloaded with the demonstration jobs shown by the CLI.
    pub fn with_sample_jobs() -> Self {
        let mut tracker = Self::new();
        tracker.insert("0001", JobStatus::Validating);
        tracker.insert("0002", JobStatus::LoadSucceeded);
        tracker.insert("0003", JobStatus::ValidationFailed);
        tracker
    }

    pub fn insert(&mut self, job_id: impl Into<String>, status: JobStatus) {
        self.jobs.insert(job_id.into(), status);
    }
}

impl JobTracker for InMemoryJobTracker {
    fn list_jobs(&self) -> Result<Vec<JobRecord>, PipelineError> {
        Ok(self
            .jobs
            .iter()
            .map(|(job_id, status)| JobRecord {
                job_id: job_id.clone(),
                status: *status,
            })
            .collect())
    }

    fn job_status(&self, job_id: &str) -> Result<JobStatus, PipelineError> {
        self.jobs
            .get(job_id)
            .copied()
            .ok_or_else(|| PipelineError::NotFound(format!("Job {} not found", job_id)))
    }
}
