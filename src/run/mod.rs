//! Pipeline runs
//!
//! A [`Run`] is one invocation of the pipeline for one action. It moves
//! `Created -> Running -> {Succeeded, Failed}`; job queries skip `Running`.

pub mod coordinator;

pub use coordinator::{CancellationToken, RunCoordinator, RunRequest};

use crate::error::PipelineError;
use crate::processor::{ChangeCounts, Violation};
use crate::types::{JOB_STATUS_ACTION, LIST_JOBS_ACTION, LOAD_ACTION, VALIDATE_ACTION};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use std::path::PathBuf;

/// Action selected for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAction {
    ListJobs,
    JobStatus,
    Validate,
    Load,
}

impl RunAction {
    /// Subcommand name
    pub fn name(&self) -> &'static str {
        match self {
            RunAction::ListJobs => LIST_JOBS_ACTION,
            RunAction::JobStatus => JOB_STATUS_ACTION,
            RunAction::Validate => VALIDATE_ACTION,
            RunAction::Load => LOAD_ACTION,
        }
    }

    /// Present participle used in log lines ("Validating file: ...")
    pub fn verb(&self) -> &'static str {
        match self {
            RunAction::ListJobs => "Listing jobs",
            RunAction::JobStatus => "Querying job status",
            RunAction::Validate => "Validating",
            RunAction::Load => "Loading",
        }
    }

    /// Whether the action processes input files.
    pub fn processes_files(&self) -> bool {
        matches!(self, RunAction::Validate | RunAction::Load)
    }
}

/// Lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Created,
    Running,
    Succeeded,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Created => "Created",
            RunState::Running => "Running",
            RunState::Succeeded => "Succeeded",
            RunState::Failed => "Failed",
        };
        f.write_str(s)
    }
}

/// One pipeline invocation.
#[derive(Debug, Clone)]
pub struct Run {
    action: RunAction,
    directory: Option<PathBuf>,
    state: RunState,
    files: Vec<PathBuf>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Run {
    pub fn new(action: RunAction, directory: Option<PathBuf>) -> Self {
        Self {
            action,
            directory,
            state: RunState::Created,
            files: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn action(&self) -> RunAction {
        self.action
    }

    pub fn directory(&self) -> Option<&PathBuf> {
        self.directory.as_ref()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// `Created -> Running` with the discovered input files.
    pub fn start(&mut self, files: Vec<PathBuf>) -> Result<(), PipelineError> {
        if self.state != RunState::Created || !self.action.processes_files() {
            return Err(self.illegal_transition(RunState::Running));
        }
        self.files = files;
        self.state = RunState::Running;
        Ok(())
    }

    /// `Created -> Succeeded` for job queries, which process no files.
    pub fn complete_query(&mut self) -> Result<(), PipelineError> {
        if self.state != RunState::Created || self.action.processes_files() {
            return Err(self.illegal_transition(RunState::Succeeded));
        }
        self.finish(RunState::Succeeded);
        Ok(())
    }

    /// `Running -> Succeeded`
    pub fn succeed(&mut self) -> Result<(), PipelineError> {
        if self.state != RunState::Running {
            return Err(self.illegal_transition(RunState::Succeeded));
        }
        self.finish(RunState::Succeeded);
        Ok(())
    }

    /// Any non-terminal state `-> Failed`
    pub fn fail(&mut self) -> Result<(), PipelineError> {
        if self.state.is_terminal() {
            return Err(self.illegal_transition(RunState::Failed));
        }
        self.finish(RunState::Failed);
        Ok(())
    }

    fn finish(&mut self, state: RunState) {
        self.state = state;
        self.finished_at = Some(Utc::now());
    }

    fn illegal_transition(&self, to: RunState) -> PipelineError {
        PipelineError::Unexpected(format!(
            "Illegal run transition for {}: {} -> {}",
            self.action.name(),
            self.state,
            to
        ))
    }
}

/// Violations retained up to a display limit; the rest are only counted.
///
/// Keeps the `limit` smallest violations by `(file, line, message)`, so the
/// retained set is independent of the order violations arrive in.
#[derive(Debug, Clone, Default)]
pub struct ViolationLog {
    limit: usize,
    retained: BinaryHeap<Violation>,
    total: u64,
}

impl ViolationLog {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            retained: BinaryHeap::with_capacity(limit),
            total: 0,
        }
    }

    pub fn push(&mut self, violation: Violation) {
        self.total += 1;
        if self.limit == 0 {
            return;
        }
        if self.retained.len() < self.limit {
            self.retained.push(violation);
        } else if let Some(mut largest) = self.retained.peek_mut() {
            if violation < *largest {
                *largest = violation;
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = Violation>>(&mut self, violations: I) {
        for violation in violations {
            self.push(violation);
        }
    }

    /// Retained violations in ascending `(file, line, message)` order.
    pub fn retained(&self) -> Vec<Violation> {
        self.retained.clone().into_sorted_vec()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn into_retained(self) -> Vec<Violation> {
        self.retained.into_sorted_vec()
    }
}

/// A file whose processing failed without failing the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: PathBuf,
    pub message: String,
}

/// Final summary of a completed validate or load run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub action: RunAction,
    pub directory: PathBuf,
    pub status: RunState,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub counts: ChangeCounts,
    pub max_violations: usize,
    pub total_violations: u64,
    pub violations: Vec<Violation>,
    pub failures: Vec<FileFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(n: u64) -> Violation {
        Violation::new("cases.txt", Some(n), format!("bad value on line {}", n))
    }

    #[test]
    fn test_violation_log_bounds_retained() {
        let mut log = ViolationLog::new(5);
        log.extend((1..=15).map(violation));
        assert_eq!(log.total(), 15);
        assert_eq!(log.retained().len(), 5);
        assert_eq!(log.retained()[0].line, Some(1));
    }

    #[test]
    fn test_violation_log_keeps_smallest_regardless_of_arrival() {
        let mut forward = ViolationLog::new(2);
        forward.extend([
            Violation::new("a.txt", Some(1), "x"),
            Violation::new("b.txt", Some(1), "x"),
            Violation::new("c.txt", Some(1), "x"),
        ]);
        let mut backward = ViolationLog::new(2);
        backward.extend([
            Violation::new("c.txt", Some(1), "x"),
            Violation::new("b.txt", Some(1), "x"),
            Violation::new("a.txt", Some(1), "x"),
        ]);
        assert_eq!(forward.retained(), backward.retained());
        let files: Vec<PathBuf> = forward.into_retained().into_iter().map(|v| v.file).collect();
        assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(backward.total(), 3);
    }

    #[test]
    fn test_violation_log_zero_limit_counts_only() {
        let mut log = ViolationLog::new(0);
        log.push(violation(1));
        assert_eq!(log.total(), 1);
        assert!(log.retained().is_empty());
    }

    #[test]
    fn test_file_run_lifecycle() {
        let mut run = Run::new(RunAction::Load, Some(PathBuf::from("/data")));
        assert_eq!(run.state(), RunState::Created);
        run.start(vec![PathBuf::from("/data/a.txt")]).unwrap();
        assert_eq!(run.state(), RunState::Running);
        assert_eq!(run.files().len(), 1);
        run.succeed().unwrap();
        assert_eq!(run.state(), RunState::Succeeded);
        assert!(run.finished_at().is_some());
        assert!(run.fail().is_err());
    }

    #[test]
    fn test_query_run_skips_running() {
        let mut run = Run::new(RunAction::ListJobs, None);
        assert!(run.start(Vec::new()).is_err());
        run.complete_query().unwrap();
        assert_eq!(run.state(), RunState::Succeeded);
    }

    #[test]
    fn test_file_run_cannot_complete_as_query() {
        let mut run = Run::new(RunAction::Validate, Some(PathBuf::from("/data")));
        assert!(run.complete_query().is_err());
        assert!(run.succeed().is_err());
        run.fail().unwrap();
        assert_eq!(run.state(), RunState::Failed);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(RunAction::ListJobs.name(), "ls");
        assert_eq!(RunAction::JobStatus.name(), "status");
        assert_eq!(RunAction::Validate.verb(), "Validating");
        assert_eq!(RunAction::Load.verb(), "Loading");
    }
}
