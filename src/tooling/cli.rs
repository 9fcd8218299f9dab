//! CLI Tooling
//!
//! Command-line interface for the data pipeline: job queries, validate, and load.

use crate::config::PipelineConfig;
use crate::credentials::{CredentialChain, Credentials};
use crate::discovery;
use crate::error::PipelineError;
use crate::format::{format_jobs_text, format_run_report_text};
use crate::jobs::{InMemoryJobTracker, JobRecord, JobTracker};
use crate::processor::{FileProcessor, NoopProcessor};
use crate::run::{CancellationToken, Run, RunAction, RunCoordinator, RunRequest};
use crate::types::DEFAULT_MAX_VIOLATIONS;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// ICDC data pipeline - validate and load data files into the graph store
#[derive(Parser)]
#[command(name = "icdc-pipeline")]
#[command(about = "Load data into ICDC")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// ICDC username
    #[arg(short = 'u', long)]
    pub user: String,

    /// ICDC password (falls back to the password environment variable, then a prompt)
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// Configuration file path (overrides ICDC_DATA_LOADER_CONFIG and ./config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List jobs
    #[command(name = "ls")]
    Ls,
    /// Query job status
    Status {
        /// Job id
        job_id: String,
    },
    /// Validate data
    Validate {
        /// Max violations to display
        #[arg(short = 'M', long, default_value_t = DEFAULT_MAX_VIOLATIONS)]
        max_violations: usize,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Data directory
        dir: PathBuf,
    },
    /// Load data
    Load {
        /// Max violations to display
        #[arg(short = 'M', long, default_value_t = DEFAULT_MAX_VIOLATIONS)]
        max_violations: usize,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Data directory
        dir: PathBuf,
    },
}

impl Commands {
    pub fn action(&self) -> RunAction {
        match self {
            Commands::Ls => RunAction::ListJobs,
            Commands::Status { .. } => RunAction::JobStatus,
            Commands::Validate { .. } => RunAction::Validate,
            Commands::Load { .. } => RunAction::Load,
        }
    }

    /// Data directory for validate and load.
    pub fn directory(&self) -> Option<&Path> {
        match self {
            Commands::Validate { dir, .. } | Commands::Load { dir, .. } => Some(dir.as_path()),
            _ => None,
        }
    }
}

/// CLI context holding the configuration and the collaborators a command needs
pub struct CliContext {
    config: PipelineConfig,
    jobs: Arc<dyn JobTracker>,
    processor: Arc<dyn FileProcessor>,
    cancel: CancellationToken,
}

impl CliContext {
    /// Create a context with the sample job tracker and no attached processor.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            jobs: Arc::new(InMemoryJobTracker::with_sample_jobs()),
            processor: Arc::new(NoopProcessor),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_job_tracker(mut self, jobs: Arc<dyn JobTracker>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_processor(mut self, processor: Arc<dyn FileProcessor>) -> Self {
        self.processor = processor;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute a CLI command.
    ///
    /// The data directory is checked before credentials are resolved, so a bad
    /// directory fails without prompting.
    pub fn execute(&self, cli: &Cli, credentials: &CredentialChain) -> Result<String, PipelineError> {
        if let Some(dir) = cli.command.directory() {
            discovery::ensure_directory(dir)?;
        }
        let credentials = credentials.resolve(&cli.user)?;
        self.execute_command(&cli.command, &credentials)
    }

    fn execute_command(
        &self,
        command: &Commands,
        credentials: &Credentials,
    ) -> Result<String, PipelineError> {
        info!(user = %credentials.user, action = command.action().name(), "Starting");
        match command {
            Commands::Ls => {
                let mut run = Run::new(RunAction::ListJobs, None);
                let jobs = self.jobs.list_jobs()?;
                run.complete_query()?;
                info!(action = run.action().name(), status = %run.state(), jobs = jobs.len(), "Job query finished");
                Ok(format_jobs_text(&jobs))
            }
            Commands::Status { job_id } => {
                let mut run = Run::new(RunAction::JobStatus, None);
                let status = self.jobs.job_status(job_id)?;
                run.complete_query()?;
                info!(action = run.action().name(), status = %run.state(), job_id = %job_id, "Job query finished");
                Ok(format_jobs_text(&[JobRecord {
                    job_id: job_id.clone(),
                    status,
                }]))
            }
            Commands::Validate {
                max_violations,
                format,
                dir,
            }
            | Commands::Load {
                max_violations,
                format,
                dir,
            } => {
                if format != "text" && format != "json" {
                    return Err(PipelineError::ConfigError(format!(
                        "Invalid output format: {} (must be 'text' or 'json')",
                        format
                    )));
                }
                let request = RunRequest {
                    action: command.action(),
                    directory: dir.clone(),
                    max_violations: *max_violations,
                };
                let coordinator =
                    RunCoordinator::new(&self.config).with_cancellation(self.cancel.clone());
                let report = coordinator.execute(&request, self.processor.as_ref())?;
                if format == "json" {
                    serde_json::to_string_pretty(&report)
                        .map(|s| s + "\n")
                        .map_err(|e| PipelineError::Unexpected(e.to_string()))
                } else {
                    Ok(format_run_report_text(&report))
                }
            }
        }
    }
}
