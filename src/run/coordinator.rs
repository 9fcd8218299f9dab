//! Run Coordinator
//!
//! Drives a validate or load run: checks the directory, discovers input
//! files, hands each file to a [`FileProcessor`] on a bounded worker pool,
//! and folds the per-file outcomes into a single [`RunReport`].

use crate::config::PipelineConfig;
use crate::discovery;
use crate::error::{PipelineError, ProcessingError};
use crate::identity::IdentityDeriver;
use crate::processor::{ChangeCounts, FileOutcome, FileProcessor};
use crate::run::{FileFailure, Run, RunAction, RunReport, ViolationLog};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared interrupt flag, checked before each file.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Parameters for a validate or load run
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub action: RunAction,
    pub directory: PathBuf,
    pub max_violations: usize,
}

/// Single accumulation point for per-file outcomes.
struct RunAccumulator {
    counts: ChangeCounts,
    violations: ViolationLog,
    files_processed: usize,
    failures: Vec<FileFailure>,
    fatal: Option<PipelineError>,
}

impl RunAccumulator {
    fn new(max_violations: usize) -> Self {
        Self {
            counts: ChangeCounts::default(),
            violations: ViolationLog::new(max_violations),
            files_processed: 0,
            failures: Vec::new(),
            fatal: None,
        }
    }

    fn record_outcome(&mut self, outcome: FileOutcome) {
        self.files_processed += 1;
        self.counts += outcome.counts;
        self.violations.extend(outcome.violations);
    }

    fn record_failure(&mut self, file: &Path, err: ProcessingError) {
        self.failures.push(FileFailure {
            file: file.to_path_buf(),
            message: err.message,
        });
    }

    fn record_fatal(&mut self, err: PipelineError) {
        // First fatal error wins; later ones come from files already in flight.
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
    }

    fn files_attempted(&self) -> usize {
        self.files_processed + self.failures.len()
    }
}

/// Coordinates one validate or load run.
pub struct RunCoordinator<'a> {
    config: &'a PipelineConfig,
    ids: IdentityDeriver,
    cancel: CancellationToken,
}

impl<'a> RunCoordinator<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            ids: IdentityDeriver::new(&config.main.domain),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn identity(&self) -> &IdentityDeriver {
        &self.ids
    }

    /// Execute a validate or load run to completion.
    ///
    /// Returns the report of a `Succeeded` run. A `Failed` run returns the
    /// error that failed it; its partial counts are logged as partial and
    /// discarded.
    pub fn execute(
        &self,
        request: &RunRequest,
        processor: &dyn FileProcessor,
    ) -> Result<RunReport, PipelineError> {
        if !request.action.processes_files() {
            return Err(PipelineError::Unexpected(format!(
                "Action {} does not process files",
                request.action.name()
            )));
        }
        discovery::ensure_directory(&request.directory)?;

        let verb = request.action.verb();
        let mut run = Run::new(request.action, Some(request.directory.clone()));
        info!("{} data from \"{}\"", verb, request.directory.display());

        let files = match discovery::discover_input_files(
            &request.directory,
            &self.config.main.file_suffix,
        ) {
            Ok(files) => files,
            Err(e) => {
                run.fail()?;
                error!("{} run failed during discovery: {}", request.action.name(), e);
                return Err(e);
            }
        };
        run.start(files)?;

        if run.files().is_empty() {
            info!("No files to load.");
        }

        let acc = match self.process_files(&run, processor, request.max_violations) {
            Ok(acc) => acc,
            Err(e) => {
                run.fail()?;
                error!("{} run failed: {}", request.action.name(), e);
                return Err(e);
            }
        };

        let discovered = run.files().len();
        let failure = acc.fatal.or_else(|| {
            (self.cancel.is_cancelled() && acc.files_processed + acc.failures.len() < discovered)
                .then(|| {
                    PipelineError::Interrupted(format!(
                        "stopped after {} of {} files",
                        acc.files_processed + acc.failures.len(),
                        discovered
                    ))
                })
        });

        if let Some(err) = failure {
            run.fail()?;
            error!(
                action = request.action.name(),
                status = %run.state(),
                files_processed = acc.files_processed,
                files_discovered = discovered,
                nodes_created = acc.counts.nodes_created,
                "Run failed; partial counts discarded: {}",
                err
            );
            return Err(err);
        }

        run.succeed()?;
        let mut failures = acc.failures;
        failures.sort_by(|a, b| a.file.cmp(&b.file));
        let total_violations = acc.violations.total();
        let violations = acc.violations.into_retained();

        info!(
            action = request.action.name(),
            status = %run.state(),
            files_processed = acc.files_processed,
            files_failed = failures.len(),
            total_violations,
            "{} finished",
            verb
        );

        Ok(RunReport {
            action: request.action,
            directory: request.directory.clone(),
            status: run.state(),
            started_at: run.started_at(),
            finished_at: run.finished_at(),
            files_discovered: discovered,
            files_processed: acc.files_processed,
            files_failed: failures.len(),
            counts: acc.counts,
            max_violations: request.max_violations,
            total_violations,
            violations,
            failures,
        })
    }

    fn process_files(
        &self,
        run: &Run,
        processor: &dyn FileProcessor,
        max_violations: usize,
    ) -> Result<RunAccumulator, PipelineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.main.workers.max(1))
            .build()
            .map_err(|e| PipelineError::Unexpected(format!("Failed to start worker pool: {}", e)))?;

        let acc = Mutex::new(RunAccumulator::new(max_violations));
        let verb = run.action().verb();

        pool.install(|| {
            run.files().par_iter().for_each(|file| {
                if self.cancel.is_cancelled() || acc.lock().fatal.is_some() {
                    return;
                }
                info!("{} file: \"{}\"", verb, file.display());

                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    processor.process(file, &self.ids)
                }));

                let mut acc = acc.lock();
                match result {
                    Ok(Ok(outcome)) => acc.record_outcome(outcome),
                    Ok(Err(err)) if err.fatal => {
                        error!("Fatal error processing \"{}\": {}", file.display(), err);
                        acc.record_fatal(PipelineError::ProcessingFailed {
                            file: file.display().to_string(),
                            message: err.message,
                        });
                    }
                    Ok(Err(err)) => {
                        warn!("Failed to process \"{}\": {}", file.display(), err);
                        acc.record_failure(file, err);
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!("Unexpected error processing \"{}\": {}", file.display(), message);
                        acc.record_fatal(PipelineError::Unexpected(format!(
                            "{}: {}",
                            file.display(),
                            message
                        )));
                    }
                }
            });
        });

        let acc = acc.into_inner();
        tracing::debug!(attempted = acc.files_attempted(), "Worker pool drained");
        Ok(acc)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "processor panicked".to_string()
    }
}
