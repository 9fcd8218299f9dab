//! Core types shared across the data pipeline.

/// NodeID: Deterministic name-based (v5) UUID of a graph node
pub type NodeID = uuid::Uuid;

/// Subcommand name for listing jobs
pub const LIST_JOBS_ACTION: &str = "ls";

/// Subcommand name for querying a job's status
pub const JOB_STATUS_ACTION: &str = "status";

/// Subcommand name for validating a data directory
pub const VALIDATE_ACTION: &str = "validate";

/// Subcommand name for loading a data directory
pub const LOAD_ACTION: &str = "load";

/// Default number of violations retained in a run report
pub const DEFAULT_MAX_VIOLATIONS: usize = 10;
