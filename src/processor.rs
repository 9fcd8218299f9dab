//! Per-file processor contract.
//!
//! The schema validator (`validate`) and the graph store writer (`load`) live
//! outside this crate. They plug into a run through [`FileProcessor`] and get
//! the run's [`IdentityDeriver`] for any node identifiers they need.

use crate::error::ProcessingError;
use crate::identity::IdentityDeriver;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

/// Counts of graph mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub nodes_created: u64,
    pub nodes_updated: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_updated: u64,
    pub relationships_deleted: u64,
}

impl AddAssign for ChangeCounts {
    fn add_assign(&mut self, other: Self) {
        self.nodes_created += other.nodes_created;
        self.nodes_updated += other.nodes_updated;
        self.nodes_deleted += other.nodes_deleted;
        self.relationships_created += other.relationships_created;
        self.relationships_updated += other.relationships_updated;
        self.relationships_deleted += other.relationships_deleted;
    }
}

/// A single data-validity problem found in an input file.
///
/// Ordered by `(file, line, message)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Violation {
    pub file: PathBuf,
    /// 1-based line number, when the processor knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    pub message: String,
}

impl Violation {
    pub fn new(file: impl Into<PathBuf>, line: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

/// Result of processing one file.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub counts: ChangeCounts,
    pub violations: Vec<Violation>,
}

/// Processes one input file on behalf of a run.
///
/// Called from worker threads; implementations must not rely on file order.
pub trait FileProcessor: Send + Sync {
    fn process(&self, file: &Path, ids: &IdentityDeriver) -> Result<FileOutcome, ProcessingError>;
}

impl<F> FileProcessor for F
where
    F: Fn(&Path, &IdentityDeriver) -> Result<FileOutcome, ProcessingError> + Send + Sync,
{
    fn process(&self, file: &Path, ids: &IdentityDeriver) -> Result<FileOutcome, ProcessingError> {
        self(file, ids)
    }
}

/// Stand-in used when no validator or store writer is attached: touches no
/// records and reports an empty outcome for every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProcessor;

impl FileProcessor for NoopProcessor {
    fn process(&self, file: &Path, _ids: &IdentityDeriver) -> Result<FileOutcome, ProcessingError> {
        tracing::debug!(file = %file.display(), "No processor attached; skipping records");
        Ok(FileOutcome::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_counts_accumulate() {
        let mut total = ChangeCounts::default();
        total += ChangeCounts {
            nodes_created: 2,
            relationships_created: 1,
            ..ChangeCounts::default()
        };
        total += ChangeCounts {
            nodes_created: 3,
            nodes_deleted: 1,
            ..ChangeCounts::default()
        };
        assert_eq!(total.nodes_created, 5);
        assert_eq!(total.nodes_deleted, 1);
        assert_eq!(total.relationships_created, 1);
    }

    #[test]
    fn test_closure_is_a_processor() {
        let processor = |_: &Path, ids: &IdentityDeriver| {
            let _ = ids.derive("case", "CASE-001");
            Ok::<_, ProcessingError>(FileOutcome {
                counts: ChangeCounts {
                    nodes_created: 1,
                    ..ChangeCounts::default()
                },
                violations: Vec::new(),
            })
        };
        let ids = IdentityDeriver::new("icdc-data.org");
        let outcome = processor.process(Path::new("cases.txt"), &ids).unwrap();
        assert_eq!(outcome.counts.nodes_created, 1);
    }

    #[test]
    fn test_noop_processor_is_empty() {
        let ids = IdentityDeriver::new("icdc-data.org");
        let outcome = NoopProcessor.process(Path::new("a.txt"), &ids).unwrap();
        assert_eq!(outcome.counts, ChangeCounts::default());
        assert!(outcome.violations.is_empty());
    }
}
