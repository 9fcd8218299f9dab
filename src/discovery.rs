//! Input file discovery
//!
//! Discovery is split in two: [`list_directory`] reads the directory once
//! (non-recursive), and [`select_input_files`] is a pure filter over that
//! listing so it can be tested without touching the filesystem.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub path: PathBuf,
    pub is_file: bool,
}

impl ListingEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_file: true,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_file: false,
        }
    }
}

/// Fail fast unless `dir` exists and is a directory.
pub fn ensure_directory(dir: &Path) -> Result<(), PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::ConfigError(format!(
            "{} is not a directory!",
            dir.display()
        )));
    }
    Ok(())
}

/// List entries directly inside `dir`.
pub fn list_directory(dir: &Path) -> Result<Vec<ListingEntry>, PipelineError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let is_file = if entry.file_type().is_symlink() {
            entry.path().is_file()
        } else {
            entry.file_type().is_file()
        };
        entries.push(ListingEntry {
            path: entry.into_path(),
            is_file,
        });
    }
    Ok(entries)
}

/// Keep regular files whose extension equals `suffix` (no leading dot), sorted by path.
pub fn select_input_files<I>(listing: I, suffix: &str) -> Vec<PathBuf>
where
    I: IntoIterator<Item = ListingEntry>,
{
    let suffix = suffix.trim_start_matches('.');
    let mut files: Vec<PathBuf> = listing
        .into_iter()
        .filter(|entry| entry.is_file)
        .filter(|entry| {
            entry
                .path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == suffix)
                .unwrap_or(false)
        })
        .map(|entry| entry.path)
        .collect();
    files.sort();
    files
}

/// List `dir` and select the accepted input files.
///
/// Callers check the directory with [`ensure_directory`] first; a directory
/// that vanishes afterwards surfaces as an I/O error.
pub fn discover_input_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, PipelineError> {
    Ok(select_input_files(list_directory(dir)?, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_select_filters_by_suffix() {
        let listing = vec![
            ListingEntry::file("/data/cases.txt"),
            ListingEntry::file("/data/notes.md"),
            ListingEntry::file("/data/studies.txt"),
            ListingEntry::file("/data/README"),
        ];
        let files = select_input_files(listing, "txt");
        assert_eq!(
            files,
            vec![
                PathBuf::from("/data/cases.txt"),
                PathBuf::from("/data/studies.txt")
            ]
        );
    }

    #[test]
    fn test_select_skips_directories_and_partial_matches() {
        let listing = vec![
            ListingEntry::dir("/data/archive.txt"),
            ListingEntry::file("/data/cases.txt.bak"),
            ListingEntry::file("/data/mytxt"),
            ListingEntry::file("/data/ok.txt"),
        ];
        assert_eq!(
            select_input_files(listing, ".txt"),
            vec![PathBuf::from("/data/ok.txt")]
        );
    }

    #[test]
    fn test_select_empty_listing() {
        assert!(select_input_files(Vec::new(), "txt").is_empty());
    }

    #[test]
    fn test_discover_is_not_recursive() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("b.txt"), "x").unwrap();

        let files = discover_input_files(temp.path(), "txt").unwrap();
        assert_eq!(files, vec![temp.path().join("a.txt")]);
    }

    #[test]
    fn test_missing_directory_is_config_error_at_check() {
        let temp = tempfile::tempdir().unwrap();
        let err = ensure_directory(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigError(_)));
    }

    #[test]
    fn test_discover_missing_directory_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = discover_input_files(&temp.path().join("nope"), "txt").unwrap_err();
        match err {
            PipelineError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_rejects_file_path() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        assert!(ensure_directory(&file).is_err());
    }
}
