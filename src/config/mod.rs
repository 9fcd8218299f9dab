//! Pipeline configuration.
//!
//! A single [`PipelineConfig`] is built once at process entry and passed by
//! reference to everything that needs it.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::PipelineError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const CONFIG_FILE_ENV_VAR: &str = "ICDC_DATA_LOADER_CONFIG";

/// Configuration file used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub main: MainConfig,

    #[serde(default)]
    pub log: LoggingConfig,
}

/// `[main]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainConfig {
    /// Namespace domain rooting all node identifiers. Changing it re-keys every node.
    #[serde(default)]
    pub domain: String,

    /// Scratch directory for collaborators that stage intermediate files
    #[serde(default = "default_temp_folder")]
    pub temp_folder: PathBuf,

    /// Accepted input file suffix, without the leading dot
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,

    /// Worker threads used for per-file processing
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Environment variable holding the password
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

fn default_temp_folder() -> PathBuf {
    PathBuf::from("tmp")
}

fn default_file_suffix() -> String {
    "txt".to_string()
}

fn default_workers() -> usize {
    4
}

fn default_password_env() -> String {
    "ICDC_PASSWORD".to_string()
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            temp_folder: default_temp_folder(),
            file_suffix: default_file_suffix(),
            workers: default_workers(),
            password_env: default_password_env(),
        }
    }
}

impl PipelineConfig {
    /// Validate values that deserialization alone cannot check.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.main.domain.trim().is_empty() {
            return Err(PipelineError::ConfigError(
                "main.domain must be set to the namespace domain".to_string(),
            ));
        }
        if self.main.file_suffix.trim().is_empty() {
            return Err(PipelineError::ConfigError(
                "main.file_suffix cannot be empty".to_string(),
            ));
        }
        if self.main.password_env.trim().is_empty() {
            return Err(PipelineError::ConfigError(
                "main.password_env cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
