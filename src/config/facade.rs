//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::{PipelineConfig, CONFIG_FILE_ENV_VAR, DEFAULT_CONFIG_FILE};
use crate::error::PipelineError;
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the config file path with precedence: CLI, ICDC_DATA_LOADER_CONFIG env, default.
    pub fn resolve_path(cli_path: Option<PathBuf>) -> PathBuf {
        if let Some(p) = cli_path {
            if !p.as_os_str().is_empty() {
                return p;
            }
        }
        if let Ok(env_path) = std::env::var(CONFIG_FILE_ENV_VAR) {
            if !env_path.is_empty() {
                return PathBuf::from(env_path);
            }
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load and validate configuration from a resolved path.
    pub fn load(cli_path: Option<PathBuf>) -> Result<PipelineConfig, PipelineError> {
        let path = Self::resolve_path(cli_path);
        Self::load_from_file(&path)
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<PipelineConfig, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::ConfigError(format!(
                "Can't find configuration file {}! Make a copy of config.sample.ini to config.ini \
                 or specify config file in environment variable {}",
                path.display(),
                CONFIG_FILE_ENV_VAR
            )));
        }
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
