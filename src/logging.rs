//! Logging System
//!
//! Structured logging using the `tracing` crate. The level comes from the
//! `DL_LOG_LEVEL` environment variable when set, otherwise from the `[log]`
//! config section. Logs go to stderr by default so stdout carries only reports.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable overriding the configured log level.
pub const LOG_LEVEL_ENV_VAR: &str = "DL_LOG_LEVEL";

/// Environment variable overriding the configured log format.
pub const LOG_FORMAT_ENV_VAR: &str = "ICDC_LOG_FORMAT";

/// Logging configuration (`[log]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: TRACE, DEBUG, INFO, WARNING, ERROR, CRITICAL, OFF (case-insensitive)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr (default: stderr)
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            log_level: default_log_level(),
            format: default_format(),
            output: default_output(),
            color: default_true(),
        }
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (DL_LOG_LEVEL, ICDC_LOG_FORMAT)
/// 2. Configuration file
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), PipelineError> {
    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink))
            .try_init()
            .map_err(|e| PipelineError::ConfigError(format!("Failed to init logging: {}", e)));
    }

    let level = std::env::var(LOG_LEVEL_ENV_VAR)
        .ok()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| config.log_level.clone());
    let filter = EnvFilter::new(normalize_level(&level)?);
    let format = determine_format(config)?;
    let writer = match config.output.as_str() {
        "stdout" => BoxMakeWriter::new(std::io::stdout),
        "stderr" => BoxMakeWriter::new(std::io::stderr),
        other => {
            return Err(PipelineError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout' or 'stderr')",
                other
            )))
        }
    };

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| PipelineError::ConfigError(format!("Failed to init logging: {}", e)))
}

/// Map a level name, including the Python logging spellings, to a tracing directive.
pub fn normalize_level(level: &str) -> Result<&'static str, PipelineError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" | "critical" | "fatal" => Ok("error"),
        "off" => Ok("off"),
        other => Err(PipelineError::ConfigError(format!(
            "Invalid log level: {}",
            other
        ))),
    }
}

/// Determine output format from config or environment
fn determine_format(config: &LoggingConfig) -> Result<String, PipelineError> {
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV_VAR) {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.format.as_str();
    if format != "json" && format != "text" {
        return Err(PipelineError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.format, "text");
        assert_eq!(config.output, "stderr");
        assert!(config.color);
    }

    #[test]
    fn test_normalize_python_levels() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level("WARNING").unwrap(), "warn");
        assert_eq!(normalize_level("CRITICAL").unwrap(), "error");
        assert_eq!(normalize_level(" debug ").unwrap(), "debug");
        assert!(normalize_level("chatty").is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        };
        if std::env::var(LOG_FORMAT_ENV_VAR).is_err() {
            assert!(determine_format(&config).is_err());
        }
    }
}
