//! Built-in defaults seeded into every config builder.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("main.temp_folder", "tmp")?
        .set_default("main.file_suffix", "txt")?
        .set_default("main.workers", 4)?
        .set_default("main.password_env", "ICDC_PASSWORD")?
        .set_default("log.log_level", "INFO")
}
