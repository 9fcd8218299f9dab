//! Tooling & Integration Layer
//!
//! Command-line surface of the data pipeline.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
