//! ICDC Data Pipeline
//!
//! Command-line front end that validates and loads tabular data files into
//! the ICDC graph store, with deterministic name-based node identifiers.

pub mod config;
pub mod credentials;
pub mod discovery;
pub mod error;
pub mod format;
pub mod identity;
pub mod jobs;
pub mod logging;
pub mod processor;
pub mod run;
pub mod tooling;
pub mod types;
