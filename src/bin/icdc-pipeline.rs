//! ICDC Data Pipeline Binary
//!
//! Command-line interface for validating and loading data into ICDC.

use clap::Parser;
use icdc_pipeline::config::ConfigLoader;
use icdc_pipeline::credentials::CredentialChain;
use icdc_pipeline::logging::init_logging;
use icdc_pipeline::run::CancellationToken;
use icdc_pipeline::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = init_logging(&config.log) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(e.exit_code());
    }

    // Ctrl-C stops the run between files.
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!("Failed to install interrupt handler: {}", e);
    }

    let credentials = CredentialChain::standard(cli.password.clone(), &config.main.password_env);
    let context = CliContext::new(config).with_cancellation(cancel);

    match context.execute(&cli, &credentials) {
        Ok(output) => {
            print!("{}", output);
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}
