//! # relay-worker
//!
//! Transcript relay worker binary. Attaches to one meeting's signaling
//! channel and forwards transcripts until the channel ends.
//!
//! Exit status is 0 when the channel closes and 1 on any failure, including
//! missing or invalid arguments.

#![deny(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use relay_worker::app;
use relay_worker::cli::Cli;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    relay_core::logging::init_subscriber(&cli.log_level);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match app::run(config).await {
        Ok(outcome) => ExitCode::from(&outcome),
        Err(e) => {
            error!(error = %format!("{e:#}"), "relay worker failed");
            ExitCode::FAILURE
        }
    }
}
