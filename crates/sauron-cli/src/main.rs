//! Sauron CLI
//!
//! Command-line interface for authenticating against and querying the Sauron AI gateway.

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Pick up SAURON_* variables from a local .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json);

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is::<output::Reported>() {
                output::error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing based on verbosity and format.
///
/// `RUST_LOG` wins over `-v` when set. Logs go to stderr so streamed output
/// on stdout stays clean.
fn init_tracing(verbose: u8, json: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sauron={level},sauron_sdk={level}")));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose > 1))
            .init();
    }
}
