//! Health check command.

use anyhow::Result;
use clap::Args;
use sauron_sdk::Client;
use serde::Serialize;

use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the health command.
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Exit quietly, only reporting failures
    #[arg(short, long)]
    pub quiet: bool,
}

/// Health check response for output.
#[derive(Debug, Serialize)]
pub struct HealthOutput {
    pub status: String,
    pub base_url: String,
    pub response_time_ms: u64,
}

/// Execute the health command.
pub async fn execute(args: HealthArgs, client: &mut Client, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);

    let spinner = (!json && !args.quiet).then(|| output::spinner("Checking gateway health..."));
    let start = std::time::Instant::now();
    let result = client.check_health().await;
    let elapsed = start.elapsed();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(health) => {
            let health_output = HealthOutput {
                status: health.status.clone(),
                base_url: client.base_url().to_string(),
                response_time_ms: elapsed.as_millis() as u64,
            };

            match format {
                OutputFormat::Json => CommandResult::success(health_output).print(format)?,
                OutputFormat::Text if args.quiet => {}
                OutputFormat::Text => {
                    if health.is_ok() {
                        output::success("Gateway is healthy");
                    } else {
                        output::error("Gateway reported an unexpected status");
                    }
                    output::key_value("Gateway", &health_output.base_url);
                    output::key_value("Status", &health_output.status);
                    output::key_value("Response Time", &format!("{}ms", health_output.response_time_ms));
                }
            }

            if !health.is_ok() {
                return Err(output::Reported.into());
            }
        }
        Err(e) => {
            let result: CommandResult<HealthOutput> =
                CommandResult::failure(format!("Health check failed: {}", e));
            return result.fail(format);
        }
    }

    Ok(())
}
