//! CLI argument definitions using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Sauron - authenticate against AI providers and query them through the gateway
#[derive(Parser, Debug)]
#[command(name = "sauron")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Gateway server URL
    #[arg(short = 'u', long, env = "SAURON_BASE_URL", default_value = "http://localhost:3000", global = true)]
    pub url: String,

    /// Gateway token from a previous login
    #[arg(short = 't', long, env = "SAURON_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SAURON_TIMEOUT_SECS", default_value = "120", global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check gateway health
    Health(commands::health::HealthArgs),

    /// Exchange a provider API key for a gateway token
    Login(commands::auth::LoginArgs),

    /// Exchange the current token for a fresh one
    Refresh,

    /// Send a query to an AI provider
    #[command(visible_alias = "ask")]
    Query(commands::query::QueryArgs),

    /// Ask for an algorithm with a complexity analysis
    Algorithm(commands::query::AlgorithmArgs),
}

impl Cli {
    /// Build an SDK client from the global flags.
    pub fn client(&self) -> Result<sauron_sdk::Client> {
        let mut builder = sauron_sdk::Client::builder()
            .base_url(&self.url)
            .timeout(std::time::Duration::from_secs(self.timeout));

        if let Some(token) = &self.token {
            builder = builder.token(token);
        }

        Ok(builder.build()?)
    }

    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        let mut client = self.client()?;
        tracing::debug!(url = %self.url, authenticated = client.is_authenticated(), "using gateway");

        match self.command {
            Commands::Health(args) => commands::health::execute(args, &mut client, self.json).await,
            Commands::Login(args) => commands::auth::login(args, &mut client, self.json).await,
            Commands::Refresh => commands::auth::refresh(&mut client, self.json).await,
            Commands::Query(args) => commands::query::execute(args, &mut client, self.json).await,
            Commands::Algorithm(args) => commands::query::algorithm(args, &mut client, self.json).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_with_flags() {
        let cli = Cli::try_parse_from([
            "sauron", "--url", "http://gw:3000", "--token", "abc", "query", "Hello", "--provider",
            "anthropic", "--stream",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://gw:3000");
        assert_eq!(cli.token.as_deref(), Some("abc"));
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.prompt.as_deref(), Some("Hello"));
                assert_eq!(args.common.provider, sauron_sdk::Provider::Anthropic);
                assert!(args.stream);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_client_carries_token() {
        let cli = Cli::try_parse_from(["sauron", "--token", "abc", "refresh"]).unwrap();
        let client = cli.client().unwrap();
        assert!(client.is_authenticated());
    }
}
