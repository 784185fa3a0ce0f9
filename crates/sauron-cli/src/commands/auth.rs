//! Login and token refresh commands.

use anyhow::Result;
use clap::Args;
use sauron_sdk::{Client, LoginRequest, Provider, TokenResponse};
use serde::Serialize;

use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Provider API key
    #[arg(short = 'k', long, env = "SAURON_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Provider to authenticate with (openai, anthropic, google, mistral, custom)
    #[arg(short, long, default_value = "openai")]
    pub provider: Provider,
}

/// Token output.
#[derive(Debug, Serialize)]
pub struct TokenOutput {
    pub token: String,
}

/// Execute the login command.
pub async fn login(args: LoginArgs, client: &mut Client, json: bool) -> Result<()> {
    let request = LoginRequest::new(args.api_key, args.provider);
    let result = client.login(&request).await;
    print_token(result, &format!("Logged in to {}", args.provider), json)
}

/// Execute the refresh command.
pub async fn refresh(client: &mut Client, json: bool) -> Result<()> {
    let result = client.refresh_token().await;
    print_token(result, "Token refreshed", json)
}

fn print_token(result: sauron_sdk::Result<TokenResponse>, message: &str, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);

    match result {
        Ok(token) => match format {
            OutputFormat::Json => CommandResult::success(TokenOutput { token: token.token }).print(format)?,
            OutputFormat::Text => {
                CommandResult::<()>::success_message(message).print(format)?;
                output::key_value("Token", &token.token);
                output::info("Export it as SAURON_TOKEN or pass --token to authorize queries");
            }
        },
        Err(e) => {
            let result: CommandResult<TokenOutput> = CommandResult::failure(e.to_string());
            return result.fail(format);
        }
    }

    Ok(())
}
