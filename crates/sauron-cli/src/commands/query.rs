//! Query commands - plain, streamed and algorithm queries.

use anyhow::{Context, Result};
use base64::Engine;
use clap::Args;
use sauron_sdk::{AiQueryRequest, Client, Provider};
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::PathBuf;

use crate::output::{self, CommandResult, OutputFormat};

/// Options shared by every query command.
#[derive(Args, Debug)]
pub struct QueryOptions {
    /// Provider to route to (openai, anthropic, google, mistral, custom)
    #[arg(short, long, default_value = "openai")]
    pub provider: Provider,

    /// Model to use
    #[arg(short = 'M', long, default_value = AiQueryRequest::DEFAULT_MODEL)]
    pub model: String,

    /// Image file to attach (repeatable)
    #[arg(short, long = "image")]
    pub images: Vec<PathBuf>,
}

/// Arguments for the query command.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Prompt to send (if not provided, reads from stdin)
    pub prompt: Option<String>,

    #[command(flatten)]
    pub common: QueryOptions,

    /// Print the response as it arrives
    #[arg(long)]
    pub stream: bool,
}

/// Arguments for the algorithm command.
#[derive(Args, Debug)]
pub struct AlgorithmArgs {
    /// Problem to solve (if not provided, reads from stdin)
    pub prompt: Option<String>,

    #[command(flatten)]
    pub common: QueryOptions,
}

/// Streamed query output.
#[derive(Debug, Serialize)]
pub struct StreamOutput {
    pub content: String,
    pub chunks: usize,
}

/// Execute the query command.
pub async fn execute(args: QueryArgs, client: &mut Client, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);
    let request = build_request(args.prompt, &args.common, format)?;

    if args.stream {
        return stream(&request, client, format).await;
    }

    let spinner = (!json).then(|| output::spinner("Generating response..."));
    let result = client.query(&request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(response) => match format {
            OutputFormat::Json => CommandResult::success(response).print(format)?,
            OutputFormat::Text => println!("{}", response.response),
        },
        Err(e) => {
            let result: CommandResult<()> = CommandResult::failure(format!("Query failed: {}", e));
            return result.fail(format);
        }
    }

    Ok(())
}

/// Execute the algorithm command.
pub async fn algorithm(args: AlgorithmArgs, client: &mut Client, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);
    let request = build_request(args.prompt, &args.common, format)?;

    let spinner = (!json).then(|| output::spinner("Designing algorithm..."));
    let result = client.query_algorithm(&request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(response) => match format {
            OutputFormat::Json => CommandResult::success(response).print(format)?,
            OutputFormat::Text => {
                println!("{}", response.explanation);
                output::section("Solution");
                println!("{}", response.response);
                output::section("Complexity");
                output::key_value(
                    "Time",
                    &format!("{} ({})", response.complexity.time.value, response.complexity.time.explanation),
                );
                output::key_value(
                    "Space",
                    &format!("{} ({})", response.complexity.space.value, response.complexity.space.explanation),
                );
            }
        },
        Err(e) => {
            let result: CommandResult<()> =
                CommandResult::failure(format!("Algorithm query failed: {}", e));
            return result.fail(format);
        }
    }

    Ok(())
}

async fn stream(request: &AiQueryRequest, client: &mut Client, format: OutputFormat) -> Result<()> {
    let mut content = String::new();
    let mut chunks = 0;
    let text = format == OutputFormat::Text;

    let result = client
        .query_stream(request, |chunk, done| {
            chunks += 1;
            if text {
                output::stream_text(chunk);
                if done {
                    output::stream_newline();
                }
            } else {
                content.push_str(chunk);
            }
            true
        })
        .await;

    match result {
        Ok(_) if text => {}
        Ok(_) => CommandResult::success(StreamOutput { content, chunks }).print(format)?,
        Err(e) => {
            let result: CommandResult<StreamOutput> =
                CommandResult::failure(format!("Stream failed: {}", e));
            return result.fail(format);
        }
    }

    Ok(())
}

/// Assemble a request, reading the prompt from stdin when it was not given.
///
/// An empty prompt is reported and fails the command.
fn build_request(
    prompt: Option<String>,
    options: &QueryOptions,
    format: OutputFormat,
) -> Result<AiQueryRequest> {
    let prompt = match prompt {
        Some(prompt) => prompt,
        None => {
            let mut input = String::new();
            io::stdin().lock().read_line(&mut input)?;
            input.trim().to_string()
        }
    };

    if prompt.is_empty() {
        let result: CommandResult<()> = CommandResult::failure("No prompt provided");
        return result.fail(format);
    }

    let images = encode_images(&options.images)?;
    Ok(AiQueryRequest::new(prompt, options.provider)
        .with_model(options.model.clone())
        .with_images(images))
}

/// Read image files and base64-encode them for the wire.
fn encode_images(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read image {}", path.display()))?;
            Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn options(images: Vec<PathBuf>) -> QueryOptions {
        QueryOptions {
            provider: Provider::Mistral,
            model: "mistral-large".to_string(),
            images,
        }
    }

    #[test]
    fn test_build_request_from_flags() {
        let request = build_request(Some("Hi".into()), &options(vec![]), OutputFormat::Json).unwrap();
        assert_eq!(request.prompt, "Hi");
        assert_eq!(request.provider, Provider::Mistral);
        assert_eq!(request.model, "mistral-large");
        assert!(request.images.is_empty());
    }

    #[test]
    fn test_empty_prompt_is_not_sent() {
        let err = build_request(Some(String::new()), &options(vec![]), OutputFormat::Json).unwrap_err();
        assert!(err.is::<crate::output::Reported>());
    }

    #[test]
    fn test_images_are_base64_encoded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"png-bytes").unwrap();

        let images = encode_images(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(images, vec!["cG5nLWJ5dGVz".to_string()]);
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let err = encode_images(&[PathBuf::from("/definitely/not/here.png")]).unwrap_err();
        assert!(err.to_string().contains("Failed to read image"));
    }
}
