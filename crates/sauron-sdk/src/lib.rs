//! # Sauron SDK
//!
//! A Rust client for the Sauron AI gateway: authenticate against a provider,
//! then send plain, algorithm or streamed queries through typed records.
//!
//! ## Features
//!
//! - Async-first design on `tokio` and `reqwest`
//! - Token lifecycle owned by the client (login, refresh, clear)
//! - Chunk-by-chunk streaming through a plain callback
//! - Typed errors that separate local failures from gateway rejections
//! - Pluggable [`Transport`] for custom wiring and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sauron_sdk::{AiQueryRequest, Client, LoginRequest, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sauron_sdk::Error> {
//!     let mut client = Client::builder()
//!         .base_url("http://localhost:3000")
//!         .build()?;
//!
//!     client
//!         .login(&LoginRequest::new("your-api-key", Provider::Anthropic))
//!         .await?;
//!
//!     let response = client
//!         .query(&AiQueryRequest::new("Hello, world!", Provider::Anthropic))
//!         .await?;
//!
//!     println!("Response: {}", response.response);
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! use sauron_sdk::{AiQueryRequest, Client, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sauron_sdk::Error> {
//!     let mut client = Client::from_env()?;
//!
//!     client
//!         .query_stream(&AiQueryRequest::new("Tell me a story", Provider::OpenAI), |chunk, done| {
//!             print!("{}", chunk);
//!             if done {
//!                 println!();
//!             }
//!             true
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod client;
mod config;
mod error;
mod request;
mod response;
mod session;
mod streaming;
mod transport;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use request::{AiQueryRequest, LoginRequest, Provider, Record};
pub use response::{
    AiAlgorithmResponse, AiQueryResponse, AlgorithmComplexity, ComplexityInfo, ErrorRecord,
    HealthResponse, TokenResponse,
};
pub use session::Session;
pub use streaming::{ChunkCallback, StreamCollector, Utf8ChunkDecoder};
pub use transport::{Headers, HttpResponse, HttpTransport, Transport};
