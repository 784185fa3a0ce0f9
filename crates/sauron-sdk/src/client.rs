//! Client for the Sauron AI gateway.

use crate::config::{parse_base_url, ClientConfig};
use crate::error::{Error, Result};
use crate::request::{AiQueryRequest, LoginRequest, Record};
use crate::response::{AiAlgorithmResponse, AiQueryResponse, ErrorRecord, HealthResponse, TokenResponse};
use crate::session::Session;
use crate::transport::{HttpResponse, HttpTransport, Transport};
use secrecy::Secret;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

/// Status the gateway answers with on success. Every other status fails.
const STATUS_OK: u16 = 200;

const PATH_LOGIN: &str = "/auth/login";
const PATH_REFRESH: &str = "/auth/refresh";
const PATH_QUERY: &str = "/ai/query";
const PATH_QUERY_STREAM: &str = "/ai/query/stream";
const PATH_QUERY_ALGORITHM: &str = "/ai/query/algorithm";
const PATH_HEALTH: &str = "/health";

/// Client for the Sauron AI authentication and query API.
///
/// A client owns exactly one [`Session`]. Every operation takes `&mut self`,
/// so a client serves one call at a time; share it behind a
/// `tokio::sync::Mutex` or build one client per session.
///
/// # Example
///
/// ```rust,no_run
/// use sauron_sdk::{AiQueryRequest, Client, LoginRequest, Provider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), sauron_sdk::Error> {
///     let mut client = Client::builder()
///         .base_url("http://localhost:3000")
///         .build()?;
///
///     client.login(&LoginRequest::new("sk-...", Provider::OpenAI)).await?;
///
///     let response = client
///         .query(&AiQueryRequest::new("Hello!", Provider::OpenAI))
///         .await?;
///
///     println!("{}", response.response);
///     Ok(())
/// }
/// ```
pub struct Client {
    transport: Box<dyn Transport>,
    session: Session,
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new client over HTTP with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        let mut client = Self::with_transport(transport);
        if let Some(token) = config.token_value() {
            client.set_token(token);
        }
        Ok(client)
    }

    /// Create a client configured from `SAURON_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over a custom transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self::with_session(transport, Session::new())
    }

    /// Create a client over a custom transport, resuming an existing session.
    pub fn with_session(transport: impl Transport + 'static, session: Session) -> Self {
        let mut client = Self {
            transport: Box::new(transport),
            session,
        };
        client.sync_authorization();
        client
    }

    /// Give the session back, e.g. to resume it on another client.
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Authenticate with a provider and install the issued token.
    #[instrument(skip(self, request), fields(provider = %request.provider))]
    pub async fn login(&mut self, request: &LoginRequest) -> Result<TokenResponse> {
        request.validate()?;
        let body = request.to_value()?;

        let response = self.transport.post_json(PATH_LOGIN, &body, &[]).await?;
        let token: TokenResponse = interpret(response)?;

        self.set_token(&token.token);
        debug!("login succeeded");
        Ok(token)
    }

    /// Exchange the current token for a fresh one.
    #[instrument(skip(self))]
    pub async fn refresh_token(&mut self) -> Result<TokenResponse> {
        if !self.session.is_authenticated() {
            return Err(Error::auth("no token available"));
        }
        self.attach_token();

        let response = self.transport.post_json(PATH_REFRESH, &json!({}), &[]).await?;
        let token: TokenResponse = interpret(response)?;

        self.set_token(&token.token);
        debug!("token refreshed");
        Ok(token)
    }

    /// Send a query and wait for the full response.
    #[instrument(skip(self, request), fields(provider = %request.provider, model = %request.model))]
    pub async fn query(&mut self, request: &AiQueryRequest) -> Result<AiQueryResponse> {
        let body = self.authorize(request)?;
        let response = self.transport.post_json(PATH_QUERY, &body, &[]).await?;
        interpret(response)
    }

    /// Send an algorithm query; the answer carries code plus a complexity analysis.
    #[instrument(skip(self, request), fields(provider = %request.provider, model = %request.model))]
    pub async fn query_algorithm(&mut self, request: &AiQueryRequest) -> Result<AiAlgorithmResponse> {
        let body = self.authorize(request)?;
        let response = self
            .transport
            .post_json(PATH_QUERY_ALGORITHM, &body, &[])
            .await?;
        interpret(response)
    }

    /// Stream a query, handing each chunk to `on_chunk` as it arrives.
    ///
    /// `on_chunk` receives the chunk text and whether it is the last one, and
    /// returns `false` to stop early. Returns `Ok(true)` when the gateway
    /// answered with success; the content itself has already been delivered
    /// through the callback.
    #[instrument(skip(self, request, on_chunk), fields(provider = %request.provider, model = %request.model))]
    pub async fn query_stream<F>(&mut self, request: &AiQueryRequest, mut on_chunk: F) -> Result<bool>
    where
        F: FnMut(&str, bool) -> bool + Send,
    {
        let body = self.authorize(request)?;
        let status = self
            .transport
            .post_stream(PATH_QUERY_STREAM, &body, &mut on_chunk, &[])
            .await?;

        if status != STATUS_OK {
            return Err(Error::api(
                status,
                format!("stream request failed with status code: {}", status),
            ));
        }
        Ok(true)
    }

    /// Check the health of the gateway. Needs no token.
    #[instrument(skip(self))]
    pub async fn check_health(&mut self) -> Result<HealthResponse> {
        let response = self.transport.get(PATH_HEALTH, &[]).await?;
        interpret(response)
    }

    /// Check if the gateway is reachable and reports `ok`.
    pub async fn is_healthy(&mut self) -> bool {
        self.check_health().await.map(|h| h.is_ok()).unwrap_or(false)
    }

    /// Install a token, marking the session present.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set(token);
        self.transport.set_bearer_token(self.session.token());
    }

    /// The current token, empty if none.
    pub fn token(&self) -> &str {
        self.session.token()
    }

    /// Drop the token and clear the transport's authorization.
    pub fn clear_token(&mut self) {
        self.session.clear();
        self.transport.clear_authorization();
    }

    /// Whether authorized calls may proceed.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Whether a token was installed since the last clear, even an empty one.
    pub fn has_token(&self) -> bool {
        self.session.is_present()
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Point the client at another gateway.
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.transport.set_base_url(url)
    }

    /// Add or replace a header sent with every request.
    pub fn set_default_header(&mut self, name: &str, value: &str) -> Result<()> {
        self.transport.set_default_header(name, value)
    }

    /// Stop sending a default header.
    pub fn remove_default_header(&mut self, name: &str) {
        self.transport.remove_default_header(name);
    }

    /// Validate a query, require a token and attach it. No I/O happens here.
    fn authorize(&mut self, request: &AiQueryRequest) -> Result<Value> {
        request.validate()?;
        if !self.session.is_authenticated() {
            return Err(Error::auth("login required"));
        }
        let body = request.to_value()?;
        self.attach_token();
        Ok(body)
    }

    fn attach_token(&mut self) {
        self.transport.set_bearer_token(self.session.token());
    }

    /// Make the transport's authorization mirror the session.
    fn sync_authorization(&mut self) {
        if self.session.is_authenticated() {
            self.attach_token();
        } else {
            self.transport.clear_authorization();
        }
    }
}

/// Turn a buffered response into a typed record or an API error.
fn interpret<T: Record>(response: HttpResponse) -> Result<T> {
    if response.status != STATUS_OK {
        return Err(api_error(&response));
    }
    T::from_json_str(&response.body)
}

/// Error text comes from the body's error record when there is one.
fn api_error(response: &HttpResponse) -> Error {
    let message = ErrorRecord::from_json_str(&response.body)
        .ok()
        .map(|record| record.error)
        .filter(|error| !error.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", response.status));
    debug!(status = response.status, %message, "gateway returned an error");
    Error::api(response.status, message)
}

/// Builder for creating a Client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    token: Option<Secret<String>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    custom_headers: Vec<(String, String)>,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Start with an existing token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Secret::new(token.into()));
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Build the configuration without creating a client.
    pub fn build_config(self) -> Result<ClientConfig> {
        let mut config = match self.base_url {
            Some(url) => ClientConfig::new(parse_base_url(&url)?),
            None => ClientConfig::default(),
        };

        config.token = self.token;
        config.timeout = self.timeout.unwrap_or(ClientConfig::DEFAULT_TIMEOUT);
        config.connect_timeout = self
            .connect_timeout
            .unwrap_or(ClientConfig::DEFAULT_CONNECT_TIMEOUT);
        config.user_agent = self
            .user_agent
            .unwrap_or_else(|| ClientConfig::DEFAULT_USER_AGENT.to_string());
        config.custom_headers = self.custom_headers;
        Ok(config)
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        Client::new(self.build_config()?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.transport.base_url())
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .base_url("http://localhost:3000")
            .token("test-token")
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "http://localhost:3000/");
        assert!(client.is_authenticated());
        assert_eq!(client.token(), "test-token");
    }

    #[test]
    fn test_client_default_url() {
        let client = Client::builder().build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/");
        assert!(!client.has_token());
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = Client::builder().base_url("::not a url::").build().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_api_error_uses_error_record() {
        let err = api_error(&HttpResponse::new(401, r#"{"error":"invalid credentials"}"#));
        assert!(matches!(err, Error::Api { status: 401, ref message } if message == "invalid credentials"));
    }

    #[test]
    fn test_api_error_falls_back_to_status() {
        let err = api_error(&HttpResponse::new(502, "<html>bad gateway</html>"));
        assert!(matches!(err, Error::Api { status: 502, ref message } if message == "HTTP 502"));

        let err = api_error(&HttpResponse::new(500, "{}"));
        assert!(matches!(err, Error::Api { ref message, .. } if message == "HTTP 500"));
    }

    #[test]
    fn test_interpret_success_and_decode_failure() {
        let ok: AiQueryResponse = interpret(HttpResponse::new(200, r#"{"response":"hi"}"#)).unwrap();
        assert_eq!(ok.response, "hi");

        let err = interpret::<AiQueryResponse>(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));

        // Only 200 counts as success.
        let err = interpret::<AiQueryResponse>(HttpResponse::new(201, r#"{"response":"hi"}"#)).unwrap_err();
        assert!(matches!(err, Error::Api { status: 201, .. }));
    }
}
