//! HTTP transport used by the client.
//!
//! [`Transport`] is the seam between the request pipeline and the wire. The
//! client only ever talks to this trait; [`HttpTransport`] is the reqwest
//! implementation used in production.

use crate::config::{parse_base_url, ClientConfig};
use crate::error::{Error, Result};
use crate::streaming::{ChunkCallback, Utf8ChunkDecoder};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Per-request headers as `(name, value)` pairs.
pub type Headers<'a> = [(&'a str, &'a str)];

/// A buffered HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
    /// Response headers as `(name, value)` pairs.
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    /// Create a response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    /// Look up a header value, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Capability interface over the wire.
///
/// Implementations keep default headers and the bearer credential between
/// calls; the client pushes the current token before every authorized call
/// and clears it explicitly on logout.
#[async_trait]
pub trait Transport: Send {
    /// Base URL every path is appended to.
    fn base_url(&self) -> &str;

    /// Replace the base URL.
    fn set_base_url(&mut self, url: &str) -> Result<()>;

    /// Add or replace a header sent with every request.
    fn set_default_header(&mut self, name: &str, value: &str) -> Result<()>;

    /// Stop sending a default header.
    fn remove_default_header(&mut self, name: &str);

    /// Send `Authorization: Bearer <token>` with every request.
    fn set_bearer_token(&mut self, token: &str);

    /// Stop sending an `Authorization` header.
    fn clear_authorization(&mut self);

    /// `GET` a path.
    async fn get(&mut self, path: &str, headers: &Headers<'_>) -> Result<HttpResponse>;

    /// `POST` a JSON body.
    async fn post_json(
        &mut self,
        path: &str,
        body: &Value,
        headers: &Headers<'_>,
    ) -> Result<HttpResponse>;

    /// `POST` a raw body with an explicit content type.
    async fn post_text(
        &mut self,
        path: &str,
        body: &str,
        content_type: &str,
        headers: &Headers<'_>,
    ) -> Result<HttpResponse>;

    /// `POST` a JSON body and feed the response to `on_chunk` as it arrives.
    ///
    /// Returns the overall status once the final chunk was delivered or the
    /// callback asked to stop.
    async fn post_stream(
        &mut self,
        path: &str,
        body: &Value,
        on_chunk: &mut ChunkCallback<'_>,
        headers: &Headers<'_>,
    ) -> Result<u16>;
}

/// reqwest-backed [`Transport`].
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    default_headers: HeaderMap,
    bearer: Option<Secret<String>>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport from client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::configuration(format!("Invalid user agent: {}", e)))?,
        );

        for (name, value) in &config.custom_headers {
            let (name, value) = parse_header(name, value)?;
            default_headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            default_headers,
            bearer: None,
            timeout: config.timeout,
        })
    }

    /// Build a URL for the given path, keeping any path prefix of the base.
    fn url(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| Error::configuration(format!("Invalid URL path '{}': {}", path, e)))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        headers: &Headers<'_>,
    ) -> Result<reqwest::RequestBuilder> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);

        let mut builder = self
            .http
            .request(method, url)
            .headers(self.default_headers.clone());

        if let Some(token) = &self.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        for (name, value) in headers {
            let (name, value) = parse_header(name, value)?;
            builder = builder.header(name, value);
        }

        Ok(builder)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        builder.send().await.map_err(|e| self.map_reqwest_error(e))
    }

    async fn buffer(&self, response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(|e| self.map_reqwest_error(e))?;

        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }

    /// Map a reqwest error to an SDK error.
    fn map_reqwest_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::timeout(self.timeout.as_millis() as u64)
        } else if error.is_connect() {
            Error::connection(error.to_string())
        } else {
            Error::Http(error)
        }
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::try_from(name)
        .map_err(|e| Error::configuration(format!("Invalid header name '{}': {}", name, e)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| Error::configuration(format!("Invalid header value for '{}': {}", name, e)))?;
    Ok((header_name, header_value))
}

#[async_trait]
impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.base_url = parse_base_url(url)?;
        Ok(())
    }

    fn set_default_header(&mut self, name: &str, value: &str) -> Result<()> {
        let (name, value) = parse_header(name, value)?;
        self.default_headers.insert(name, value);
        Ok(())
    }

    fn remove_default_header(&mut self, name: &str) {
        self.default_headers.remove(name);
    }

    fn set_bearer_token(&mut self, token: &str) {
        self.bearer = if token.is_empty() {
            None
        } else {
            Some(Secret::new(token.to_string()))
        };
    }

    fn clear_authorization(&mut self) {
        self.bearer = None;
    }

    async fn get(&mut self, path: &str, headers: &Headers<'_>) -> Result<HttpResponse> {
        let builder = self.request(Method::GET, path, headers)?;
        let response = self.send(builder).await?;
        self.buffer(response).await
    }

    async fn post_json(
        &mut self,
        path: &str,
        body: &Value,
        headers: &Headers<'_>,
    ) -> Result<HttpResponse> {
        let builder = self.request(Method::POST, path, headers)?.json(body);
        let response = self.send(builder).await?;
        self.buffer(response).await
    }

    async fn post_text(
        &mut self,
        path: &str,
        body: &str,
        content_type: &str,
        headers: &Headers<'_>,
    ) -> Result<HttpResponse> {
        let (_, content_type) = parse_header("content-type", content_type)?;
        let builder = self
            .request(Method::POST, path, headers)?
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body.to_string());
        let response = self.send(builder).await?;
        self.buffer(response).await
    }

    async fn post_stream(
        &mut self,
        path: &str,
        body: &Value,
        on_chunk: &mut ChunkCallback<'_>,
        headers: &Headers<'_>,
    ) -> Result<u16> {
        let builder = self.request(Method::POST, path, headers)?.json(body);
        let response = self.send(builder).await?;
        let status = response.status().as_u16();

        if status != 200 {
            debug!(status, "stream rejected");
            return Ok(status);
        }

        let mut decoder = Utf8ChunkDecoder::new();
        let mut chunks = response.bytes_stream();

        while let Some(next) = chunks.next().await {
            let bytes = next.map_err(|e| self.map_reqwest_error(e))?;
            let text = decoder.push(&bytes);
            if text.is_empty() {
                continue;
            }
            if !on_chunk(&text, false) {
                debug!(status, "stream aborted by consumer");
                return Ok(status);
            }
        }

        on_chunk(&decoder.finish(), true);
        Ok(status)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("has_bearer", &self.bearer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        let config = ClientConfig::new(Url::parse(base).unwrap());
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let t = transport("http://localhost:3000/api/");
        assert_eq!(t.url("/auth/login").unwrap().as_str(), "http://localhost:3000/api/auth/login");

        let t = transport("http://localhost:3000");
        assert_eq!(t.url("/health").unwrap().as_str(), "http://localhost:3000/health");
    }

    #[test]
    fn test_bearer_management() {
        let mut t = transport("http://localhost:3000");
        t.set_bearer_token("abc");
        assert!(t.bearer.is_some());
        t.set_bearer_token("");
        assert!(t.bearer.is_none());
        t.set_bearer_token("abc");
        t.clear_authorization();
        assert!(t.bearer.is_none());
    }

    #[test]
    fn test_default_headers() {
        let mut t = transport("http://localhost:3000");
        t.set_default_header("x-tenant-id", "acme").unwrap();
        assert_eq!(t.default_headers.get("x-tenant-id").unwrap(), "acme");
        t.remove_default_header("x-tenant-id");
        assert!(t.default_headers.get("x-tenant-id").is_none());
        assert!(t.set_default_header("bad header", "x").is_err());
    }

    #[test]
    fn test_set_base_url() {
        let mut t = transport("http://localhost:3000");
        t.set_base_url("https://gateway.example.com").unwrap();
        assert_eq!(t.base_url(), "https://gateway.example.com/");
        assert!(t.set_base_url("nope").is_err());
    }

    #[test]
    fn test_response_header_lookup() {
        let mut response = HttpResponse::new(200, "{}");
        response.headers.push(("X-Request-Id".into(), "r1".into()));
        assert_eq!(response.header("x-request-id"), Some("r1"));
        assert_eq!(response.header("missing"), None);
    }
}
