//! Client configuration for the Sauron SDK.

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use url::Url;

/// Configuration for the Sauron SDK client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the gateway server.
    pub(crate) base_url: Url,
    /// Token to start the session with.
    pub(crate) token: Option<Secret<String>>,
    /// Request timeout duration.
    pub(crate) timeout: Duration,
    /// Connection timeout duration.
    pub(crate) connect_timeout: Duration,
    /// User agent string.
    pub(crate) user_agent: String,
    /// Custom headers to include in requests.
    pub(crate) custom_headers: Vec<(String, String)>,
}

impl ClientConfig {
    /// Default gateway address.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3000";
    /// Default request timeout (30 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    /// Default connection timeout (10 seconds).
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default user agent.
    pub const DEFAULT_USER_AGENT: &'static str = concat!(
        "sauron-sdk-rust/",
        env!("CARGO_PKG_VERSION")
    );

    /// Environment variable holding the base URL.
    pub const ENV_BASE_URL: &'static str = "SAURON_BASE_URL";
    /// Environment variable holding an initial token.
    pub const ENV_TOKEN: &'static str = "SAURON_TOKEN";
    /// Environment variable holding the request timeout in seconds.
    pub const ENV_TIMEOUT_SECS: &'static str = "SAURON_TIMEOUT_SECS";

    /// Create a new configuration with default values.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            custom_headers: Vec::new(),
        }
    }

    /// Build a configuration from `SAURON_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(Self::ENV_BASE_URL) {
            config.base_url = parse_base_url(&url)?;
        }

        if let Some(token) = lookup(Self::ENV_TOKEN).filter(|t| !t.is_empty()) {
            config.token = Some(Secret::new(token));
        }

        if let Some(secs) = lookup(Self::ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                Error::configuration(format!("Invalid {}: {}", Self::ENV_TIMEOUT_SECS, e))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check if an initial token is configured.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn token_value(&self) -> Option<&str> {
        self.token.as_ref().map(|s| s.expose_secret().as_str())
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the connection timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Get the user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get custom headers.
    pub fn custom_headers(&self) -> &[(String, String)] {
        &self.custom_headers
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(
            Url::parse(Self::DEFAULT_BASE_URL).expect("valid default URL"),
        )
    }
}

/// Parse a base URL, rejecting anything that cannot carry HTTP paths.
pub(crate) fn parse_base_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| Error::configuration(format!("Invalid base URL '{}': {}", url, e)))?;
    if parsed.cannot_be_a_base() {
        return Err(Error::configuration(format!("Invalid base URL '{}'", url)));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert!(!config.has_token());
        assert_eq!(config.timeout(), ClientConfig::DEFAULT_TIMEOUT);
        assert!(config.user_agent().starts_with("sauron-sdk-rust/"));
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("SAURON_BASE_URL", "https://gateway.example.com/api"),
            ("SAURON_TOKEN", "abc123"),
            ("SAURON_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url().as_str(), "https://gateway.example.com/api");
        assert_eq!(config.token_value(), Some("abc123"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_from_lookup_rejects_bad_values() {
        let err = ClientConfig::from_lookup(|k| {
            (k == "SAURON_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = ClientConfig::from_lookup(|k| {
            (k == "SAURON_BASE_URL").then(|| "not a url".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let config = ClientConfig::from_lookup(|k| (k == "SAURON_TOKEN").then(String::new)).unwrap();
        assert!(!config.has_token());
    }
}
