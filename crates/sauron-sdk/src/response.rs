//! Response records for the Sauron SDK.

use crate::error::{Error, Result};
use crate::request::{lenient_object, lenient_string, require, string_or_else, Record};
use serde::{Deserialize, Deserializer, Serialize};

/// Token issued by `/auth/login` and `/auth/refresh`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    /// Bearer token for subsequent calls.
    #[serde(deserialize_with = "lenient_string")]
    pub token: String,
}

impl TokenResponse {
    /// Create a new token response.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Record for TokenResponse {
    fn validate(&self) -> Result<()> {
        require(&self.token, "token")
    }
}

/// Response from `/ai/query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiQueryResponse {
    /// Generated text.
    #[serde(deserialize_with = "lenient_string")]
    pub response: String,
}

impl AiQueryResponse {
    /// Create a new query response.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl Record for AiQueryResponse {
    fn validate(&self) -> Result<()> {
        require(&self.response, "response")
    }
}

/// One axis of a complexity analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityInfo {
    /// Big-O value, e.g. `O(n log n)`.
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    /// Why the value holds.
    #[serde(deserialize_with = "lenient_string")]
    pub explanation: String,
}

impl ComplexityInfo {
    /// Create a new complexity entry.
    pub fn new(value: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            explanation: explanation.into(),
        }
    }
}

/// Time and space complexity of a generated algorithm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmComplexity {
    /// Time complexity.
    #[serde(deserialize_with = "lenient_object")]
    pub time: ComplexityInfo,
    /// Space complexity.
    #[serde(deserialize_with = "lenient_object")]
    pub space: ComplexityInfo,
}

/// Response from `/ai/query/algorithm`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAlgorithmResponse {
    /// Prose explanation of the solution.
    #[serde(deserialize_with = "lenient_string")]
    pub explanation: String,
    /// The generated code.
    #[serde(deserialize_with = "lenient_string")]
    pub response: String,
    /// Complexity analysis.
    #[serde(deserialize_with = "lenient_object")]
    pub complexity: AlgorithmComplexity,
}

impl Record for AiAlgorithmResponse {
    fn validate(&self) -> Result<()> {
        require(&self.explanation, "explanation")?;
        require(&self.response, "response")
    }
}

/// Response from `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    /// Gateway status; only `ok` is valid.
    #[serde(deserialize_with = "lenient_status")]
    pub status: String,
}

impl HealthResponse {
    /// The only status a healthy gateway reports.
    pub const STATUS_OK: &'static str = "ok";

    /// Check if the gateway reported itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }
}

fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_else(deserializer, || HealthResponse::STATUS_OK.to_string())
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: Self::STATUS_OK.to_string(),
        }
    }
}

impl Record for HealthResponse {
    fn validate(&self) -> Result<()> {
        require(&self.status, "status")?;
        if !self.is_ok() {
            return Err(Error::validation("status", "has an invalid value"));
        }
        Ok(())
    }
}

/// Body of any non-success response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorRecord {
    /// Human-readable error text.
    #[serde(deserialize_with = "lenient_string")]
    pub error: String,
}

impl ErrorRecord {
    /// Create a new error record.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl Record for ErrorRecord {
    fn validate(&self) -> Result<()> {
        require(&self.error, "error")
    }
}
