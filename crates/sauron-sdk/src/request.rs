//! Request records for the Sauron SDK.

use crate::error::{Error, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A plain data record exchanged with the gateway.
///
/// Decoding is lenient: missing fields, and fields of the wrong JSON type,
/// fall back to the record's defaults and only show up as failures when
/// [`Record::validate`] runs. Only a body that is not a JSON object fails to
/// decode.
pub trait Record: Serialize + DeserializeOwned + Sized {
    /// Check that every required field is populated.
    fn validate(&self) -> Result<()>;

    /// Encode into a JSON tree.
    fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::encode(e.to_string()))
    }

    /// Decode from a JSON tree.
    fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| Error::decode(e.to_string()))
    }

    /// Encode into a compact JSON string.
    fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::encode(e.to_string()))
    }

    /// Decode from a JSON string.
    fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::decode(e.to_string()))
    }
}

/// Fail with a validation error when `value` is empty.
pub(crate) fn require(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::missing_field(field));
    }
    Ok(())
}

/// AI provider the gateway should route to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI.
    #[default]
    OpenAI,
    /// Anthropic.
    Anthropic,
    /// Google.
    Google,
    /// Mistral.
    Mistral,
    /// A custom provider configured on the gateway.
    Custom,
}

impl Provider {
    /// Every provider, in declaration order.
    pub const ALL: [Provider; 5] = [
        Self::OpenAI,
        Self::Anthropic,
        Self::Google,
        Self::Mistral,
        Self::Custom,
    ];

    /// Wire name of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Mistral => "mistral",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::validation("provider", format!("has an invalid value '{}'", s)))
    }
}

/// Unknown or non-string providers decode to the default instead of failing.
fn lenient_provider<'de, D>(deserializer: D) -> std::result::Result<Provider, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

/// A non-string value decodes as if the field were absent.
pub(crate) fn string_or_else<'de, D>(
    deserializer: D,
    fallback: impl FnOnce() -> String,
) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => fallback(),
    })
}

/// String field whose default is empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_else(deserializer, String::new)
}

fn lenient_model<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_else(deserializer, || AiQueryRequest::DEFAULT_MODEL.to_string())
}

/// Nested record; anything but an object decodes to the default.
pub(crate) fn lenient_object<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => T::deserialize(value).map_err(D::Error::custom),
        _ => Ok(T::default()),
    }
}

/// Non-string entries in the image list are dropped.
fn string_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Request to authenticate against a provider.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Provider API key exchanged for a gateway token.
    #[serde(deserialize_with = "lenient_string")]
    pub api_key: String,
    /// Provider to authenticate with.
    #[serde(deserialize_with = "lenient_provider")]
    pub provider: Provider,
}

impl LoginRequest {
    /// Create a new login request.
    pub fn new(api_key: impl Into<String>, provider: Provider) -> Self {
        Self {
            api_key: api_key.into(),
            provider,
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("api_key", &"[REDACTED]")
            .field("provider", &self.provider)
            .finish()
    }
}

impl Record for LoginRequest {
    fn validate(&self) -> Result<()> {
        require(&self.api_key, "api_key")
    }
}

/// Request for an AI completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiQueryRequest {
    /// Prompt sent to the model.
    #[serde(deserialize_with = "lenient_string")]
    pub prompt: String,
    /// Provider to route to.
    #[serde(deserialize_with = "lenient_provider")]
    pub provider: Provider,
    /// Model name; omitted from the wire when empty.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "lenient_model")]
    pub model: String,
    /// Base64-encoded images; omitted from the wire when empty.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "string_entries")]
    pub images: Vec<String>,
}

impl AiQueryRequest {
    /// Model used when none is given.
    pub const DEFAULT_MODEL: &'static str = "default";

    /// Create a new query with the default model.
    pub fn new(prompt: impl Into<String>, provider: Provider) -> Self {
        Self {
            prompt: prompt.into(),
            provider,
            ..Self::default()
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the image list.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Append one base64-encoded image.
    pub fn add_image(&mut self, image: impl Into<String>) {
        self.images.push(image.into());
    }
}

impl Default for AiQueryRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            provider: Provider::default(),
            model: Self::DEFAULT_MODEL.to_string(),
            images: Vec::new(),
        }
    }
}

impl Record for AiQueryRequest {
    fn validate(&self) -> Result<()> {
        require(&self.prompt, "prompt")
    }
}
