//! Error types for the Sauron SDK.

use thiserror::Error;

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the Sauron SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// A record failed its validation predicate before being sent.
    #[error("Validation error: {field} {reason}")]
    Validation {
        /// The offending field, as named on the wire.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The operation needs a credential that the session does not hold.
    #[error("Authentication required: {message}")]
    Auth {
        /// Error message describing the missing credential.
        message: String,
    },

    /// Server returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error text from the server's error record, or `HTTP <status>`.
        message: String,
    },

    /// A success body could not be parsed into the expected record.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Error message describing the parse failure.
        message: String,
    },

    /// A record could not be encoded.
    #[error("Failed to encode request: {message}")]
    Encode {
        /// Error message describing the encoding failure.
        message: String,
    },

    /// Configuration error during client setup.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Timeout waiting for response.
    #[error("Request timed out after {duration_ms}ms")]
    Timeout {
        /// Duration in milliseconds before timeout.
        duration_ms: u64,
    },

    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message describing the connection error.
        message: String,
    },
}

impl Error {
    /// Create a validation error for a field that must not be empty.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: "is required".to_string(),
        }
    }

    /// Create a validation error with a custom reason.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an API error from response details.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Get the HTTP status code if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the error was raised before any network I/O took place.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Auth { .. } | Self::Encode { .. } | Self::Configuration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::configuration("invalid base URL");
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("invalid base URL"));
    }

    #[test]
    fn test_missing_field_message() {
        let err = Error::missing_field("prompt");
        assert_eq!(err.to_string(), "Validation error: prompt is required");
    }

    #[test]
    fn test_error_status_code() {
        assert_eq!(Error::api(401, "invalid credentials").status_code(), Some(401));
        assert_eq!(Error::auth("login required").status_code(), None);
        assert_eq!(Error::decode("bad json").status_code(), None);
    }

    #[test]
    fn test_local_errors() {
        assert!(Error::missing_field("api_key").is_local());
        assert!(Error::auth("login required").is_local());
        assert!(!Error::api(500, "boom").is_local());
        assert!(!Error::timeout(30_000).is_local());
    }
}
