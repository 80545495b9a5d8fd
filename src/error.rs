//! Error types for the Aminder AI layer.
//!
//! All fallible operations in this crate return [`AiError`]. The taxonomy
//! follows the layers a request can fail in:
//!
//! - transport ([`AiError::HttpError`]) — DNS, connection refused, timeout
//! - protocol ([`AiError::ApiError`]) — the provider answered with a non-2xx
//!   status; the error carries the status code and best-effort body text
//! - parsing ([`AiError::ParseError`]) — a 2xx response whose body is not JSON
//! - validation ([`AiError::InvalidInput`]) — rejected before any network call
//!
//! Credentials are never included in error messages.

use thiserror::Error;

/// Errors produced by the provider registry, discovery client, and API client.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP transport error (network failure, DNS, timeout, etc.)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// API returned a non-success status code
    #[error("API error {code}: {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Error message, including status text and body text where available
        message: String,
        /// Response body parsed as JSON, when it parses
        details: Option<serde_json::Value>,
    },

    /// Response body could not be parsed as JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid caller-supplied input, rejected before any request is sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration problem, e.g. an unknown provider identifier
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AiError {
    /// Create an API error with a status code and message.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// The HTTP status code behind this error, if it came from a response.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this error was raised before any network traffic occurred.
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::ConfigurationError(_)
        )
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest redacts URLs containing credentials on Display; keep the
        // message as-is.
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
