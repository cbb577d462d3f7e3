//! Client error types

use prescripto_core::CoreError;
use thiserror::Error;

/// Shown when the backend cannot be reached at all
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error";

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// No response within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Server returned a non-success status
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        /// `message` field of a JSON error body, when the server sent one
        message: Option<String>,
        body: String,
    },

    /// The response body was not a valid envelope
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The envelope did not carry the expected payload
    #[error("Invalid response: {0}")]
    Payload(#[from] CoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from a non-success HTTP status and its body
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("message")?.as_str().map(str::to_string))
            .filter(|message| !message.is_empty());

        Self::Status {
            status: status.as_u16(),
            message,
            body,
        }
    }

    /// Message the server embedded in an error response
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Describes the failure when it has a meaningful description
    ///
    /// Timeouts have none; callers fall back to their own default text.
    /// A backend that cannot be reached reads as [`NETWORK_ERROR_MESSAGE`].
    pub fn transport_message(&self) -> Option<String> {
        match self {
            Self::Timeout => None,
            Self::Request(e) if e.is_timeout() => None,
            Self::Request(e) if e.is_connect() => Some(NETWORK_ERROR_MESSAGE.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Best available user-facing message
    ///
    /// Server message first, then the transport description, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .or_else(|| self.transport_message())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Whether the server rejected the credential
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}
