//! HTTP error types rendered as response envelopes

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use prescripto_core::Envelope;
use thiserror::Error;

/// HTTP-specific errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Server configuration could not be applied
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Listener or connection failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HttpError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Configuration(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(Envelope::failure(self.to_string()))).into_response()
    }
}

/// Result type alias using HttpError
pub type Result<T> = std::result::Result<T, HttpError>;
