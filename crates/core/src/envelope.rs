//! The `{success, message, <payload>}` shape every endpoint answers with

use crate::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload fields, keyed by name (`doctors`, `appointments`, `dashData`, ...)
    #[serde(flatten)]
    pub payload: Map<String, JsonValue>,
}

impl Envelope {
    /// A successful envelope carrying only a message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            payload: Map::new(),
        }
    }

    /// A declared failure
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            payload: Map::new(),
        }
    }

    /// Attach a payload field
    pub fn with_field(mut self, field: impl Into<String>, value: JsonValue) -> Self {
        self.payload.insert(field.into(), value);
        self
    }

    /// The server message, or `default` when the server sent none
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(default)
    }

    /// Remove and decode a named payload field
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingPayload`] when the field is absent or null,
    /// and [`CoreError::Serialization`] when it does not decode as `T`.
    pub fn take<T: DeserializeOwned>(&mut self, field: &str) -> CoreResult<T> {
        match self.payload.remove(field) {
            None | Some(JsonValue::Null) => Err(CoreError::missing_payload(field)),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }
}
