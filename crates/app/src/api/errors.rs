//! API errors.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Message shown to the user when the failure has no backend explanation.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Rejected {
        /// Response status
        status: StatusCode,
        /// Message extracted from the `detail` envelope
        message: String,
    },

    /// The request never got a response.
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The client could not be built from its configuration.
    #[error("invalid API configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Text to show the user: the backend's own message for rejections, a
    /// generic one otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Transport(_) | Self::Decode(_) | Self::Config(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldError>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct FieldError {
    #[serde(default)]
    loc: Vec<Value>,
    msg: String,
}

impl FieldError {
    fn describe(&self) -> String {
        let field = self.loc.iter().rev().find_map(|part| match part {
            Value::String(name) if name != "body" && name != "query" => Some(name.as_str()),
            _ => None,
        });

        match field {
            Some(field) => format!("{field}: {}", self.msg),
            None => self.msg.clone(),
        }
    }
}

/// Pull a user-facing message out of an error response body.
///
/// The backend wraps errors as `{"detail": "..."}` or, for validation
/// failures, `{"detail": [{"loc": [...], "msg": "..."}]}`. Anything else falls
/// back to the raw body, then to the status reason.
pub(crate) fn rejection_message(status: StatusCode, body: &str) -> String {
    let message = match serde_json::from_str::<ErrorEnvelope>(body).map(|envelope| envelope.detail) {
        Ok(Detail::Message(message)) => message,
        Ok(Detail::Fields(fields)) => fields
            .iter()
            .map(FieldError::describe)
            .collect::<Vec<_>>()
            .join("; "),
        Ok(Detail::Other(value)) => value.to_string(),
        Err(_) => body.trim().to_string(),
    };

    if message.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        message
    }
}
