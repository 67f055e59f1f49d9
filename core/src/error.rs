//! The normalized request failure.
//!
//! # Design
//! Every failed operation surfaces as a single `RequestFailure`: a display
//! message that is never empty, the HTTP status when a response arrived, and
//! the underlying cause for callers that want to dig deeper. Callers should
//! only rely on `message` and `status`.

use serde::Deserialize;

use crate::http::HttpResponse;

/// Message used whenever the server does not supply a usable one.
pub const FALLBACK_MESSAGE: &str = "failed to process the request";

/// The underlying reason behind a `RequestFailure`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureCause {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// No response was obtained (connection refused, DNS, broken pipe...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A 2xx response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request was rejected before reaching the network.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Normalized error returned by every client operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestFailure {
    pub message: String,
    pub status: Option<u16>,
    #[source]
    pub cause: FailureCause,
}

/// Error body shape. Any other shape decodes to `None`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl RequestFailure {
    /// Normalize a non-success response.
    pub fn from_response(response: &HttpResponse) -> Self {
        let message = server_message(&response.body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Self {
            message,
            status: Some(response.status),
            cause: FailureCause::Http {
                status: response.status,
                body: response.body.clone(),
            },
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::fallback(None, FailureCause::Transport(detail.into()))
    }

    pub fn serialization(detail: impl Into<String>) -> Self {
        Self::fallback(None, FailureCause::Serialization(detail.into()))
    }

    pub fn deserialization(status: u16, detail: impl Into<String>) -> Self {
        Self::fallback(Some(status), FailureCause::Deserialization(detail.into()))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: message.clone(),
            status: None,
            cause: FailureCause::InvalidInput(message),
        }
    }

    fn fallback(status: Option<u16>, cause: FailureCause) -> Self {
        Self {
            message: FALLBACK_MESSAGE.to_string(),
            status,
            cause,
        }
    }
}

/// Extract a non-blank string `message` from a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.message? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}
