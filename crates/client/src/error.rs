//! Transport-level errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected the stored token; the session has been cleared.
    #[error("session expired; log in again")]
    SessionExpired,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("parse error: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Whether the operator has to sign in again before retrying.
    pub fn needs_login(&self) -> bool {
        matches!(self, ApiError::SessionExpired | ApiError::InvalidCredentials)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Pull a human message out of an error body.
///
/// The backend answers errors with `{"message": "..."}` most of the time;
/// anything else is passed through trimmed.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
