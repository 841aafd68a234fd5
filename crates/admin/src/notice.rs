//! User-visible outcome messages.

use serde::Serialize;

use adminconsole_client::ApiError;
use adminconsole_core::DomainError;

use crate::{AdminError, AdminResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short message for the operator, the console's equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Error notice for a failed operation.
    ///
    /// Local validation messages are shown as-is; backend failures are
    /// prefixed with what was being attempted ("save failed: ...").
    pub fn failure(action: &str, err: &AdminError) -> Self {
        match err {
            AdminError::Domain(DomainError::Validation(msg))
            | AdminError::Domain(DomainError::Duplicate(msg))
            | AdminError::Domain(DomainError::NotFound(msg)) => Self::error(msg.clone()),
            AdminError::Api(ApiError::SessionExpired) | AdminError::NotSignedIn => {
                Self::error("session expired, please log in again")
            }
            AdminError::Api(ApiError::InvalidCredentials) => Self::error("invalid credentials"),
            other => Self::error(format!("{action} failed: {other}")),
        }
    }

    /// Notice for the outcome of a view operation.
    pub fn from_result<T>(result: &AdminResult<T>, success: impl Into<String>, action: &str) -> Self {
        match result {
            Ok(_) => Self::success(success),
            Err(err) => Self::failure(action, err),
        }
    }
}

impl core::fmt::Display for Notice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}
