//! View-model errors.

use thiserror::Error;

use adminconsole_auth::SessionError;
use adminconsole_client::ApiError;
use adminconsole_core::DomainError;

pub type AdminResult<T> = Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    /// Rejected locally before anything was sent.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("not signed in")]
    NotSignedIn,

    /// A bulk permission copy failed part-way. Changes applied before the
    /// failure stay applied.
    #[error("copy stopped after {applied} change(s): {source}")]
    CopyInterrupted {
        applied: usize,
        #[source]
        source: ApiError,
    },
}

impl AdminError {
    /// Whether the operator must sign in before anything else will work.
    pub fn needs_login(&self) -> bool {
        match self {
            AdminError::NotSignedIn => true,
            AdminError::Api(err) | AdminError::CopyInterrupted { source: err, .. } => err.needs_login(),
            _ => false,
        }
    }
}
