//! Push error types.

use dirx_export::ExportError;
use thiserror::Error;

pub type PushResult<T> = Result<T, PushError>;

/// Error that can occur during a push operation.
#[derive(Debug, Error)]
pub enum PushError {
    /// Credential rejection, or a missing/malformed session token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Transport-level failure, passed through unmodified.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP outcome, passed through with status and body.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Import job creation failed; wraps the underlying cause.
    #[error("import job creation failed")]
    JobCreation(#[source] Box<PushError>),

    /// The override step rejected the CSV payload.
    #[error(transparent)]
    Override(#[from] ExportError),
}
