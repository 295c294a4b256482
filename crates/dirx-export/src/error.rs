//! Export error types.

use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

/// Error that can occur while encoding records or applying overrides.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Input that cannot be encoded (non-record JSON value, unwritable cell).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The override engine was given CSV it cannot parse.
    #[error("malformed CSV: {0}")]
    MalformedCsv(String),
}
