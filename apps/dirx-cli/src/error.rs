//! CLI error type and exit codes.

use thiserror::Error;

use dirx_connector_ldap::DirectoryError;
use dirx_export::ExportError;
use dirx_push::PushError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication failure
/// - 3: Network error
/// - 4: Validation error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Push(#[from] PushError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Push(PushError::Authentication(_)) => 2,
            CliError::Push(PushError::Transport(_)) => 3,
            CliError::Push(PushError::JobCreation(_)) => 5,
            CliError::Push(PushError::Api { status, .. }) => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 {
                    2
                } else {
                    4
                }
            }
            CliError::Push(PushError::Override(_)) => 4,
            CliError::Directory(DirectoryError::AuthenticationFailed) => 2,
            CliError::Directory(DirectoryError::ConnectionFailed { .. }) => 3,
            CliError::Directory(DirectoryError::SearchFailed { .. }) => 5,
            CliError::Directory(DirectoryError::InvalidConfiguration { .. }) => 4,
            CliError::Export(_) => 4,
            CliError::Validation(_) => 4,
            CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting.
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Validation(format!("JSON error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_errors_exit_2() {
        let err = CliError::Push(PushError::Authentication("incorrect email/password".into()));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            CliError::Directory(DirectoryError::AuthenticationFailed).exit_code(),
            2
        );
    }

    #[test]
    fn api_errors_map_by_status() {
        let server = CliError::Push(PushError::Api {
            status: 500,
            body: String::new(),
        });
        assert_eq!(server.exit_code(), 5);

        let denied = CliError::Push(PushError::Api {
            status: 401,
            body: String::new(),
        });
        assert_eq!(denied.exit_code(), 2);

        let rejected = CliError::Push(PushError::Api {
            status: 400,
            body: String::new(),
        });
        assert_eq!(rejected.exit_code(), 4);
    }

    #[test]
    fn job_creation_errors_exit_5() {
        let err = CliError::Push(PushError::JobCreation(Box::new(PushError::Api {
            status: 400,
            body: String::new(),
        })));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn validation_errors_exit_4() {
        assert_eq!(CliError::Validation("bad".into()).exit_code(), 4);
        assert_eq!(
            CliError::Export(ExportError::MalformedCsv("bad".into())).exit_code(),
            4
        );
    }

    #[test]
    fn io_errors_exit_1() {
        assert_eq!(CliError::Io("disk full".into()).exit_code(), 1);
    }
}
