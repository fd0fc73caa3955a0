//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::from(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::Document { .. } => crate::exitcode::DATAERR,
                    ApplicationError::UnsupportedFormat(_) => crate::exitcode::NOINPUT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_domain_error_when_mapping_exit_code_then_data_error() {
        let err: CliError = DomainError::UnknownLeaf("x".into()).into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_usage_error_when_mapping_exit_code_then_usage() {
        assert_eq!(
            CliError::Usage("bad".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
