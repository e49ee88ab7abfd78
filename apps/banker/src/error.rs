//! CLI error handling

use std::borrow::Cow;
use std::fmt;

use banker_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(banker_errors::ConfigError),
    /// Loading or evaluating a state failed
    Evaluation(banker_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Evaluation(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl UserFacingError for CliError {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            CliError::Config(e) => e.user_message(),
            CliError::Evaluation(e) => e.user_message(),
            CliError::Io(e) => Cow::Owned(e.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            CliError::Config(e) => e.user_hint(),
            CliError::Evaluation(e) => e.user_hint(),
            CliError::Io(_) => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            CliError::Evaluation(e) => e.is_retryable(),
            CliError::Config(_) => false,
            CliError::Io(_) => true,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            CliError::Config(e) => e.user_code(),
            CliError::Evaluation(e) => e.user_code(),
            CliError::Io(_) => Some("error.io"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Evaluation(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<banker_errors::ConfigError> for CliError {
    fn from(e: banker_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<banker_errors::Error> for CliError {
    fn from(e: banker_errors::Error) -> Self {
        match e {
            banker_errors::Error::Config(e) => CliError::Config(e),
            other => CliError::Evaluation(other),
        }
    }
}

impl From<banker_errors::StateLoadError> for CliError {
    fn from(e: banker_errors::StateLoadError) -> Self {
        CliError::Evaluation(e.into())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
