//! Error handling for the jobtools CLI
//!
//! Engine and registry errors are folded into a [`CliError`] that keeps the
//! underlying error as its source and carries the exit code to use.

use std::error::Error;
use std::fmt;

use crate::exit_codes::EXIT_ERROR;
use crate::registry::RegistryError;
use jobtools::{BindingError, RunError};
use jobtools_common::{ErrorSeverity, Severity};
use jobtools_config::ConfigError;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// An error message, its exit code and the error it came from
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    fn wrap<E>(error: E) -> Self
    where
        E: Error + Severity + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            exit_code: exit_code_for(error.severity()),
            source: Some(Box::new(error)),
        }
    }

    /// Message followed by every cause below the immediate source
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        // The immediate source produced `message`; start one level down
        let mut current = self.source().and_then(|e| e.source());
        while let Some(err) = current {
            result.push_str(&format!("\n  Caused by: {err}"));
            current = err.source();
        }

        result
    }
}

fn exit_code_for(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Error | ErrorSeverity::Critical => EXIT_ERROR,
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<BindingError> for CliError {
    fn from(error: BindingError) -> Self {
        Self::wrap(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::wrap(error)
    }
}

impl From<RegistryError> for CliError {
    fn from(error: RegistryError) -> Self {
        Self::wrap(error)
    }
}

impl From<RunError> for CliError {
    fn from(error: RunError) -> Self {
        match error {
            RunError::Binding(error) => error.into(),
            RunError::Task(error) => {
                let mut message = error.to_string();
                for cause in error.chain().skip(1) {
                    message.push_str(&format!("\n  Caused by: {cause}"));
                }
                Self::new(message, EXIT_ERROR)
            }
        }
    }
}

/// Convert a CliResult to an exit code, logging the full error chain if needed
pub fn handle_cli_result(result: CliResult<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e.full_chain());
            e.exit_code
        }
    }
}
