//! Binding errors
//!
//! Everything here stems from the caller's input or the task's signature, so
//! none of it is retried. Signature problems are reported before any token is
//! looked at.

use jobtools_common::{ErrorSeverity, Severity};
use jobtools_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for binding operations
pub type BindingResult<T> = Result<T, BindingError>;

#[derive(Error, Debug)]
pub enum BindingError {
    /// A parameter has no type to coerce into
    #[error("Parameter '{parameter}' of '{task}' has no type annotation")]
    MissingTypeAnnotation { task: String, parameter: String },

    /// A variadic parameter, or a name that cannot be spelled as a flag
    #[error("Parameter '{parameter}' of '{task}' cannot be bound: {reason}")]
    UnsupportedParameterKind {
        task: String,
        parameter: String,
        reason: String,
    },

    #[error("Parameter '{parameter}' is declared more than once in '{task}'")]
    DuplicateParameter { task: String, parameter: String },

    #[error("Unrecognized argument: {token}")]
    UnknownArgument { token: String },

    /// Every required flag that was not supplied
    #[error("The following arguments are required: {}", .flags.join(", "))]
    MissingRequiredArgument { flags: Vec<String> },

    #[error("Argument {flag}: expected one argument")]
    MissingArgumentValue { flag: String },

    #[error("Argument {flag}: invalid {expected} value '{token}': {reason}{}", render_choices(.choices))]
    InvalidArgumentValue {
        flag: String,
        token: String,
        expected: String,
        reason: String,
        choices: Vec<String>,
    },

    /// The file behind a namespace flag could not be read or decoded
    #[error("Argument {flag}: failed to load '{}': {source}", .path.display())]
    ConfigLoadError {
        flag: String,
        path: PathBuf,
        source: ConfigError,
    },

    #[error("Argument {flag}: '{}' is not a YAML (.yml, .yaml) or JSON (.json) file", .path.display())]
    UnsupportedConfigFormat { flag: String, path: PathBuf },

    /// A task body asked for a parameter its signature never declared
    #[error("Parameter '{parameter}' is not bound for this call")]
    UnboundParameter { parameter: String },

    /// A typed value does not belong to the parameter's declared type
    #[error("Parameter '{parameter}' expects {expected}, got {actual}")]
    TypeMismatch {
        parameter: String,
        expected: String,
        actual: String,
    },
}

fn render_choices(choices: &[String]) -> String {
    if choices.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = choices.iter().map(|c| format!("'{c}'")).collect();
    format!(" (choose from {})", quoted.join(", "))
}

impl BindingError {
    pub(crate) fn invalid_value(
        flag: &str,
        token: &str,
        expected: &str,
        reason: impl Into<String>,
    ) -> Self {
        BindingError::InvalidArgumentValue {
            flag: flag.to_string(),
            token: token.to_string(),
            expected: expected.to_string(),
            reason: reason.into(),
            choices: Vec::new(),
        }
    }

    /// Whether the task's signature, rather than the command line, is at fault
    pub fn is_signature_error(&self) -> bool {
        matches!(
            self,
            BindingError::MissingTypeAnnotation { .. }
                | BindingError::UnsupportedParameterKind { .. }
                | BindingError::DuplicateParameter { .. }
        )
    }

    /// Flags named by the error, for callers that highlight them
    pub fn flags(&self) -> Vec<&str> {
        match self {
            BindingError::MissingRequiredArgument { flags } => {
                flags.iter().map(String::as_str).collect()
            }
            BindingError::MissingArgumentValue { flag }
            | BindingError::InvalidArgumentValue { flag, .. }
            | BindingError::ConfigLoadError { flag, .. }
            | BindingError::UnsupportedConfigFormat { flag, .. } => vec![flag.as_str()],
            BindingError::UnknownArgument { token } => vec![token.as_str()],
            _ => Vec::new(),
        }
    }
}

impl Severity for BindingError {
    fn severity(&self) -> ErrorSeverity {
        if self.is_signature_error() || matches!(self, BindingError::UnboundParameter { .. }) {
            ErrorSeverity::Critical
        } else {
            ErrorSeverity::Error
        }
    }
}
