//! Error classification shared across jobtools crates
//!
//! Each crate owns its own `thiserror` enum. What they share is a way to say
//! how bad a failure is, so the binary can pick exit codes and log levels
//! without knowing every variant.

use std::fmt;

/// Severity levels for error classification
///
/// - **Error**: the requested binding or run failed because of its input
/// - **Critical**: the target itself cannot be bound (e.g. an unusable signature)
///
/// # Examples
///
/// ```rust
/// use jobtools_common::ErrorSeverity;
///
/// let typo = ErrorSeverity::Error;
/// let broken_signature = ErrorSeverity::Critical;
/// assert!(broken_signature > typo);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Operation failed because of caller input; nothing else is affected
    Error,

    /// The target cannot be used at all until its definition is fixed
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorSeverity::Error => "error",
            ErrorSeverity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use jobtools_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum LoadError {
///     Unreadable,
///     UnknownSchema,
/// }
///
/// impl Severity for LoadError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             LoadError::Unreadable => ErrorSeverity::Error,
///             LoadError::UnknownSchema => ErrorSeverity::Critical,
///         }
///     }
/// }
///
/// assert_eq!(LoadError::Unreadable.severity(), ErrorSeverity::Error);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}
