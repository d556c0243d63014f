//! # Jobtools Common
//!
//! Foundational pieces shared by every jobtools crate:
//!
//! - [`error`] - severity classification for error enums
//! - [`logging`] - helpers for rendering structured values inside log lines

pub mod error;
pub mod logging;

pub use error::{ErrorSeverity, Severity};
pub use logging::Pretty;
