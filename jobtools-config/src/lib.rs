//! # Jobtools Config
//!
//! Two kinds of configuration live here:
//!
//! - **Task configuration**: YAML or JSON documents handed to a task through a
//!   namespace-typed parameter. They decode into a [`NestedNamespace`], a
//!   recursive mapping with dotted-path access, and can be written back out.
//! - **Runner settings**: the binder's own knobs ([`RunnerSettings`]), layered
//!   from defaults, an optional `jobtools.*` file and `JOBTOOLS_*` environment
//!   variables through figment.
//!
//! ```no_run
//! use jobtools_config::NestedNamespace;
//!
//! let params = NestedNamespace::load("params.yml")?;
//! let budget = params.get_i64("budget");
//! let origin = params.get_str("trips.origin");
//! # Ok::<(), jobtools_config::ConfigError>(())
//! ```

pub mod error;
pub mod format;
pub mod loader;
pub mod namespace;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use format::ConfigFormat;
pub use loader::NestedConfigLoader;
pub use namespace::{NamespaceValue, NestedNamespace};
pub use settings::RunnerSettings;
