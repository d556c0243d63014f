//! Compiled-in task modules
//!
//! Stands in for module resolution: a module is a named group of tasks, looked
//! up either by dotted name (`demo`, `reports.daily`) or by a path to its
//! source file (`tasks/demo.rs`).

use jobtools::{Callable, Task};
use serde_json::Value;
use jobtools_common::{ErrorSeverity, Severity};
use std::collections::BTreeMap;
use std::path::{Path, MAIN_SEPARATOR};
use thiserror::Error;
use tracing::debug;

/// Tasks bundled into the binary; a non-null result is printed on stdout
pub type CliTask = Task<Value>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("No task module matches '{module}'")]
    UnknownModule { module: String },

    #[error("Module '{module}' has no function '{function}' (available: {})", .available.join(", "))]
    UnknownFunction {
        module: String,
        function: String,
        available: Vec<String>,
    },
}

impl Severity for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

#[derive(Debug, Default)]
pub struct TaskRegistry {
    modules: BTreeMap<String, BTreeMap<String, CliTask>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task` under `module`, keyed by its signature name
    pub fn register(&mut self, module: impl Into<String>, task: CliTask) -> &mut Self {
        let function = task.signature().name().to_string();
        self.modules
            .entry(module.into())
            .or_default()
            .insert(function, task);
        self
    }

    /// Module names, sorted
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn functions(&self, module: &str) -> impl Iterator<Item = &str> {
        self.modules
            .get(module)
            .into_iter()
            .flat_map(|functions| functions.keys().map(String::as_str))
    }

    /// Find the registered module named by `reference`
    ///
    /// An exact dotted name wins; otherwise the reference is read as a path,
    /// its extension dropped and separators turned into dots, and the module
    /// whose name ends that dotted form is chosen.
    pub fn resolve_module(&self, reference: &str) -> Result<&str, RegistryError> {
        if let Some((name, _)) = self.modules.get_key_value(reference) {
            return Ok(name);
        }

        let dotted = dotted_from_path(reference);
        debug!("Module '{}' read as '{}'", reference, dotted);
        self.modules
            .keys()
            .find(|name| dotted == **name || dotted.ends_with(&format!(".{name}")))
            .map(String::as_str)
            .ok_or_else(|| RegistryError::UnknownModule {
                module: reference.to_string(),
            })
    }

    pub fn resolve(&self, module: &str, function: &str) -> Result<&CliTask, RegistryError> {
        let name = self.resolve_module(module)?;
        let functions = self
            .modules
            .get(name)
            .ok_or_else(|| RegistryError::UnknownModule {
                module: module.to_string(),
            })?;
        functions
            .get(function)
            .ok_or_else(|| RegistryError::UnknownFunction {
                module: name.to_string(),
                function: function.to_string(),
                available: functions.keys().cloned().collect(),
            })
    }

    /// One `module function` line per registered task
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (module, functions) in &self.modules {
            for function in functions.keys() {
                out.push_str(&format!("{module} {function}\n"));
            }
        }
        out
    }
}

fn dotted_from_path(reference: &str) -> String {
    let path = Path::new(reference);
    let stripped = match path.extension() {
        Some(_) => path.with_extension(""),
        None => path.to_path_buf(),
    };
    stripped
        .to_string_lossy()
        .replace(['/', MAIN_SEPARATOR], ".")
        .trim_start_matches('.')
        .to_string()
}
