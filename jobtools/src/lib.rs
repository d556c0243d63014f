//! # Jobtools
//!
//! Turn a typed task signature into a command-line interface.
//!
//! A task declares its parameters once, as a [`Signature`]. From it the binder
//! derives flags (`max_buffer` → `--max-buffer`), decides which are required
//! (no default) and which are optional, coerces each raw token into the
//! declared type, and calls the task with the result.
//!
//! ```
//! use jobtools::{DeclaredType, RunOutcome, Signature, Task, TaskRunner};
//!
//! let task = Task::new(
//!     Signature::new("f")
//!         .param("name", DeclaredType::String)
//!         .param("max_buffer", DeclaredType::Integer)
//!         .optional("optional_arg", DeclaredType::Integer, 10),
//!     |args| Ok(args.fetch::<i64>("max_buffer")? + args.fetch::<i64>("optional_arg")?),
//! );
//!
//! let outcome = TaskRunner::new().run(&task, &["--name", "a b", "--max-buffer", "1024"])?;
//! assert_eq!(outcome, RunOutcome::Completed(1034));
//! # Ok::<(), jobtools::RunError>(())
//! ```
//!
//! Supported parameter types are booleans, integers, floats, strings,
//! delimited lists, [`string_enum!`] enumerations, namespaces loaded from YAML
//! or JSON files, and any type with a registered converter
//! ([`DeclaredType::user`]).

pub mod arguments;
pub mod coercion;
pub mod error;
pub mod naming;
pub mod parser;
pub mod runner;
pub mod signature;
pub mod spec;
pub mod types;

pub use arguments::{ProvidedValue, TaskArguments};
pub use coercion::TypeCoercer;
pub use error::{BindingError, BindingResult};
pub use parser::{CliParser, ParseOutcome, ParsedArguments};
pub use runner::{RunError, RunOutcome, TaskRunner};
pub use signature::{
    Callable, ParameterDescriptor, ParameterKind, RawParameter, Signature, SignatureInspector,
    Task,
};
pub use spec::{ArgumentEntry, ArgumentSpec, ArgumentSpecBuilder};
pub use types::{
    ArgValue, ChoiceMember, ChoiceTable, ChoiceValue, CustomValue, DeclaredType, FromArgValue,
    StringEnum, UserType,
};

pub use jobtools_config::{
    ConfigError, NamespaceValue, NestedConfigLoader, NestedNamespace, RunnerSettings,
};
