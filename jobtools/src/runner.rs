//! Spec build → parse → call

use crate::arguments::TaskArguments;
use crate::coercion::TypeCoercer;
use crate::error::BindingError;
use crate::parser::{CliParser, ParseOutcome, ParsedArguments};
use crate::signature::Callable;
use crate::spec::{ArgumentSpec, ArgumentSpecBuilder};
use jobtools_common::{ErrorSeverity, Pretty, Severity};
use jobtools_config::RunnerSettings;
use thiserror::Error;
use tracing::{debug, info, info_span};

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<T> {
    /// The task ran and returned this
    Completed(T),
    /// Help was requested; the task was not called
    Help(String),
}

impl<T> RunOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            RunOutcome::Completed(value) => Some(value),
            RunOutcome::Help(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// The task itself failed; passed through untouched
    #[error(transparent)]
    Task(anyhow::Error),
}

impl Severity for RunError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RunError::Binding(error) => error.severity(),
            RunError::Task(_) => ErrorSeverity::Error,
        }
    }
}

/// Binds a callable to command-line tokens and invokes it
#[derive(Debug, Clone, Default)]
pub struct TaskRunner {
    settings: RunnerSettings,
    arguments: Option<TaskArguments>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: RunnerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Call with these values instead of parsing tokens
    pub fn with_arguments(mut self, arguments: TaskArguments) -> Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    fn coercer(&self) -> TypeCoercer {
        TypeCoercer::with_settings(&self.settings)
    }

    pub fn spec<C: Callable + ?Sized>(&self, task: &C) -> Result<ArgumentSpec, BindingError> {
        ArgumentSpecBuilder::build(task)
    }

    /// Parse `tokens` for `task` without calling it
    pub fn bind<C, S>(&self, task: &C, tokens: &[S]) -> Result<ParseOutcome, BindingError>
    where
        C: Callable + ?Sized,
        S: AsRef<str>,
    {
        let spec = self.spec(task)?;
        match &self.arguments {
            Some(arguments) => arguments
                .resolve(&spec, &self.coercer())
                .map(ParseOutcome::Parsed),
            None => CliParser::new(self.coercer()).parse(tokens, &spec),
        }
    }

    pub fn run<C, S>(&self, task: &C, tokens: &[S]) -> Result<RunOutcome<C::Output>, RunError>
    where
        C: Callable + ?Sized,
        S: AsRef<str>,
    {
        let signature = task.signature();
        let span = info_span!("task", task = signature.name());
        let _guard = span.enter();

        let args = match self.bind(task, tokens)? {
            ParseOutcome::Help(text) => return Ok(RunOutcome::Help(text)),
            ParseOutcome::Parsed(args) => args,
        };

        self.dispatch(task, args).map(RunOutcome::Completed)
    }

    /// Run with the process arguments, skipping the program name
    pub fn run_from_env<C: Callable + ?Sized>(
        &self,
        task: &C,
    ) -> Result<RunOutcome<C::Output>, RunError> {
        let tokens: Vec<String> = std::env::args().skip(1).collect();
        self.run(task, &tokens)
    }

    /// Rendered help for `task`
    pub fn display_help<C: Callable + ?Sized>(&self, task: &C) -> Result<String, BindingError> {
        Ok(self.spec(task)?.render_help())
    }

    fn dispatch<C: Callable + ?Sized>(
        &self,
        task: &C,
        args: ParsedArguments,
    ) -> Result<C::Output, RunError> {
        debug!("Arguments: {}", Pretty(&args));
        info!("Starting task");
        let output = task.call(args).map_err(RunError::Task)?;
        info!("Task finished");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{Signature, Task};
    use crate::types::DeclaredType;

    fn add() -> Task<i64> {
        Task::new(
            Signature::new("add")
                .param("value1", DeclaredType::Integer)
                .optional("value2", DeclaredType::Integer, 1),
            |args| Ok(args.fetch::<i64>("value1")? + args.fetch::<i64>("value2")?),
        )
    }

    #[test]
    fn test_run_calls_task() {
        let outcome = TaskRunner::new().run(&add(), &["--value1", "2"]).unwrap();
        assert_eq!(outcome, RunOutcome::Completed(3));
    }

    #[test]
    fn test_help_skips_task() {
        let outcome = TaskRunner::new().run(&add(), &["--help"]).unwrap();
        assert!(matches!(outcome, RunOutcome::Help(ref text) if text.contains("--value1 VALUE1")));
    }

    #[test]
    fn test_binding_errors_prevent_call() {
        let task = Task::new(
            Signature::new("never").param("x", DeclaredType::Integer),
            |_| -> anyhow::Result<()> { panic!("must not be called") },
        );
        let error = TaskRunner::new().run(&task, &["--x", "one"]).unwrap_err();
        assert!(matches!(error, RunError::Binding(BindingError::InvalidArgumentValue { .. })));
    }

    #[test]
    fn test_task_errors_pass_through() {
        let task = Task::new(Signature::new("fail"), |_| -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        });
        let error = TaskRunner::new().run(&task, &[] as &[&str]).unwrap_err();
        assert!(matches!(error, RunError::Task(_)));
        assert_eq!(error.to_string(), "disk full");
    }

    #[test]
    fn test_with_arguments_bypasses_tokens() {
        let runner = TaskRunner::new().with_arguments(TaskArguments::new().with("value1", 40));
        let outcome = runner.run(&add(), &[] as &[&str]).unwrap();
        assert_eq!(outcome.completed(), Some(41));
    }
}
