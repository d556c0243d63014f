//! Library side of the `jobtools` binary, exposed for integration tests

pub mod cli;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod registry;
pub mod tasks;

use clap::CommandFactory;
use cli::Cli;
use error::{CliError, CliResult};
use exit_codes::EXIT_SUCCESS;
use jobtools::{RunOutcome, TaskRunner};
use jobtools_config::RunnerSettings;
use registry::TaskRegistry;
use serde_json::Value;
use tracing::{debug, info_span};

/// Execute one parsed command line against `registry`
///
/// Returns the exit code the process should end with. A completed task always
/// exits with [`EXIT_SUCCESS`]; its result, unless null, goes to stdout.
pub fn execute(cli: &Cli, registry: &TaskRegistry, settings: RunnerSettings) -> CliResult<i32> {
    if cli.list {
        print!("{}", registry.listing());
        return Ok(EXIT_SUCCESS);
    }

    let (Some(module), Some(function)) = (cli.module.as_deref(), cli.function.as_deref()) else {
        Cli::command()
            .print_help()
            .map_err(|e| CliError::new(format!("Failed to print help: {e}"), exit_codes::EXIT_ERROR))?;
        return Ok(EXIT_SUCCESS);
    };

    let task = registry.resolve(module, function)?;
    let span = info_span!("task", module, function);
    let _guard = span.enter();

    let mut tokens = cli.task_args.clone();
    if cli.help {
        tokens.push("--help".to_string());
    }
    debug!("Task tokens: {:?}", tokens);

    match TaskRunner::new().with_settings(settings).run(task, &tokens)? {
        RunOutcome::Help(text) => {
            print!("{text}");
            Ok(EXIT_SUCCESS)
        }
        RunOutcome::Completed(output) => {
            print_output(&output);
            Ok(EXIT_SUCCESS)
        }
    }
}

/// Strings print bare, everything else as JSON
fn print_output(output: &Value) {
    match output {
        Value::Null => {}
        Value::String(text) => println!("{text}"),
        other => println!("{other}"),
    }
}
