use clap::Parser;
use jobtools_cli::cli::Cli;
use jobtools_cli::error::{handle_cli_result, CliError};
use jobtools_cli::logging::{configure_logging, select_level};
use jobtools_cli::tasks::builtin_registry;
use jobtools_config::RunnerSettings;
use std::process;

fn main() {
    let cli = Cli::parse();

    let (settings, settings_error) = match RunnerSettings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (RunnerSettings::default(), Some(e)),
    };
    configure_logging(select_level(cli.debug, cli.quiet, &settings.log_level));

    // Settings problems are reported once logging is up
    if let Some(error) = settings_error {
        process::exit(handle_cli_result(Err(CliError::from(error))));
    }

    let registry = builtin_registry();
    let code = handle_cli_result(jobtools_cli::execute(&cli, &registry, settings));
    process::exit(code);
}
