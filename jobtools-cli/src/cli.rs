use clap::{ArgAction, Parser};

/// Run a task, binding its parameters to command-line flags
#[derive(Parser, Debug)]
#[command(name = "jobtools")]
#[command(version)]
#[command(disable_help_flag = true)]
#[command(about = "Run a task, binding its parameters to command-line flags")]
#[command(long_about = "
jobtools runs a registered task function, turning each of its parameters into
a long flag: a parameter named max_buffer is given as --max-buffer <value>.
Parameters without a default are required.

Use `jobtools <MODULE> <FUNCTION> --help` to see a task's flags and
`jobtools --list` to see every registered task.

Example:
  jobtools demo print --name sometext --params params.yml
")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// List registered modules and functions, then exit
    #[arg(long)]
    pub list: bool,

    /// Print help; after <MODULE> <FUNCTION>, print the task's flags instead
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub help: bool,

    /// Module name (dotted) or path to the module's source file
    #[arg(required_unless_present_any = ["list", "help"])]
    pub module: Option<String>,

    /// Function to run
    #[arg(required_unless_present_any = ["list", "help"])]
    pub function: Option<String>,

    /// Task flags, passed through untouched
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub task_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_flags_are_passed_through() {
        let cli = Cli::try_parse_from([
            "jobtools", "--debug", "demo", "print", "--name", "x", "--help",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.module.as_deref(), Some("demo"));
        assert_eq!(cli.function.as_deref(), Some("print"));
        assert_eq!(cli.task_args, vec!["--name", "x", "--help"]);
    }

    #[test]
    fn test_list_needs_no_module() {
        let cli = Cli::try_parse_from(["jobtools", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.module.is_none());
    }

    #[test]
    fn test_help_before_task_flags_is_kept() {
        let cli = Cli::try_parse_from(["jobtools", "demo", "print", "--help"]).unwrap();
        assert!(cli.help);
        assert_eq!(cli.function.as_deref(), Some("print"));
        assert!(cli.task_args.is_empty());

        let cli = Cli::try_parse_from(["jobtools", "-h"]).unwrap();
        assert!(cli.help);
        assert!(cli.module.is_none());
    }

    #[test]
    fn test_module_and_function_required() {
        assert!(Cli::try_parse_from(["jobtools", "demo"]).is_err());
    }
}
