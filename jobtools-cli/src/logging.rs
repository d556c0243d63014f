//! Tracing subscriber set-up for the binary

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Level from the command-line switches, falling back to the configured one
///
/// `--quiet` wins over `--debug`. An unparseable configured level means
/// `info`.
pub fn select_level(debug: bool, quiet: bool, configured: &str) -> Level {
    if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else {
        configured.parse().unwrap_or(Level::INFO)
    }
}

/// Install the global subscriber, writing to stderr
///
/// `RUST_LOG` directives, when set, are added on top of the selected level.
pub fn configure_logging(level: Level) {
    let mut filter = EnvFilter::new(level.to_string());
    if let Ok(directives) = std::env::var(EnvFilter::DEFAULT_ENV) {
        for directive in directives.split(',').filter_map(|d| d.parse().ok()) {
            filter = filter.add_directive(directive);
        }
    }

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}
