//! Logging setup
//!
//! Routes `tracing` events to stderr. `RUST_LOG` wins when set; otherwise
//! the CLI verbosity picks the level.

use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

/// Filter directive for a verbosity level
pub fn filter_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn,opencanvas=info",
        Verbosity::Verbose => "info,opencanvas=debug",
        Verbosity::VeryVerbose => "debug,opencanvas=trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init(verbosity: Verbosity, color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(matches!(verbosity, Verbosity::VeryVerbose))
        .try_init();
}
