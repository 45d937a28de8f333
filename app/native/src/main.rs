#![allow(clippy::multiple_crate_versions)]

//! Frostpane command-line entry point.
//!
//! Parses arguments, installs the log subscriber, and runs the requested
//! command. Logs go to stderr so command output on stdout stays clean.

use clap::Parser;
use frostpane_lib::cli::Cli;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "FROSTPANE_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    if let Err(err) = cli.execute() {
        eprintln!("frostpane: {err}");
        std::process::exit(1);
    }
}

/// Installs the global tracing subscriber.
///
/// `FROSTPANE_LOG` takes precedence over the verbosity flags.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
