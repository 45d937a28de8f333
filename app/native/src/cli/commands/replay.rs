//! Trace replay command.

use std::path::PathBuf;

use clap::Args;

use crate::cli::output;
use crate::config;
use crate::error::FrostpaneError;
use crate::trace::{self, ReplayOptions};

/// Arguments of `frostpane replay`.
#[derive(Args, Debug)]
#[command(after_long_help = r#"Examples:
  frostpane replay traces/freeze-and-recover.jsonc
  frostpane replay trace.jsonc --json | jq '.engineCalls'
  frostpane replay trace.jsonc --no-harness -v"#)]
pub struct ReplayArgs {
    /// Trace file to replay (JSONC).
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Print the replay report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Do not attach the harness probe.
    #[arg(long)]
    pub no_harness: bool,
}

/// Replays the trace with the active configuration and prints the report.
///
/// # Errors
///
/// Returns an error if the trace cannot be loaded or replayed.
pub fn execute(args: &ReplayArgs) -> Result<(), FrostpaneError> {
    let config = config::get_config();
    let trace = trace::load_trace(&args.trace)?;
    let options = ReplayOptions { harness: !args.no_harness };

    tracing::debug!(
        trace = %args.trace.display(),
        windows = trace.windows.len(),
        events = trace.events.len(),
        "replaying trace"
    );
    let report = trace::replay_with(&trace, &config, options)?;

    if args.json {
        output::print_highlighted_json(&serde_json::to_value(&report)?);
    } else {
        output::print_report(&report, options.harness);
    }

    Ok(())
}
