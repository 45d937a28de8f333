//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `config_cmd` - Configuration file management commands
//! - `replay` - Trace replay

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::FrostpaneError;
use crate::{config, schema};

pub mod config_cmd;
pub mod replay;

pub use config_cmd::ConfigCommands;
pub use replay::ReplayArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frostpane CLI - frozen-look feedback for unresponsive windows.
#[derive(Parser, Debug)]
#[command(name = "frostpane")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace).
    ///
    /// The `FROSTPANE_LOG` environment variable takes precedence.
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Replay a lifecycle trace through the frozen-app effect.
    ///
    /// Prints every animation request the effect issued, followed by the
    /// lines reported by the harness probe.
    Replay(ReplayArgs),

    /// Configuration file management commands.
    ///
    /// Initialize, view, and watch the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Frostpane configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema {
        /// Output the schema of trace files instead.
        #[arg(long)]
        trace: bool,
    },

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(frostpane completions --shell zsh)"
    ///   frostpane completions --shell bash > ~/.local/share/bash-completion/completions/frostpane
    ///   frostpane completions --shell fish > ~/.config/fish/completions/frostpane.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), FrostpaneError> {
        // Set custom config path if provided
        if let Some(path) = &self.config {
            if !path.exists() {
                return Err(FrostpaneError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path.clone());
        }

        match &self.command {
            Commands::Replay(args) => replay::execute(args),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema { trace } => {
                let schema_output =
                    if *trace { schema::print_trace_schema() } else { schema::print_schema() };
                println!("{schema_output}");
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "frostpane", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // CLI parsing tests
    // ========================================================================

    #[test]
    fn test_cli_definition_is_valid() { Cli::command().debug_assert(); }

    #[test]
    fn test_cli_parses_replay() {
        let cli = Cli::try_parse_from(["frostpane", "replay", "trace.jsonc"]).unwrap();
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.trace, PathBuf::from("trace.jsonc"));
                assert!(!args.json);
                assert!(!args.no_harness);
            }
            _ => panic!("Expected Replay command"),
        }
    }

    #[test]
    fn test_cli_parses_replay_flags() {
        let cli =
            Cli::try_parse_from(["frostpane", "replay", "t.jsonc", "--json", "--no-harness"])
                .unwrap();
        match cli.command {
            Commands::Replay(args) => {
                assert!(args.json);
                assert!(args.no_harness);
            }
            _ => panic!("Expected Replay command"),
        }
    }

    #[test]
    fn test_cli_replay_requires_trace() {
        assert!(Cli::try_parse_from(["frostpane", "replay"]).is_err());
    }

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["frostpane", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema { trace: false }));

        let cli = Cli::try_parse_from(["frostpane", "schema", "--trace"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema { trace: true }));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["frostpane", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_parses_config_subcommands() {
        let cli = Cli::try_parse_from(["frostpane", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Path)));

        let cli = Cli::try_parse_from(["frostpane", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));

        let cli = Cli::try_parse_from(["frostpane", "config", "watch"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Watch)));
    }

    #[test]
    fn test_cli_parses_config_init_options() {
        let cli =
            Cli::try_parse_from(["frostpane", "config", "init", "--force", "--path", "/tmp/c.jsonc"])
                .unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init { force, path, stdout }) => {
                assert!(force);
                assert_eq!(path, Some(PathBuf::from("/tmp/c.jsonc")));
                assert!(!stdout);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_global_config_flag() {
        let cli =
            Cli::try_parse_from(["frostpane", "schema", "--config", "/tmp/custom.jsonc"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/custom.jsonc")));
    }

    #[test]
    fn test_cli_verbosity_levels() {
        let quiet = Cli::try_parse_from(["frostpane", "schema"]).unwrap();
        let debug = Cli::try_parse_from(["frostpane", "-v", "schema"]).unwrap();
        let trace = Cli::try_parse_from(["frostpane", "schema", "-vv"]).unwrap();

        assert_eq!(quiet.log_level(), "warn");
        assert_eq!(debug.log_level(), "debug");
        assert_eq!(trace.log_level(), "trace");
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["frostpane", "wallpaper"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "frostpane",
            "schema",
            "--config",
            "/definitely/not/here/frostpane.jsonc",
        ])
        .unwrap();
        let err = cli.execute().unwrap_err();
        assert!(matches!(err, FrostpaneError::ConfigError(_)));
    }
}
