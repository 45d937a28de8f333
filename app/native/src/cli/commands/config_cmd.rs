//! Config CLI commands.
//!
//! Commands for managing the Frostpane configuration file.

use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, FrostpaneConfig, config_paths};
use crate::effects::FrozenAppTimings;
use crate::error::FrostpaneError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Creates a new configuration file at the default location with all
    /// available options commented out.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  frostpane config init              # Create config at default location
  frostpane config init --force      # Overwrite existing config
  frostpane config init --path ~/my-config.jsonc  # Create at custom path
  frostpane config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses ~/.config/frostpane/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long, conflicts_with_all = ["force", "path"])]
        stdout: bool,
    },

    /// Show the path to the configuration file.
    ///
    /// Displays the paths where Frostpane looks for configuration files,
    /// and indicates which one is currently in use (if any).
    Path,

    /// Show the active configuration and the durations derived from it.
    Show,

    /// Watch the configuration file and print the derived durations on every change.
    ///
    /// Runs until interrupted.
    Watch,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), FrostpaneError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                print_config_template()
            } else {
                init_config(*force, path.clone())
            }
        }
        ConfigCommands::Path => show_config_path(),
        ConfigCommands::Show => show_config(),
        ConfigCommands::Watch => watch_config(),
    }
}

/// Print the configuration template to stdout.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
fn print_config_template() -> Result<(), FrostpaneError> {
    println!("{}", generate_config_template());
    Ok(())
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), FrostpaneError> {
    let config_path = custom_path.unwrap_or_else(|| {
        // Use the first config path (preferred location)
        config_paths()
            .into_iter()
            .next()
            .unwrap_or_else(|| PathBuf::from("config.jsonc"))
    });

    if config_path.exists() && !force {
        return Err(FrostpaneError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|e| {
        FrostpaneError::ConfigError(format!(
            "Failed to create config file {}: {e}",
            config_path.display()
        ))
    })?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAll options are commented out by default.");
    println!("Edit the file and uncomment the options you want to configure.");

    Ok(())
}

/// Show the configuration file search paths.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
fn show_config_path() -> Result<(), FrostpaneError> {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)".green().to_string()
        } else if exists {
            " (exists)".dimmed().to_string()
        } else {
            String::new()
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found.");
        println!("Run 'frostpane config init' to create one.");
    }

    Ok(())
}

/// Print the active configuration.
fn show_config() -> Result<(), FrostpaneError> {
    let config = config::get_config();
    match config::get_config_path() {
        Some(path) => println!("{} {}\n", "Loaded from".bold(), path.display()),
        None => println!("{}\n", "Using built-in defaults".bold()),
    }

    output::print_highlighted_json(&serde_json::to_value(&*config)?);
    println!();
    print_timings(&config);
    Ok(())
}

/// Watch the configuration file until interrupted.
fn watch_config() -> Result<(), FrostpaneError> {
    let config = config::get_config();
    print_timings(&config);

    let watcher = config::watch_config_file(|config| {
        println!("\n{}", "Configuration reloaded".green().bold());
        print_timings(&config);
    })
    .ok_or_else(|| {
        FrostpaneError::ConfigError(
            "No configuration file to watch. Run 'frostpane config init' to create one."
                .to_string(),
        )
    })?;

    println!("\nWatching {} (Ctrl+C to stop)", watcher.path().display());
    watcher.join();
    Ok(())
}

/// Prints the durations the frozen-app effect derives from `config`.
fn print_timings(config: &FrostpaneConfig) {
    let timings = FrozenAppTimings::from_config(config);
    println!("frozenApp  {}", output::format_bool(config.frozen_app.is_enabled()));
    println!("  fade in   {} ms", timings.in_duration.as_millis().to_string().yellow());
    println!("  fade out  {} ms", timings.out_duration.as_millis().to_string().yellow());
    println!(
        "  look      saturation {} brightness {}",
        timings.look.saturation.to_string().yellow(),
        timings.look.brightness.to_string().yellow()
    );
}
