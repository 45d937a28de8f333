//! CLI module for Frostpane.
//!
//! This module provides the command-line interface: replaying lifecycle
//! traces through the frozen-app effect, managing the configuration file,
//! and generating schemas and shell completions.
//!
//! The binary parses a [`Cli`], sets up logging from its verbosity, and then
//! calls [`Cli::execute`].

mod commands;
mod output;

pub use commands::Cli;
