//! Error types for Frostpane.
//!
//! Module-level errors ([`ConfigError`], [`TraceError`]) carry
//! their own detail. This module aggregates them into the single error type
//! returned from CLI commands.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::trace::TraceError;

/// Errors that can occur while running a CLI command.
///
/// Serializes as `{ "kind": ..., "message": ... }` so `--json` output can
/// report failures in the same shape as results.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum FrostpaneError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Trace loading or replay failed.
    #[error("Trace error: {0}")]
    TraceError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for FrostpaneError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for FrostpaneError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for FrostpaneError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<TraceError> for FrostpaneError {
    fn from(err: TraceError) -> Self { Self::TraceError(err.to_string()) }
}
