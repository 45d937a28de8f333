//! Configuration module for Frostpane.
//!
//! This module provides configuration types, loading functionality, and file watching
//! for hot-reloading configuration changes.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.
//!
//! Unlike a load-once setting, the active configuration can be replaced at
//! runtime with [`reload_from_path`]. Readers receive an `Arc` snapshot, so a reload
//! never changes values under an effect that is mid-request.

pub mod template;
pub mod types;
mod watcher;

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
pub use types::{
    ConfigError, DEFAULT_FADE_IN_MS, DEFAULT_FADE_OUT_MS, DEFAULT_FROZEN_BRIGHTNESS,
    DEFAULT_FROZEN_SATURATION, FrostpaneConfig, FrozenAppConfig, config_paths,
    load_config as load_config_default, load_config_from_path, parse_config,
};
pub use watcher::{ConfigWatcher, watch_config_file};

/// Active configuration, replaced on reload.
static CONFIG: OnceLock<RwLock<Arc<FrostpaneConfig>>> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<RwLock<Option<PathBuf>>> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

fn config_cell() -> &'static RwLock<Arc<FrostpaneConfig>> {
    CONFIG.get_or_init(|| RwLock::new(Arc::new(load_or_default())))
}

fn path_cell() -> &'static RwLock<Option<PathBuf>> { CONFIG_PATH.get_or_init(|| RwLock::new(None)) }

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before the first `get_config()` to take effect.
///
/// # Returns
///
/// `true` if the path was set successfully, `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads the configuration from the custom path or the default search paths.
fn load() -> Result<(FrostpaneConfig, PathBuf), ConfigError> {
    CUSTOM_CONFIG_PATH.get().map_or_else(load_config_default, |path| load_config_from_path(path))
}

/// Loads the configuration from disk.
///
/// Returns the loaded configuration, or a default configuration if loading fails.
fn load_or_default() -> FrostpaneConfig {
    match load() {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            *path_cell().write() = Some(path);
            config
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            FrostpaneConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            FrostpaneConfig::default()
        }
    }
}

/// Returns a snapshot of the active configuration, loading it if necessary.
///
/// If no configuration file is found, returns the default configuration.
#[must_use]
pub fn get_config() -> Arc<FrostpaneConfig> { Arc::clone(&config_cell().read()) }

/// Returns the path to the loaded configuration file, if any.
#[must_use]
pub fn get_config_path() -> Option<PathBuf> {
    // Make sure the initial load has happened.
    let _ = config_cell();
    path_cell().read().clone()
}

/// Reads `path` and makes it the active configuration.
///
/// On failure the previous configuration stays active.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn reload_from_path(path: &Path) -> Result<Arc<FrostpaneConfig>, ConfigError> {
    let (config, path) = load_config_from_path(path)?;
    Ok(activate(config, path))
}

fn activate(config: FrostpaneConfig, path: PathBuf) -> Arc<FrostpaneConfig> {
    let config = Arc::new(config);

    *config_cell().write() = Arc::clone(&config);
    *path_cell().write() = Some(path);

    tracing::info!("configuration reloaded");
    config
}
