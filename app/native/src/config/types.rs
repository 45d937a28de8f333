//! Configuration types for Frostpane.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Defaults
// ============================================================================

/// Base fade-in time of the frozen look, before speed scaling (ms).
pub const DEFAULT_FADE_IN_MS: u64 = 1500;

/// Base fade-out time of the frozen look, before speed scaling (ms).
pub const DEFAULT_FADE_OUT_MS: u64 = 250;

/// Saturation applied to unresponsive windows.
pub const DEFAULT_FROZEN_SATURATION: f64 = 0.1;

/// Brightness applied to unresponsive windows.
pub const DEFAULT_FROZEN_BRIGHTNESS: f64 = 1.5;

/// Largest accepted animation-speed factor.
pub const MAX_ANIMATION_SPEED: f64 = 20.0;

// ============================================================================
// Frozen App Effect
// ============================================================================

/// Configuration of the frozen-app effect.
///
/// Controls how unresponsive windows are desaturated and brightened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FrozenAppConfig {
    /// Whether the effect is enabled.
    /// Default: true
    pub enabled: bool,

    /// Time to fade into the frozen look, in milliseconds, before the
    /// global animation speed is applied.
    /// Default: 1500
    pub fade_in_ms: u64,

    /// Time to fade back to normal, in milliseconds, before the global
    /// animation speed is applied.
    /// Default: 250
    pub fade_out_ms: u64,

    /// Saturation of a frozen window (0.0 = grayscale, 1.0 = unchanged).
    /// Default: 0.1
    pub saturation: f64,

    /// Brightness multiplier of a frozen window (1.0 = unchanged).
    /// Default: 1.5
    pub brightness: f64,
}

impl Default for FrozenAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fade_in_ms: DEFAULT_FADE_IN_MS,
            fade_out_ms: DEFAULT_FADE_OUT_MS,
            saturation: DEFAULT_FROZEN_SATURATION,
            brightness: DEFAULT_FROZEN_BRIGHTNESS,
        }
    }
}

impl FrozenAppConfig {
    /// Returns whether the effect is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool { self.enabled }

    /// Returns the unscaled fade-in duration.
    #[must_use]
    pub const fn fade_in(&self) -> Duration { Duration::from_millis(self.fade_in_ms) }

    /// Returns the unscaled fade-out duration.
    #[must_use]
    pub const fn fade_out(&self) -> Duration { Duration::from_millis(self.fade_out_ms) }
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure for Frostpane.
///
/// This is the top-level configuration object that contains all configurable
/// settings. Missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FrostpaneConfig {
    /// Global animation-speed factor applied to every effect duration.
    /// 1.0 is normal speed, 0.5 is twice as fast, 0 disables transitions.
    /// Default: 1.0
    pub animation_speed: f64,

    /// Frozen-app effect configuration.
    pub frozen_app: FrozenAppConfig,
}

impl Default for FrostpaneConfig {
    fn default() -> Self {
        Self {
            animation_speed: 1.0,
            frozen_app: FrozenAppConfig::default(),
        }
    }
}

impl FrostpaneConfig {
    /// Checks value ranges that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.animation_speed.is_finite()
            || !(0.0..=MAX_ANIMATION_SPEED).contains(&self.animation_speed)
        {
            return Err(ConfigError::Invalid(format!(
                "animationSpeed must be between 0 and {MAX_ANIMATION_SPEED}, got {}",
                self.animation_speed
            )));
        }

        let frozen = &self.frozen_app;
        if !frozen.saturation.is_finite() || !(0.0..=1.0).contains(&frozen.saturation) {
            return Err(ConfigError::Invalid(format!(
                "frozenApp.saturation must be between 0 and 1, got {}",
                frozen.saturation
            )));
        }
        if !frozen.brightness.is_finite() || frozen.brightness <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "frozenApp.brightness must be greater than 0, got {}",
                frozen.brightness
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/frostpane/config.jsonc \
         or ~/.frostpane.jsonc"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The configuration file parsed but holds out-of-range values.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".frostpane.jsonc", ".frostpane.json"];

/// Application directory name inside config directories.
const APP_DIR: &str = "frostpane";

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/frostpane/config.jsonc` (when set)
/// 2. `~/.config/frostpane/config.jsonc`
/// 3. The platform config directory (e.g. `~/Library/Application Support/frostpane/`)
/// 4. `~/.frostpane.jsonc` or `~/.frostpane.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let app_dir = PathBuf::from(xdg_config).join(APP_DIR);
        for filename in CONFIG_FILE_NAMES {
            paths.push(app_dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let app_dir = home.join(".config").join(APP_DIR);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            // XDG_CONFIG_HOME might be ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join(APP_DIR);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Parses and validates configuration text in JSONC format.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` for malformed JSON and
/// `ConfigError::Invalid` for out-of-range values.
pub fn parse_config(text: &str) -> Result<FrostpaneConfig, ConfigError> {
    let reader = json_comments::StripComments::new(text.as_bytes());
    let config: FrostpaneConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, otherwise
/// the I/O, parse or validation error.
pub fn load_config_from_path(path: &Path) -> Result<(FrostpaneConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let text = fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Returns
///
/// Returns `Ok((FrostpaneConfig, PathBuf))` if a configuration file was found and parsed.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected
/// locations, or the error of the first file that exists but fails to load.
pub fn load_config() -> Result<(FrostpaneConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}
