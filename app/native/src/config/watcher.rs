//! Configuration file watcher for hot-reloading.
//!
//! This module watches the active configuration file and reloads it when it
//! changes. Every successful reload is handed to a callback, which is how
//! effects pick up new durations without restarting animations in flight.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::{FrostpaneConfig, get_config_path, reload_from_path};

/// Debounce duration for config file changes.
/// Some editors trigger multiple events per save (write to temp, rename, etc.).
const CONFIG_DEBOUNCE_MS: u64 = 200;

/// Handle to the background watcher thread.
#[derive(Debug)]
pub struct ConfigWatcher {
    path: PathBuf,
    thread: JoinHandle<()>,
}

impl ConfigWatcher {
    /// Returns the watched configuration file.
    #[must_use]
    pub fn path(&self) -> &PathBuf { &self.path }

    /// Blocks until the watcher thread exits.
    pub fn join(self) {
        if self.thread.join().is_err() {
            tracing::warn!("config watcher thread panicked");
        }
    }
}

/// Starts watching the configuration file for changes.
///
/// When the config file is modified, it is reloaded and `on_change` receives
/// the new configuration. Failed reloads are logged and keep the previous
/// configuration active.
///
/// Returns `None` when no configuration file is loaded or the watcher could
/// not be created.
pub fn watch_config_file<F>(on_change: F) -> Option<ConfigWatcher>
where
    F: Fn(Arc<FrostpaneConfig>) + Send + 'static,
{
    let Some(config_path) = get_config_path() else {
        tracing::debug!("no config file loaded, nothing to watch");
        return None;
    };

    let config_filename =
        config_path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    let (tx, rx) = std::sync::mpsc::channel();

    let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
        Ok(w) => w,
        Err(err) => {
            tracing::warn!(error = %err, "failed to create config watcher");
            return None;
        }
    };

    // Watch the parent directory to catch editors that save by renaming a temp file
    let watch_path = config_path.parent().unwrap_or(&config_path).to_path_buf();
    if let Err(err) = watcher.watch(&watch_path, RecursiveMode::NonRecursive) {
        tracing::warn!(error = %err, path = %watch_path.display(), "failed to watch config file");
        return None;
    }

    let watched = config_path.clone();
    let thread = std::thread::spawn(move || {
        let config_path = watched;
        // The watcher stops when dropped, so it lives on this thread
        let _watcher = watcher;
        let mut last_event_time: Option<Instant> = None;
        let debounce_duration = Duration::from_millis(CONFIG_DEBOUNCE_MS);

        loop {
            match rx.recv() {
                Ok(Ok(event)) => {
                    let affects_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().is_some_and(|name| name == config_filename));
                    if !affects_config {
                        continue;
                    }

                    let now = Instant::now();
                    if last_event_time.is_some_and(|t| now.duration_since(t) < debounce_duration) {
                        continue;
                    }
                    last_event_time = Some(now);

                    reload_and_notify(&config_path, &on_change);
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "config watch error");
                }
                Err(_) => {
                    // Channel closed, watcher dropped
                    break;
                }
            }
        }
    });

    Some(ConfigWatcher { path: config_path, thread })
}

/// Reloads `path` and hands the new configuration to `on_change`.
///
/// Returns whether the reload succeeded.
fn reload_and_notify<F>(path: &Path, on_change: &F) -> bool
where
    F: Fn(Arc<FrostpaneConfig>),
{
    match reload_from_path(path) {
        Ok(config) => {
            on_change(config);
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "config reload failed");
            false
        }
    }
}
