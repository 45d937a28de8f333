//! Lifecycle traces.
//!
//! A trace is a JSONC document describing an initial window layout and a
//! sequence of compositor events. [`replay()`] feeds it through a
//! [`Space`](crate::compositor::Space) with the frozen-app effect and the
//! harness probe attached, and reports what the animation engine was asked
//! to do.
//!
//! ```jsonc
//! {
//!   "currentDesktop": 1,
//!   // Mapped before the effect attaches
//!   "windows": [{ "id": 1, "caption": "Editor", "unresponsive": true }],
//!   "events": [
//!     { "type": "setUnresponsive", "id": 1, "unresponsive": false },
//!     { "type": "switchDesktop", "desktop": 2 }
//!   ]
//! }
//! ```

pub mod replay;

use std::fmt;
use std::path::{Path, PathBuf};

pub use replay::{ReplayOptions, ReplayReport, replay, replay_with};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compositor::{DesktopId, NewWindow, SpaceError};
use crate::config::ConfigError;

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur when loading or replaying a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("failed to read trace {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The trace is not valid JSON or does not match the trace format.
    #[error("failed to parse trace: {0}")]
    Parse(#[from] serde_json::Error),

    /// A step referenced a window that does not exist, or reused an ID.
    #[error("{step}: {source}")]
    Space {
        step: TraceStep,
        #[source]
        source: SpaceError,
    },

    /// A `reloadConfig` event produced an invalid configuration.
    #[error("{step}: {source}")]
    Config {
        step: TraceStep,
        #[source]
        source: ConfigError,
    },
}

/// Location of a failing step within a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStep {
    /// Entry of the initial `windows` list.
    InitialWindow(usize),
    /// Entry of the `events` list.
    Event(usize),
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitialWindow(index) => write!(f, "initial window #{index}"),
            Self::Event(index) => write!(f, "event #{index}"),
        }
    }
}

// ============================================================================
// Trace Format
// ============================================================================

/// A recorded or hand-written sequence of compositor events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Trace {
    /// Current virtual desktop when the trace starts.
    pub current_desktop: DesktopId,

    /// Windows mapped before the effect attaches.
    pub windows: Vec<TraceWindow>,

    /// Events applied in order after the effect attached.
    pub events: Vec<TraceEvent>,
}

/// A window description inside a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TraceWindow {
    /// Window ID, unique among live windows.
    pub id: u64,

    /// Window caption.
    #[serde(default)]
    pub caption: String,

    /// Whether the window is unresponsive when mapped.
    #[serde(default)]
    pub unresponsive: bool,

    /// Whether the window is minimized when mapped.
    #[serde(default)]
    pub minimized: bool,

    /// Desktops the window occupies. Empty means all desktops.
    #[serde(default)]
    pub desktops: Vec<DesktopId>,
}

impl TraceWindow {
    /// Converts the description into a [`NewWindow`].
    #[must_use]
    pub fn to_new_window(&self) -> NewWindow {
        NewWindow::new(self.id, self.caption.clone())
            .unresponsive(self.unresponsive)
            .minimized(self.minimized)
            .on_desktops(self.desktops.iter().copied())
    }
}

/// One compositor event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TraceEvent {
    /// Maps a new window on top of the stacking order.
    AddWindow(TraceWindow),

    /// Closes a window.
    CloseWindow { id: u64 },

    /// Changes whether a window responds to input.
    SetUnresponsive { id: u64, unresponsive: bool },

    /// Minimizes a window.
    Minimize { id: u64 },

    /// Restores a minimized window.
    Unminimize { id: u64 },

    /// Moves a window to another set of desktops.
    SetDesktops {
        id: u64,
        #[serde(default)]
        desktops: Vec<DesktopId>,
    },

    /// Switches the current virtual desktop.
    SwitchDesktop { desktop: DesktopId },

    /// Raises a window to the top of the stacking order.
    RaiseWindow { id: u64 },

    /// Reloads the configuration with the given overrides.
    #[serde(rename_all = "camelCase")]
    ReloadConfig {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        animation_speed: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fade_in_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fade_out_ms: Option<u64>,
    },

    /// Completes every transient animation in flight.
    FinishTransients,
}

impl TraceEvent {
    /// Returns the event type as written in trace files.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddWindow(_) => "addWindow",
            Self::CloseWindow { .. } => "closeWindow",
            Self::SetUnresponsive { .. } => "setUnresponsive",
            Self::Minimize { .. } => "minimize",
            Self::Unminimize { .. } => "unminimize",
            Self::SetDesktops { .. } => "setDesktops",
            Self::SwitchDesktop { .. } => "switchDesktop",
            Self::RaiseWindow { .. } => "raiseWindow",
            Self::ReloadConfig { .. } => "reloadConfig",
            Self::FinishTransients => "finishTransients",
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Parses a trace in JSONC format.
///
/// # Errors
///
/// Returns `TraceError::Parse` if the text is not a valid trace.
pub fn parse_trace(text: &str) -> Result<Trace, TraceError> {
    let reader = json_comments::StripComments::new(text.as_bytes());
    Ok(serde_json::from_reader(reader)?)
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns `TraceError::Io` if the file cannot be read, or `TraceError::Parse`
/// if its content is not a valid trace.
pub fn load_trace(path: &Path) -> Result<Trace, TraceError> {
    let text = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}
