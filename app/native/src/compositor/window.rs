//! Window handles as seen by effects.
//!
//! A [`Window`] is a cheap, clonable, non-owning view of a compositor window.
//! Its properties are updated by the compositor side ([`super::Space`]); effects
//! only read them and subscribe to the per-window [`WindowSignals`].

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::signal::Signal;
use crate::events;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identity of a window for as long as it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Virtual desktop number (1-based, as shown to the user).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct DesktopId(pub u32);

impl Default for DesktopId {
    fn default() -> Self { Self(1) }
}

impl fmt::Display for DesktopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Set of desktops a window occupies. Empty means "on all desktops".
pub type DesktopSet = SmallVec<[DesktopId; 2]>;

// ============================================================================
// Window Properties
// ============================================================================

/// Mutable window state maintained by the compositor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowProps {
    /// Display label, only used for diagnostics.
    pub caption: String,
    /// Whether the client currently fails to process input.
    pub unresponsive: bool,
    /// Whether the window is minimized.
    pub minimized: bool,
    /// Whether the window is currently eligible to be rendered.
    pub visible: bool,
    /// Desktops the window occupies.
    pub desktops: DesktopSet,
}

impl WindowProps {
    /// Creates properties for a visible, responsive window on all desktops.
    #[must_use]
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// Returns whether the window is shown on `desktop`.
    #[must_use]
    pub fn is_on_desktop(&self, desktop: DesktopId) -> bool {
        self.desktops.is_empty() || self.desktops.contains(&desktop)
    }
}

// ============================================================================
// Per-window Signals
// ============================================================================

/// Signals scoped to a single window.
///
/// Every signal carries the window it belongs to as payload.
#[derive(Debug)]
pub struct WindowSignals {
    /// The window was minimized.
    pub minimized: Signal<Window>,
    /// The window was restored from the minimized state.
    pub unminimized: Signal<Window>,
    /// The `unresponsive` property flipped.
    pub unresponsive_changed: Signal<Window>,
    /// The set of desktops the window occupies changed.
    pub desktops_changed: Signal<Window>,
}

impl WindowSignals {
    fn new() -> Self {
        Self {
            minimized: Signal::new(events::window::MINIMIZED),
            unminimized: Signal::new(events::window::UNMINIMIZED),
            unresponsive_changed: Signal::new(events::window::UNRESPONSIVE_CHANGED),
            desktops_changed: Signal::new(events::window::DESKTOPS_CHANGED),
        }
    }
}

// ============================================================================
// Window
// ============================================================================

struct WindowInner {
    id: WindowId,
    props: RwLock<WindowProps>,
    signals: WindowSignals,
}

/// Shared handle to a compositor window.
///
/// Clones refer to the same window. Equality is identity-based.
#[derive(Clone)]
pub struct Window {
    inner: Arc<WindowInner>,
}

impl Window {
    /// Creates a window handle with the given identity and initial properties.
    #[must_use]
    pub fn new(id: WindowId, props: WindowProps) -> Self {
        Self {
            inner: Arc::new(WindowInner {
                id,
                props: RwLock::new(props),
                signals: WindowSignals::new(),
            }),
        }
    }

    /// Returns the window identity.
    #[must_use]
    pub fn id(&self) -> WindowId { self.inner.id }

    /// Returns the window caption.
    #[must_use]
    pub fn caption(&self) -> String { self.inner.props.read().caption.clone() }

    /// Returns whether the window is currently unresponsive.
    #[must_use]
    pub fn is_unresponsive(&self) -> bool { self.inner.props.read().unresponsive }

    /// Returns whether the window is currently visible.
    #[must_use]
    pub fn is_visible(&self) -> bool { self.inner.props.read().visible }

    /// Returns whether the window is minimized.
    #[must_use]
    pub fn is_minimized(&self) -> bool { self.inner.props.read().minimized }

    /// Returns the desktops the window occupies.
    #[must_use]
    pub fn desktops(&self) -> DesktopSet { self.inner.props.read().desktops.clone() }

    /// Returns the per-window signals.
    #[must_use]
    pub fn signals(&self) -> &WindowSignals { &self.inner.signals }

    /// Mutates the window properties.
    ///
    /// Compositor-side only. No signal is emitted; the caller decides which
    /// notifications follow the change.
    pub fn update<R>(&self, f: impl FnOnce(&mut WindowProps) -> R) -> R {
        f(&mut self.inner.props.write())
    }
}

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.inner, &other.inner) }
}

impl Eq for Window {}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = self.inner.props.read();
        f.debug_struct("Window")
            .field("id", &self.inner.id)
            .field("caption", &props.caption)
            .field("unresponsive", &props.unresponsive)
            .field("visible", &props.visible)
            .field("minimized", &props.minimized)
            .field("desktops", &props.desktops)
            .finish_non_exhaustive()
    }
}
