//! The global effects handler.
//!
//! Carries the compositor-wide signals and answers stacking-order queries.
//! Effects hold an `Arc<EffectsHandler>` (or a `Weak` when a handler closure
//! would otherwise keep it alive) and never mutate it; the compositor side
//! ([`super::Space`]) does.

use std::fmt;

use parking_lot::RwLock;
use serde::Serialize;

use super::signal::Signal;
use super::window::{DesktopId, Window, WindowId};
use crate::events;

// ============================================================================
// Payloads
// ============================================================================

/// Payload of the global `desktopChanged` signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DesktopChange {
    /// Desktop that was current before the switch.
    pub old: DesktopId,
    /// Desktop that is current now.
    pub new: DesktopId,
}

impl fmt::Display for DesktopChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.old, self.new)
    }
}

// ============================================================================
// Effects Handler
// ============================================================================

/// Compositor-wide signals plus the current stacking order.
///
/// The stacking order is kept **front-to-back**: index `0` is the topmost
/// window.
#[derive(Debug)]
pub struct EffectsHandler {
    window_added: Signal<Window>,
    window_closed: Signal<Window>,
    desktop_changed: Signal<DesktopChange>,
    stacking_order: RwLock<Vec<Window>>,
    current_desktop: RwLock<DesktopId>,
}

impl Default for EffectsHandler {
    fn default() -> Self { Self::new() }
}

impl EffectsHandler {
    /// Creates a handler with an empty stacking order on desktop 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            window_added: Signal::new(events::effects::WINDOW_ADDED),
            window_closed: Signal::new(events::effects::WINDOW_CLOSED),
            desktop_changed: Signal::new(events::effects::DESKTOP_CHANGED),
            stacking_order: RwLock::new(Vec::new()),
            current_desktop: RwLock::new(DesktopId::default()),
        }
    }

    /// Signal emitted after a window joined the stacking order.
    #[must_use]
    pub const fn window_added(&self) -> &Signal<Window> { &self.window_added }

    /// Signal emitted when a window is closing.
    #[must_use]
    pub const fn window_closed(&self) -> &Signal<Window> { &self.window_closed }

    /// Signal emitted on a virtual desktop switch.
    #[must_use]
    pub const fn desktop_changed(&self) -> &Signal<DesktopChange> { &self.desktop_changed }

    /// Returns a snapshot of the stacking order, front-to-back.
    #[must_use]
    pub fn stacking_order(&self) -> Vec<Window> { self.stacking_order.read().clone() }

    /// Returns the number of stacked windows.
    #[must_use]
    pub fn window_count(&self) -> usize { self.stacking_order.read().len() }

    /// Looks up a stacked window by ID.
    #[must_use]
    pub fn find_window(&self, id: WindowId) -> Option<Window> {
        self.stacking_order.read().iter().find(|window| window.id() == id).cloned()
    }

    /// Returns the current virtual desktop.
    #[must_use]
    pub fn current_desktop(&self) -> DesktopId { *self.current_desktop.read() }

    // ------------------------------------------------------------------------
    // Compositor-side mutation
    // ------------------------------------------------------------------------

    /// Puts `window` on top of the stacking order.
    pub(crate) fn push_front(&self, window: Window) {
        let mut order = self.stacking_order.write();
        order.retain(|existing| existing.id() != window.id());
        order.insert(0, window);
    }

    /// Removes a window from the stacking order.
    pub(crate) fn remove(&self, id: WindowId) -> Option<Window> {
        let mut order = self.stacking_order.write();
        let index = order.iter().position(|window| window.id() == id)?;
        Some(order.remove(index))
    }

    /// Sets the current desktop, returning the previous one.
    pub(crate) fn set_current_desktop(&self, desktop: DesktopId) -> DesktopId {
        std::mem::replace(&mut *self.current_desktop.write(), desktop)
    }
}
