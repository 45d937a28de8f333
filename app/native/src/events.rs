//! Centralized signal names for the compositor event bus.
//!
//! All signal names are defined here so that the bus, the test harness and
//! trace output agree on spelling.
//!
//! ## Naming Convention
//!
//! Signal names are lowerCamelCase and describe what happened:
//!
//! - Global signals live on the effects handler (e.g. `windowAdded`).
//! - Per-window signals are prefixed with `window` (e.g. `windowMinimized`).

/// Global signals emitted by the effects handler.
pub mod effects {
    /// Emitted after a window has been added to the stacking order.
    ///
    /// Payload: `Window`
    pub const WINDOW_ADDED: &str = "windowAdded";

    /// Emitted when a window is about to be removed.
    ///
    /// Payload: `Window`
    pub const WINDOW_CLOSED: &str = "windowClosed";

    /// Emitted when the current virtual desktop changes.
    ///
    /// Payload: `DesktopChange { old, new }`
    pub const DESKTOP_CHANGED: &str = "desktopChanged";

    /// Not a signal: label used by the test harness when it reports the
    /// stacking order.
    pub const STACKING_ORDER: &str = "stackingOrder";
}

/// Signals scoped to a single window.
pub mod window {
    /// Emitted when the window is minimized.
    pub const MINIMIZED: &str = "windowMinimized";

    /// Emitted when the window is restored from minimized state.
    pub const UNMINIMIZED: &str = "windowUnminimized";

    /// Emitted when the window's `unresponsive` property flips.
    pub const UNRESPONSIVE_CHANGED: &str = "windowUnresponsiveChanged";

    /// Emitted when the set of desktops the window occupies changes.
    pub const DESKTOPS_CHANGED: &str = "windowDesktopsChanged";
}
