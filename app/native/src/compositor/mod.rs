//! Compositor-facing event model.
//!
//! This module contains everything effects consume from the compositor:
//!
//! - [`Signal`] / [`Subscription`]: the typed, synchronous event bus
//! - [`Window`]: shared window handles with per-window signals
//! - [`EffectsHandler`]: compositor-wide signals and the stacking order
//! - [`Space`]: a simulated compositor that drives the handler
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Space                                  │
//! │  (window table, current desktop, visibility)                    │
//! └─────────────────────────┬───────────────────────────────────────┘
//!                           │ emit()
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     EffectsHandler                              │
//! │  - windowAdded / windowClosed / desktopChanged                  │
//! │  - per-window: minimized / unminimized / unresponsive / desktops│
//! └─────────────────────────┬───────────────────────────────────────┘
//!                           │ Subscription
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │          Effects (FrozenAppEffect) and test probes              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod effects_handler;
pub mod signal;
pub mod space;
pub mod window;

pub use effects_handler::{DesktopChange, EffectsHandler};
pub use signal::{Signal, Subscription};
pub use space::{NewWindow, Space, SpaceError, SpaceResult};
pub use window::{DesktopId, DesktopSet, Window, WindowId, WindowProps, WindowSignals};
