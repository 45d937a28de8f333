//! Text-reporting probe for compositor signals.
//!
//! [`EffectsHandlerProbe`] subscribes to the same signals effects consume and
//! reports each emission as a line of the form `"<signal> - <details>"`:
//!
//! ```text
//! windowAdded - Editor
//! stackingOrder - 2 Editor
//! windowMinimized - Editor
//! windowUnminimized - Editor
//! windowClosed - Editor
//! desktopChanged - 1 2
//! ```
//!
//! Lines go to a [`ResponseSink`]: a [`CollectingSink`] for in-process
//! inspection, or an unbounded `tokio` channel for a one-way stream.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::compositor::{DesktopChange, EffectsHandler, Subscription, Window, WindowId};
use crate::events;

// ============================================================================
// Sinks
// ============================================================================

/// One-way destination for probe lines.
pub trait ResponseSink: Send + Sync + 'static {
    /// Delivers one line. Delivery failures are ignored.
    fn send_line(&self, line: String);
}

impl ResponseSink for UnboundedSender<String> {
    fn send_line(&self, line: String) {
        if self.send(line).is_err() {
            tracing::trace!("probe receiver dropped, discarding line");
        }
    }
}

/// Sink that keeps every line in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns a copy of the collected lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> { self.lines.lock().clone() }

    /// Returns and clears the collected lines.
    pub fn take_lines(&self) -> Vec<String> { std::mem::take(&mut *self.lines.lock()) }
}

impl ResponseSink for CollectingSink {
    fn send_line(&self, line: String) { self.lines.lock().push(line); }
}

// ============================================================================
// Probe
// ============================================================================

struct ProbeState<S> {
    sink: S,
    /// Nested subscriptions per window, disposed on close.
    windows: Mutex<HashMap<WindowId, Vec<Subscription>>>,
}

impl<S: ResponseSink> ProbeState<S> {
    fn report(&self, signal: &str, details: impl std::fmt::Display) {
        self.sink.send_line(format!("{signal} - {details}"));
    }

    fn window_added(self: &Arc<Self>, effects: &EffectsHandler, window: &Window) {
        self.report(events::effects::WINDOW_ADDED, window.caption());

        let order = effects.stacking_order();
        let top = order.first().map(Window::caption).unwrap_or_default();
        self.report(events::effects::STACKING_ORDER, format_args!("{} {top}", order.len()));

        let signals = window.signals();
        let nested = vec![
            signals.minimized.connect(self.forward(events::window::MINIMIZED)),
            signals.unminimized.connect(self.forward(events::window::UNMINIMIZED)),
        ];
        self.windows.lock().insert(window.id(), nested);
    }

    fn window_closed(&self, window: &Window) {
        self.report(events::effects::WINDOW_CLOSED, window.caption());
        let nested = self.windows.lock().remove(&window.id());
        drop(nested);
    }

    fn forward(self: &Arc<Self>, signal: &'static str) -> impl Fn(&Window) + Send + Sync + 'static {
        let state: Weak<Self> = Arc::downgrade(self);
        move |window: &Window| {
            if let Some(state) = state.upgrade() {
                state.report(signal, window.caption());
            }
        }
    }
}

/// Subscriber that reports compositor signals as text lines.
///
/// Dropping the probe disconnects all of its subscriptions.
pub struct EffectsHandlerProbe<S> {
    state: Arc<ProbeState<S>>,
    _global: Vec<Subscription>,
}

impl<S> std::fmt::Debug for EffectsHandlerProbe<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectsHandlerProbe")
            .field("windows", &self.state.windows.lock().len())
            .finish_non_exhaustive()
    }
}

impl<S: ResponseSink> EffectsHandlerProbe<S> {
    /// Subscribes to `handler` and reports to `sink`.
    ///
    /// Windows already stacked are not reported; only signals emitted after
    /// attaching are.
    #[must_use]
    pub fn attach(handler: &Arc<EffectsHandler>, sink: S) -> Self {
        let state = Arc::new(ProbeState {
            sink,
            windows: Mutex::new(HashMap::new()),
        });

        let weak = Arc::downgrade(&state);
        let effects = Arc::downgrade(handler);
        let added = handler.window_added().connect(move |window| {
            if let (Some(state), Some(effects)) = (weak.upgrade(), effects.upgrade()) {
                state.window_added(&effects, window);
            }
        });

        let weak = Arc::downgrade(&state);
        let closed = handler.window_closed().connect(move |window| {
            if let Some(state) = weak.upgrade() {
                state.window_closed(window);
            }
        });

        let weak = Arc::downgrade(&state);
        let desktop = handler.desktop_changed().connect(move |change: &DesktopChange| {
            if let Some(state) = weak.upgrade() {
                state.report(events::effects::DESKTOP_CHANGED, change);
            }
        });

        Self {
            state,
            _global: vec![added, closed, desktop],
        }
    }

    /// Returns the sink lines are reported to.
    #[must_use]
    pub fn sink(&self) -> &S { &self.state.sink }

    /// Returns the number of windows with nested subscriptions.
    #[must_use]
    pub fn watched_windows(&self) -> usize { self.state.windows.lock().len() }
}
