//! Frozen-app effect.
//!
//! Gives windows that stopped responding to input a "frozen" look: the
//! window is desaturated and brightened while it is unresponsive, and fades
//! back to normal once it recovers or closes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     EffectsHandler                              │
//! │  windowAdded / windowClosed / desktopChanged                    │
//! └─────────────────────────┬───────────────────────────────────────┘
//!                           │ Subscription (global)
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    FrozenAppEffect                              │
//! │  WindowId -> WindowRecord { animation, look, subscriptions }    │
//! │       ▲                                                         │
//! │       │ Subscription (per window, disposed on close)            │
//! │  minimized / unminimized / unresponsive / desktops              │
//! └─────────────────────────┬───────────────────────────────────────┘
//!                           │ apply_persistent / apply_transient / cancel
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    AnimationEngine                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Window States
//!
//! Every tracked window is either **Idle** (no stored handle) or **Applied**
//! (a persistent request holds the frozen look). The reverse fade is a
//! transient request whose handle is never stored, so a window is Idle while
//! it fades back.
//!
//! | Event                  | Action                                        |
//! |------------------------|-----------------------------------------------|
//! | added, unresponsive    | apply (fade-in)                               |
//! | unresponsive -> true   | apply (fade-in) unless already Applied        |
//! | unresponsive -> false  | revert (fade-out) if Applied                  |
//! | minimized              | cancel                                        |
//! | unminimized            | apply (fast path) if unresponsive             |
//! | desktops changed       | cancel, then apply (fast path) if unresponsive|
//! | desktop switch         | same, for every stacked tracked window        |
//! | closed                 | cancel, revert if it was Applied and frozen   |
//!
//! Reapplying after a minimize or desktop change uses
//! [`FAST_PATH_DURATION`]: the window already looked frozen, so a full
//! fade-in would misreport it as freshly hung.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::animation::{
    AnimationEngine, AnimationHandle, EffectProperty, MIN_ANIMATION_TIME, PropertyAnimation,
    PropertyAnimations, animation_time,
};
use crate::compositor::{DesktopChange, EffectsHandler, Subscription, Window, WindowId};
use crate::config::{
    DEFAULT_FADE_IN_MS, DEFAULT_FADE_OUT_MS, DEFAULT_FROZEN_BRIGHTNESS, DEFAULT_FROZEN_SATURATION,
    FrostpaneConfig,
};

// ============================================================================
// Constants
// ============================================================================

/// Duration used when a window that already looked frozen becomes visible again.
pub const FAST_PATH_DURATION: Duration = MIN_ANIMATION_TIME;

// ============================================================================
// Look and Timings
// ============================================================================

/// Property values of the frozen look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrozenLook {
    /// Target saturation.
    pub saturation: f64,
    /// Target brightness.
    pub brightness: f64,
}

impl Default for FrozenLook {
    fn default() -> Self {
        Self {
            saturation: DEFAULT_FROZEN_SATURATION,
            brightness: DEFAULT_FROZEN_BRIGHTNESS,
        }
    }
}

impl FrozenLook {
    /// Animations that move a window toward this look.
    #[must_use]
    pub fn targets(&self) -> PropertyAnimations {
        PropertyAnimations::from_buf([
            PropertyAnimation::to(EffectProperty::Saturation, self.saturation),
            PropertyAnimation::to(EffectProperty::Brightness, self.brightness),
        ])
    }

    /// Animations that move a window from this look back to neutral.
    #[must_use]
    pub fn reversal(&self) -> PropertyAnimations {
        PropertyAnimations::from_buf([
            PropertyAnimation::between(
                EffectProperty::Saturation,
                self.saturation,
                EffectProperty::Saturation.neutral(),
            ),
            PropertyAnimation::between(
                EffectProperty::Brightness,
                self.brightness,
                EffectProperty::Brightness.neutral(),
            ),
        ])
    }
}

/// Durations and look used for new requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrozenAppTimings {
    /// Fade-in duration of the frozen look.
    pub in_duration: Duration,
    /// Fade-out duration back to neutral.
    pub out_duration: Duration,
    /// Target property values.
    pub look: FrozenLook,
}

impl Default for FrozenAppTimings {
    fn default() -> Self {
        Self {
            in_duration: Duration::from_millis(DEFAULT_FADE_IN_MS),
            out_duration: Duration::from_millis(DEFAULT_FADE_OUT_MS),
            look: FrozenLook::default(),
        }
    }
}

impl FrozenAppTimings {
    /// Derives timings from the configuration, scaling both durations by the
    /// global animation speed.
    #[must_use]
    pub fn from_config(config: &FrostpaneConfig) -> Self {
        let frozen = &config.frozen_app;
        Self {
            in_duration: animation_time(frozen.fade_in(), config.animation_speed),
            out_duration: animation_time(frozen.fade_out(), config.animation_speed),
            look: FrozenLook {
                saturation: frozen.saturation,
                brightness: frozen.brightness,
            },
        }
    }
}

// ============================================================================
// Per-window State
// ============================================================================

/// Bookkeeping for one tracked window.
struct WindowRecord {
    /// Handle of the persistent request holding the frozen look.
    animation: Option<AnimationHandle>,
    /// Look used by the most recent apply, reversed on revert.
    applied_look: FrozenLook,
    /// Per-window signal subscriptions, disposed with the record.
    _subscriptions: Vec<Subscription>,
}

/// State shared between the effect and its signal handlers.
///
/// Handlers hold a `Weak` reference, so dropping the effect disconnects
/// everything without reference cycles.
struct EffectCore<E> {
    engine: E,
    timings: RwLock<FrozenAppTimings>,
    windows: Mutex<HashMap<WindowId, WindowRecord>>,
}

impl<E: AnimationEngine + 'static> EffectCore<E> {
    // ------------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------------

    /// Issues the frozen look unless the window is hidden.
    fn apply(&self, record: &mut WindowRecord, window: &Window, duration: Duration) {
        if !window.is_visible() {
            tracing::trace!(window = %window.id(), "window not visible, skipping apply");
            return;
        }

        self.cancel(record, window);

        let look = self.timings.read().look;
        let handle = self.engine.apply_persistent(window, duration, &look.targets());
        record.animation = Some(handle);
        record.applied_look = look;

        tracing::debug!(
            window = %window.id(),
            handle = %handle,
            duration_ms = duration.as_millis(),
            "frozen look applied"
        );
    }

    /// Fades an Applied window back to neutral.
    fn revert(&self, record: &mut WindowRecord, window: &Window, duration: Duration) {
        let Some(handle) = record.animation.take() else {
            tracing::trace!(window = %window.id(), "window idle, nothing to revert");
            return;
        };

        self.engine.cancel(handle);
        self.engine.apply_transient(window, duration, &record.applied_look.reversal());

        tracing::debug!(
            window = %window.id(),
            duration_ms = duration.as_millis(),
            "frozen look reverted"
        );
    }

    /// Drops the stored request, if any.
    fn cancel(&self, record: &mut WindowRecord, window: &Window) {
        if let Some(handle) = record.animation.take() {
            self.engine.cancel(handle);
            tracing::trace!(window = %window.id(), handle = %handle, "frozen look canceled");
        }
    }

    /// Cancels and, for a frozen window, reapplies on the fast path.
    fn reanchor(&self, record: &mut WindowRecord, window: &Window) {
        self.cancel(record, window);
        if window.is_unresponsive() {
            self.apply(record, window, FAST_PATH_DURATION);
        }
    }

    /// Runs `f` against the record of a tracked window.
    fn with_record(&self, window: &Window, f: impl FnOnce(&Self, &mut WindowRecord)) {
        let mut windows = self.windows.lock();
        match windows.get_mut(&window.id()) {
            Some(record) => f(self, record),
            None => tracing::trace!(window = %window.id(), "ignoring event for untracked window"),
        }
    }

    // ------------------------------------------------------------------------
    // Event handlers
    // ------------------------------------------------------------------------

    fn window_added(self: &Arc<Self>, window: &Window) {
        let id = window.id();
        if self.windows.lock().contains_key(&id) {
            tracing::trace!(window = %id, "window already tracked");
            return;
        }

        let subscriptions = self.subscribe_window(window);
        let mut record = WindowRecord {
            animation: None,
            applied_look: self.timings.read().look,
            _subscriptions: subscriptions,
        };

        if window.is_unresponsive() {
            let duration = self.timings.read().in_duration;
            self.apply(&mut record, window, duration);
        }

        tracing::debug!(window = %id, applied = record.animation.is_some(), "tracking window");
        self.windows.lock().insert(id, record);
    }

    fn window_closed(&self, window: &Window) {
        let Some(mut record) = self.windows.lock().remove(&window.id()) else {
            tracing::trace!(window = %window.id(), "closed window was not tracked");
            return;
        };

        if window.is_unresponsive() {
            let duration = self.timings.read().out_duration;
            self.revert(&mut record, window, duration);
        } else {
            self.cancel(&mut record, window);
        }

        tracing::debug!(window = %window.id(), "stopped tracking window");
        // Disconnect outside the map lock
        drop(record);
    }

    fn unresponsive_changed(&self, window: &Window) {
        self.with_record(window, |core, record| {
            if window.is_unresponsive() {
                if record.animation.is_none() {
                    let duration = core.timings.read().in_duration;
                    core.apply(record, window, duration);
                }
            } else {
                let duration = core.timings.read().out_duration;
                core.revert(record, window, duration);
            }
        });
    }

    fn window_minimized(&self, window: &Window) {
        self.with_record(window, |core, record| core.cancel(record, window));
    }

    fn window_unminimized(&self, window: &Window) {
        self.with_record(window, |core, record| {
            if window.is_unresponsive() {
                core.apply(record, window, FAST_PATH_DURATION);
            }
        });
    }

    fn window_desktops_changed(&self, window: &Window) {
        self.with_record(window, |core, record| core.reanchor(record, window));
    }

    fn desktop_changed(&self, stacking_order: &[Window]) {
        for window in stacking_order {
            self.with_record(window, |core, record| core.reanchor(record, window));
        }
    }

    /// Connects the per-window signals of `window` back to this core.
    fn subscribe_window(self: &Arc<Self>, window: &Window) -> Vec<Subscription> {
        let signals = window.signals();
        vec![
            signals.minimized.connect(forward(self, Self::window_minimized)),
            signals.unminimized.connect(forward(self, Self::window_unminimized)),
            signals.unresponsive_changed.connect(forward(self, Self::unresponsive_changed)),
            signals.desktops_changed.connect(forward(self, Self::window_desktops_changed)),
        ]
    }
}

/// Builds a signal handler that forwards to `handler` while the core lives.
fn forward<E: AnimationEngine + 'static>(
    core: &Arc<EffectCore<E>>,
    handler: fn(&EffectCore<E>, &Window),
) -> impl Fn(&Window) + Send + Sync + 'static {
    let weak: Weak<EffectCore<E>> = Arc::downgrade(core);
    move |window: &Window| {
        if let Some(core) = weak.upgrade() {
            handler(&core, window);
        }
    }
}

// ============================================================================
// Effect
// ============================================================================

/// Effect that gives unresponsive windows a frozen look.
pub struct FrozenAppEffect<E> {
    core: Arc<EffectCore<E>>,
    global: Vec<Subscription>,
}

impl<E> std::fmt::Debug for FrozenAppEffect<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrozenAppEffect")
            .field("tracked", &self.core.windows.lock().len())
            .field("timings", &*self.core.timings.read())
            .field("attached", &!self.global.is_empty())
            .finish_non_exhaustive()
    }
}

impl<E: AnimationEngine + 'static> FrozenAppEffect<E> {
    /// Creates a detached effect that issues requests to `engine`.
    #[must_use]
    pub fn new(engine: E, timings: FrozenAppTimings) -> Self {
        Self {
            core: Arc::new(EffectCore {
                engine,
                timings: RwLock::new(timings),
                windows: Mutex::new(HashMap::new()),
            }),
            global: Vec::new(),
        }
    }

    /// Subscribes to the compositor-wide signals of `handler` and starts
    /// tracking every window already in its stacking order.
    ///
    /// Attaching again replaces the previous global subscriptions.
    pub fn attach(&mut self, handler: &Arc<EffectsHandler>) {
        self.global.clear();

        let core = Arc::downgrade(&self.core);
        let added = handler.window_added().connect(move |window| {
            if let Some(core) = core.upgrade() {
                core.window_added(window);
            }
        });

        let closed = handler.window_closed().connect(forward(&self.core, EffectCore::window_closed));

        let core = Arc::downgrade(&self.core);
        let effects = Arc::downgrade(handler);
        let desktop = handler.desktop_changed().connect(move |change: &DesktopChange| {
            let (Some(core), Some(effects)) = (core.upgrade(), effects.upgrade()) else {
                return;
            };
            tracing::debug!(old = %change.old, new = %change.new, "re-anchoring after desktop switch");
            core.desktop_changed(&effects.stacking_order());
        });

        self.global = vec![added, closed, desktop];

        for window in handler.stacking_order() {
            self.core.window_added(&window);
        }
    }

    /// Disconnects from the effects handler and forgets every tracked window.
    ///
    /// Stored requests are canceled, so no window keeps the frozen look.
    pub fn detach(&mut self) {
        self.global.clear();

        let records: Vec<(WindowId, WindowRecord)> = self.core.windows.lock().drain().collect();
        for (id, record) in &records {
            if let Some(handle) = record.animation {
                self.core.engine.cancel(handle);
                tracing::trace!(window = %id, handle = %handle, "frozen look canceled on detach");
            }
        }

        tracing::debug!(released = records.len(), "frozen-app effect detached");
        // Disconnect outside the map lock
        drop(records);
    }

    /// Returns whether the effect is connected to an effects handler.
    #[must_use]
    pub fn is_attached(&self) -> bool { !self.global.is_empty() }

    /// Handles a new window.
    pub fn window_added(&self, window: &Window) { self.core.window_added(window); }

    /// Handles a closing window and forgets it.
    pub fn window_closed(&self, window: &Window) { self.core.window_closed(window); }

    /// Handles a window being minimized.
    pub fn window_minimized(&self, window: &Window) { self.core.window_minimized(window); }

    /// Handles a window being restored.
    pub fn window_unminimized(&self, window: &Window) { self.core.window_unminimized(window); }

    /// Handles a responsiveness flip.
    pub fn unresponsive_changed(&self, window: &Window) { self.core.unresponsive_changed(window); }

    /// Handles a window moving between desktops.
    pub fn window_desktops_changed(&self, window: &Window) {
        self.core.window_desktops_changed(window);
    }

    /// Handles a virtual-desktop switch against the given stacking order.
    pub fn desktop_changed(&self, stacking_order: &[Window]) {
        self.core.desktop_changed(stacking_order);
    }

    /// Replaces the timings used by future requests.
    ///
    /// Animations already in flight keep their original durations.
    pub fn reload_config(&self, timings: FrozenAppTimings) {
        tracing::debug!(
            in_ms = timings.in_duration.as_millis(),
            out_ms = timings.out_duration.as_millis(),
            "frozen-app timings reloaded"
        );
        *self.core.timings.write() = timings;
    }

    /// Returns whether the window currently holds the frozen look.
    #[must_use]
    pub fn is_applied(&self, id: WindowId) -> bool { self.animation_handle(id).is_some() }

    /// Returns the stored persistent handle of a window.
    #[must_use]
    pub fn animation_handle(&self, id: WindowId) -> Option<AnimationHandle> {
        self.core.windows.lock().get(&id).and_then(|record| record.animation)
    }

    /// Returns whether the window is tracked.
    #[must_use]
    pub fn is_tracked(&self, id: WindowId) -> bool { self.core.windows.lock().contains_key(&id) }

    /// Returns the IDs of all tracked windows in ascending order.
    #[must_use]
    pub fn tracked_windows(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.core.windows.lock().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the IDs of all windows holding the frozen look in ascending order.
    #[must_use]
    pub fn applied_windows(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self
            .core
            .windows
            .lock()
            .iter()
            .filter(|(_, record)| record.animation.is_some())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{EngineCall, RecordingEngine};
    use crate::compositor::{DesktopId, NewWindow, Space};

    const IN: Duration = Duration::from_millis(DEFAULT_FADE_IN_MS);
    const OUT: Duration = Duration::from_millis(DEFAULT_FADE_OUT_MS);

    fn setup() -> (Space, Arc<RecordingEngine>, FrozenAppEffect<Arc<RecordingEngine>>) {
        let space = Space::new();
        let engine = Arc::new(RecordingEngine::new());
        let mut effect = FrozenAppEffect::new(Arc::clone(&engine), FrozenAppTimings::default());
        effect.attach(space.effects());
        (space, engine, effect)
    }

    fn assert_apply(call: &EngineCall, duration: Duration) {
        assert!(call.is_persistent(), "expected persistent apply, got {call:?}");
        assert_eq!(call.duration(), Some(duration));
    }

    #[test]
    fn test_responsive_window_added_stays_idle() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor")).unwrap();

        assert!(effect.is_tracked(WindowId(1)));
        assert!(!effect.is_applied(WindowId(1)));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_unresponsive_window_added_applies_fade_in() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert_apply(&calls[0], IN);
        assert!(effect.is_applied(WindowId(1)));
        assert_eq!(effect.animation_handle(WindowId(1)), Some(calls[0].handle()));
    }

    #[test]
    fn test_apply_targets_frozen_look() {
        let (mut space, engine, _effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();

        let EngineCall::ApplyPersistent { animations, .. } = &engine.calls()[0] else {
            panic!("expected persistent apply");
        };
        assert_eq!(animations.as_slice(), FrozenLook::default().targets().as_slice());
        assert_eq!(animations[0].to_string(), "saturation ->0.1");
        assert_eq!(animations[1].to_string(), "brightness ->1.5");
    }

    #[test]
    fn test_recovery_cancels_then_reverts() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        let handle = engine.calls()[0].handle();
        engine.take_calls();

        space.set_unresponsive(WindowId(1), false).unwrap();

        let calls = engine.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            EngineCall::Cancel {
                handle,
                window: Some(WindowId(1)),
                live: true
            }
        );
        assert!(calls[1].is_transient());
        assert_eq!(calls[1].duration(), Some(OUT));
        assert!(!effect.is_applied(WindowId(1)));
    }

    #[test]
    fn test_revert_reverses_applied_look() {
        let (mut space, engine, _effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        space.set_unresponsive(WindowId(1), false).unwrap();

        let EngineCall::ApplyTransient { animations, .. } = &engine.calls()[2] else {
            panic!("expected transient apply");
        };
        assert_eq!(animations[0].to_string(), "saturation 0.1->1");
        assert_eq!(animations[1].to_string(), "brightness 1.5->1");
    }

    #[test]
    fn test_revert_uses_look_of_last_apply_after_reload() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();

        effect.reload_config(FrozenAppTimings {
            look: FrozenLook {
                saturation: 0.4,
                brightness: 1.2,
            },
            ..FrozenAppTimings::default()
        });
        space.set_unresponsive(WindowId(1), false).unwrap();

        let EngineCall::ApplyTransient { animations, .. } = engine.calls().last().cloned().unwrap()
        else {
            panic!("expected transient apply");
        };
        assert_eq!(animations[0].from, Some(0.1));
        assert_eq!(animations[1].from, Some(1.5));
    }

    #[test]
    fn test_becoming_unresponsive_twice_applies_once() {
        let (mut space, engine, effect) = setup();
        let window = space.add_window(NewWindow::new(1, "Editor")).unwrap();
        space.set_unresponsive(WindowId(1), true).unwrap();

        // A duplicate notification must not restart the fade-in
        effect.unresponsive_changed(&window);

        assert_eq!(engine.calls().len(), 1);
        assert_apply(&engine.calls()[0], IN);
        assert_eq!(engine.live_persistent_count(WindowId(1)), 1);
    }

    #[test]
    fn test_minimize_cancels_and_unminimize_uses_fast_path() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        engine.take_calls();

        space.minimize(WindowId(1)).unwrap();
        let calls = engine.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].is_cancel());
        assert!(!effect.is_applied(WindowId(1)));

        space.unminimize(WindowId(1)).unwrap();
        let calls = engine.take_calls();
        assert_eq!(calls.len(), 1);
        assert_apply(&calls[0], FAST_PATH_DURATION);
        assert!(effect.is_applied(WindowId(1)));
    }

    #[test]
    fn test_unminimize_responsive_window_does_nothing() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor")).unwrap();
        space.minimize(WindowId(1)).unwrap();
        space.unminimize(WindowId(1)).unwrap();

        assert!(engine.calls().is_empty());
        assert!(!effect.is_applied(WindowId(1)));
    }

    #[test]
    fn test_hidden_window_never_gets_frozen_look() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").minimized(true)).unwrap();
        space.set_unresponsive(WindowId(1), true).unwrap();

        assert!(engine.calls().is_empty());
        assert!(!effect.is_applied(WindowId(1)));

        space.unminimize(WindowId(1)).unwrap();
        assert_apply(&engine.calls()[0], FAST_PATH_DURATION);
    }

    #[test]
    fn test_desktops_changed_reanchors_frozen_window() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        engine.take_calls();

        space.set_window_desktops(WindowId(1), [DesktopId(1)]).unwrap();

        let calls = engine.take_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].is_cancel());
        assert_apply(&calls[1], FAST_PATH_DURATION);
        assert!(effect.is_applied(WindowId(1)));
    }

    #[test]
    fn test_desktops_changed_off_current_desktop_cancels() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        engine.take_calls();

        space.set_window_desktops(WindowId(1), [DesktopId(2)]).unwrap();

        let calls = engine.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].is_cancel());
        assert!(!effect.is_applied(WindowId(1)));
    }

    #[test]
    fn test_desktop_switch_reanchors_every_frozen_window() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "One").unresponsive(true)).unwrap();
        space.add_window(NewWindow::new(2, "Two")).unwrap();
        space.add_window(NewWindow::new(3, "Three").unresponsive(true)).unwrap();
        engine.take_calls();

        space.switch_desktop(DesktopId(2));

        for id in [1, 3] {
            let calls = engine.calls_for(WindowId(id));
            assert_eq!(calls.len(), 2, "window {id}");
            assert!(calls[0].is_cancel());
            assert_apply(&calls[1], FAST_PATH_DURATION);
        }
        assert!(engine.calls_for(WindowId(2)).is_empty());
        assert_eq!(effect.applied_windows(), vec![WindowId(1), WindowId(3)]);
    }

    #[test]
    fn test_desktop_changed_uses_given_stacking_order() {
        let (mut space, engine, effect) = setup();
        let first = space.add_window(NewWindow::new(1, "One").unresponsive(true)).unwrap();
        space.add_window(NewWindow::new(2, "Two").unresponsive(true)).unwrap();
        engine.take_calls();

        effect.desktop_changed(&[first]);

        assert_eq!(engine.calls_for(WindowId(1)).len(), 2);
        assert!(engine.calls_for(WindowId(2)).is_empty());
    }

    #[test]
    fn test_close_frozen_window_reverts_and_forgets() {
        let (mut space, engine, effect) = setup();
        let window = space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        engine.take_calls();

        space.close_window(WindowId(1)).unwrap();

        let calls = engine.take_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].is_cancel());
        assert!(calls[1].is_transient());
        assert_eq!(calls[1].duration(), Some(OUT));
        assert!(!effect.is_tracked(WindowId(1)));

        // Late events for the closed window are ignored
        effect.unresponsive_changed(&window);
        effect.window_unminimized(&window);
        effect.desktop_changed(&[window.clone()]);
        window.signals().desktops_changed.emit(&window);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_close_disposes_window_subscriptions() {
        let (mut space, _engine, _effect) = setup();
        let window = space.add_window(NewWindow::new(1, "Editor")).unwrap();
        assert_eq!(window.signals().minimized.subscriber_count(), 1);

        space.close_window(WindowId(1)).unwrap();

        assert_eq!(window.signals().minimized.subscriber_count(), 0);
        assert_eq!(window.signals().unresponsive_changed.subscriber_count(), 0);
    }

    #[test]
    fn test_close_responsive_window_issues_nothing() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor")).unwrap();
        space.close_window(WindowId(1)).unwrap();

        assert!(engine.calls().is_empty());
        assert!(effect.tracked_windows().is_empty());
    }

    #[test]
    fn test_close_idle_unresponsive_window_does_not_revert() {
        let (mut space, engine, _effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        space.minimize(WindowId(1)).unwrap();
        engine.take_calls();

        space.close_window(WindowId(1)).unwrap();

        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_cancel_twice_is_idempotent() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        engine.take_calls();

        space.minimize(WindowId(1)).unwrap();
        let window = space.window(WindowId(1)).cloned().unwrap();
        effect.window_minimized(&window);

        assert_eq!(engine.calls().len(), 1);
        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    fn test_attach_scans_existing_windows() {
        let mut space = Space::new();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        space.add_window(NewWindow::new(2, "Terminal")).unwrap();

        let engine = Arc::new(RecordingEngine::new());
        let mut effect = FrozenAppEffect::new(Arc::clone(&engine), FrozenAppTimings::default());
        effect.attach(space.effects());

        assert_eq!(effect.tracked_windows(), vec![WindowId(1), WindowId(2)]);
        assert_eq!(effect.applied_windows(), vec![WindowId(1)]);
        assert_eq!(engine.calls().len(), 1);
        assert!(effect.is_attached());
    }

    #[test]
    fn test_window_added_twice_is_tracked_once() {
        let (mut space, engine, effect) = setup();
        let window = space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        effect.window_added(&window);

        assert_eq!(engine.calls().len(), 1);
        assert_eq!(window.signals().minimized.subscriber_count(), 1);
    }

    #[test]
    fn test_reload_config_affects_only_future_requests() {
        let (mut space, engine, effect) = setup();
        space.add_window(NewWindow::new(1, "One").unresponsive(true)).unwrap();

        let config = FrostpaneConfig {
            animation_speed: 0.5,
            ..FrostpaneConfig::default()
        };
        effect.reload_config(FrozenAppTimings::from_config(&config));
        space.add_window(NewWindow::new(2, "Two").unresponsive(true)).unwrap();

        assert_eq!(engine.calls_for(WindowId(1))[0].duration(), Some(IN));
        assert_eq!(
            engine.calls_for(WindowId(2))[0].duration(),
            Some(Duration::from_millis(750))
        );
        assert!(effect.is_applied(WindowId(1)));
    }

    #[test]
    fn test_timings_from_config_with_zero_speed() {
        let config = FrostpaneConfig {
            animation_speed: 0.0,
            ..FrostpaneConfig::default()
        };
        let timings = FrozenAppTimings::from_config(&config);
        assert_eq!(timings.in_duration, MIN_ANIMATION_TIME);
        assert_eq!(timings.out_duration, MIN_ANIMATION_TIME);
    }

    #[test]
    fn test_detach_stops_tracking_new_windows() {
        let (mut space, engine, mut effect) = setup();
        effect.detach();
        space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();

        assert!(!effect.is_attached());
        assert!(!effect.is_tracked(WindowId(1)));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_detach_releases_tracked_windows() {
        let (mut space, engine, mut effect) = setup();
        let frozen = space.add_window(NewWindow::new(1, "Editor").unresponsive(true)).unwrap();
        let idle = space.add_window(NewWindow::new(2, "Terminal")).unwrap();
        let handle = effect.animation_handle(WindowId(1)).unwrap();

        effect.detach();

        assert!(effect.tracked_windows().is_empty());
        assert!(effect.applied_windows().is_empty());
        assert!(!engine.is_live(handle));
        assert_eq!(engine.live_count(), 0);
        assert_eq!(frozen.signals().desktops_changed.subscriber_count(), 0);
        assert_eq!(idle.signals().unresponsive_changed.subscriber_count(), 0);

        let before = engine.calls().len();
        space.set_window_desktops(WindowId(1), [DesktopId(1)]).unwrap();
        space.set_unresponsive(WindowId(2), true).unwrap();
        space.close_window(WindowId(1)).unwrap();
        assert_eq!(engine.calls().len(), before);
        assert!(!effect.is_tracked(WindowId(1)));
    }

    #[test]
    fn test_dropping_effect_disconnects_handlers() {
        let (mut space, engine, effect) = setup();
        let window = space.add_window(NewWindow::new(1, "Editor")).unwrap();
        drop(effect);

        assert_eq!(space.effects().window_added().subscriber_count(), 0);
        assert_eq!(window.signals().unresponsive_changed.subscriber_count(), 0);
        space.set_unresponsive(WindowId(1), true).unwrap();
        assert!(engine.calls().is_empty());
    }
}
