//! An animation engine that records requests instead of rendering them.
//!
//! `RecordingEngine` allocates sequential handles, keeps the list of live
//! handles, and stores every request as an [`EngineCall`]. Trace replay prints
//! the recorded calls, and tests assert on them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use super::{
    AnimationEngine, AnimationHandle, PropertyAnimation, PropertyAnimations, serialize_millis,
};
use crate::compositor::{Window, WindowId};

// ============================================================================
// Recorded Calls
// ============================================================================

/// One request received by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum EngineCall {
    /// A hold-until-canceled request.
    #[serde(rename_all = "camelCase")]
    ApplyPersistent {
        window: WindowId,
        handle: AnimationHandle,
        #[serde(rename = "durationMs", serialize_with = "serialize_millis")]
        duration: Duration,
        animations: PropertyAnimations,
    },

    /// A one-shot tween.
    #[serde(rename_all = "camelCase")]
    ApplyTransient {
        window: WindowId,
        handle: AnimationHandle,
        #[serde(rename = "durationMs", serialize_with = "serialize_millis")]
        duration: Duration,
        animations: PropertyAnimations,
    },

    /// A cancellation; `live` is `false` when the handle was already inert.
    #[serde(rename_all = "camelCase")]
    Cancel {
        handle: AnimationHandle,
        window: Option<WindowId>,
        live: bool,
    },
}

impl EngineCall {
    /// Returns the window the call targeted, if known.
    #[must_use]
    pub const fn window(&self) -> Option<WindowId> {
        match self {
            Self::ApplyPersistent { window, .. } | Self::ApplyTransient { window, .. } => {
                Some(*window)
            }
            Self::Cancel { window, .. } => *window,
        }
    }

    /// Returns the requested duration for apply calls.
    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        match self {
            Self::ApplyPersistent { duration, .. } | Self::ApplyTransient { duration, .. } => {
                Some(*duration)
            }
            Self::Cancel { .. } => None,
        }
    }

    /// Returns the handle the call produced or canceled.
    #[must_use]
    pub const fn handle(&self) -> AnimationHandle {
        match self {
            Self::ApplyPersistent { handle, .. }
            | Self::ApplyTransient { handle, .. }
            | Self::Cancel { handle, .. } => *handle,
        }
    }

    /// Returns whether this is a persistent apply.
    #[must_use]
    pub const fn is_persistent(&self) -> bool { matches!(self, Self::ApplyPersistent { .. }) }

    /// Returns whether this is a transient apply.
    #[must_use]
    pub const fn is_transient(&self) -> bool { matches!(self, Self::ApplyTransient { .. }) }

    /// Returns whether this is a cancellation.
    #[must_use]
    pub const fn is_cancel(&self) -> bool { matches!(self, Self::Cancel { .. }) }
}

// ============================================================================
// Recording Engine
// ============================================================================

/// Kind of a live animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveKind {
    Persistent,
    Transient,
}

#[derive(Debug, Clone, Copy)]
struct LiveAnimation {
    window: WindowId,
    kind: LiveKind,
}

#[derive(Debug, Default)]
struct RecorderState {
    calls: Vec<EngineCall>,
    live: HashMap<AnimationHandle, LiveAnimation>,
}

/// Thread-safe engine that records every request.
#[derive(Debug)]
pub struct RecordingEngine {
    next_handle: AtomicU64,
    state: Mutex<RecorderState>,
}

impl Default for RecordingEngine {
    fn default() -> Self { Self::new() }
}

impl RecordingEngine {
    /// Creates an engine with no recorded calls. Handles start at `#1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            state: Mutex::new(RecorderState::default()),
        }
    }

    /// Returns a copy of all recorded calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> { self.state.lock().calls.clone() }

    /// Returns and clears the recorded calls. Live handles are kept.
    pub fn take_calls(&self) -> Vec<EngineCall> { std::mem::take(&mut self.state.lock().calls) }

    /// Returns the recorded calls that targeted `window`.
    #[must_use]
    pub fn calls_for(&self, window: WindowId) -> Vec<EngineCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.window() == Some(window))
            .cloned()
            .collect()
    }

    /// Returns whether `handle` is still live.
    #[must_use]
    pub fn is_live(&self, handle: AnimationHandle) -> bool {
        self.state.lock().live.contains_key(&handle)
    }

    /// Returns the number of live persistent animations on `window`.
    #[must_use]
    pub fn live_persistent_count(&self, window: WindowId) -> usize {
        self.state
            .lock()
            .live
            .values()
            .filter(|live| live.window == window && live.kind == LiveKind::Persistent)
            .count()
    }

    /// Returns the total number of live handles.
    #[must_use]
    pub fn live_count(&self) -> usize { self.state.lock().live.len() }

    /// Completes every transient animation, making its handle inert.
    ///
    /// Returns the number of animations that finished.
    pub fn finish_transients(&self) -> usize {
        let mut state = self.state.lock();
        let before = state.live.len();
        state.live.retain(|_, live| live.kind != LiveKind::Transient);
        before - state.live.len()
    }

    fn start(
        &self,
        window: &Window,
        duration: Duration,
        animations: &[PropertyAnimation],
        kind: LiveKind,
    ) -> AnimationHandle {
        let handle = AnimationHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let animations: PropertyAnimations = animations.iter().copied().collect();
        let window = window.id();

        let call = match kind {
            LiveKind::Persistent => EngineCall::ApplyPersistent {
                window,
                handle,
                duration,
                animations,
            },
            LiveKind::Transient => EngineCall::ApplyTransient {
                window,
                handle,
                duration,
                animations,
            },
        };

        let mut state = self.state.lock();
        state.calls.push(call);
        state.live.insert(handle, LiveAnimation { window, kind });
        handle
    }
}

impl AnimationEngine for RecordingEngine {
    fn apply_persistent(
        &self,
        window: &Window,
        duration: Duration,
        animations: &[PropertyAnimation],
    ) -> AnimationHandle {
        self.start(window, duration, animations, LiveKind::Persistent)
    }

    fn apply_transient(
        &self,
        window: &Window,
        duration: Duration,
        animations: &[PropertyAnimation],
    ) -> AnimationHandle {
        self.start(window, duration, animations, LiveKind::Transient)
    }

    fn cancel(&self, handle: AnimationHandle) -> bool {
        let mut state = self.state.lock();
        let removed = state.live.remove(&handle);
        state.calls.push(EngineCall::Cancel {
            handle,
            window: removed.map(|live| live.window),
            live: removed.is_some(),
        });
        removed.is_some()
    }
}
