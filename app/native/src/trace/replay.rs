//! Trace replay.
//!
//! Replay builds a fresh [`Space`], maps the trace's initial windows, then
//! attaches the harness probe and the frozen-app effect (so the effect's
//! startup scan sees the initial windows) and applies every event in order.

use std::sync::Arc;

use serde::Serialize;

use super::{Trace, TraceError, TraceEvent, TraceStep};
use crate::animation::{EngineCall, RecordingEngine};
use crate::compositor::{Space, SpaceError, WindowId};
use crate::config::FrostpaneConfig;
use crate::effects::{FrozenAppEffect, FrozenAppTimings};
use crate::harness::{CollectingSink, EffectsHandlerProbe};

/// Options controlling a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Whether the harness probe is attached and its lines reported.
    pub harness: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self { Self { harness: true } }
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Every request the animation engine received, in order.
    pub engine_calls: Vec<EngineCall>,
    /// Lines reported by the harness probe, in order.
    pub harness_lines: Vec<String>,
    /// Windows holding the frozen look when the trace ended.
    pub applied_windows: Vec<WindowId>,
    /// Windows tracked by the effect when the trace ended.
    pub tracked_windows: Vec<WindowId>,
    /// Whether the frozen-app effect was attached.
    pub effect_enabled: bool,
}

/// Replays `trace` with the harness probe attached.
///
/// # Errors
///
/// Returns an error if a step references an unknown window, maps a duplicate
/// ID, or reloads an invalid configuration.
pub fn replay(trace: &Trace, config: &FrostpaneConfig) -> Result<ReplayReport, TraceError> {
    replay_with(trace, config, ReplayOptions::default())
}

/// Replays `trace` with explicit options.
///
/// # Errors
///
/// See [`replay`].
pub fn replay_with(
    trace: &Trace,
    config: &FrostpaneConfig,
    options: ReplayOptions,
) -> Result<ReplayReport, TraceError> {
    let mut space = Space::with_desktop(trace.current_desktop);
    for (index, window) in trace.windows.iter().enumerate() {
        space.add_window(window.to_new_window()).map_err(|source| TraceError::Space {
            step: TraceStep::InitialWindow(index),
            source,
        })?;
    }

    let probe = options
        .harness
        .then(|| EffectsHandlerProbe::attach(space.effects(), CollectingSink::new()));

    let engine = Arc::new(RecordingEngine::new());
    let mut effect =
        FrozenAppEffect::new(Arc::clone(&engine), FrozenAppTimings::from_config(config));
    let effect_enabled = config.frozen_app.is_enabled();
    if effect_enabled {
        effect.attach(space.effects());
    } else {
        tracing::debug!("frozen-app effect disabled, replaying without it");
    }

    let mut config = config.clone();
    for (index, event) in trace.events.iter().enumerate() {
        let step = TraceStep::Event(index);
        tracing::trace!(%step, kind = event.kind(), "replaying event");

        match event {
            TraceEvent::ReloadConfig {
                animation_speed,
                fade_in_ms,
                fade_out_ms,
            } => {
                if let Some(speed) = animation_speed {
                    config.animation_speed = *speed;
                }
                if let Some(ms) = fade_in_ms {
                    config.frozen_app.fade_in_ms = *ms;
                }
                if let Some(ms) = fade_out_ms {
                    config.frozen_app.fade_out_ms = *ms;
                }
                config.validate().map_err(|source| TraceError::Config { step, source })?;
                effect.reload_config(FrozenAppTimings::from_config(&config));
            }
            TraceEvent::FinishTransients => {
                let finished = engine.finish_transients();
                tracing::trace!(finished, "transients finished");
            }
            other => apply_event(&mut space, other)
                .map_err(|source| TraceError::Space { step, source })?,
        }
    }

    Ok(ReplayReport {
        engine_calls: engine.calls(),
        harness_lines: probe.map(|probe| probe.sink().lines()).unwrap_or_default(),
        applied_windows: effect.applied_windows(),
        tracked_windows: effect.tracked_windows(),
        effect_enabled,
    })
}

/// Applies a compositor-side event to `space`.
fn apply_event(space: &mut Space, event: &TraceEvent) -> Result<(), SpaceError> {
    match event {
        TraceEvent::AddWindow(window) => space.add_window(window.to_new_window()).map(drop),
        TraceEvent::CloseWindow { id } => space.close_window(WindowId(*id)),
        TraceEvent::SetUnresponsive { id, unresponsive } => {
            space.set_unresponsive(WindowId(*id), *unresponsive)
        }
        TraceEvent::Minimize { id } => space.minimize(WindowId(*id)),
        TraceEvent::Unminimize { id } => space.unminimize(WindowId(*id)),
        TraceEvent::SetDesktops { id, desktops } => {
            space.set_window_desktops(WindowId(*id), desktops.iter().copied())
        }
        TraceEvent::SwitchDesktop { desktop } => {
            space.switch_desktop(*desktop);
            Ok(())
        }
        TraceEvent::RaiseWindow { id } => space.raise_window(WindowId(*id)),
        TraceEvent::ReloadConfig { .. } | TraceEvent::FinishTransients => Ok(()),
    }
}
