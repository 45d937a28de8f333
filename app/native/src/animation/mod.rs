//! Animation engine contract.
//!
//! Effects never interpolate properties themselves. They describe what should
//! happen to a window's effect properties and hand the request to an
//! [`AnimationEngine`], which returns an opaque [`AnimationHandle`].
//!
//! # Request Shapes
//!
//! - **Persistent** (`apply_persistent`): animates toward the target values and
//!   holds them until the handle is canceled.
//! - **Transient** (`apply_transient`): tweens from/to the given values once,
//!   then restores the baseline on its own. The handle becomes inert.
//!
//! Canceling a persistent handle relinquishes the override back to the
//! property's baseline. Canceling an inert, unknown or already-canceled
//! handle is a no-op.

pub mod recorder;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use recorder::{EngineCall, RecordingEngine};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::compositor::Window;

// ============================================================================
// Constants
// ============================================================================

/// Shortest duration an animation request may carry.
pub const MIN_ANIMATION_TIME: Duration = Duration::from_millis(1);

// ============================================================================
// Handles and Properties
// ============================================================================

/// Opaque token identifying one animation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AnimationHandle(pub u64);

impl fmt::Display for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// A window effect property an engine can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectProperty {
    /// Color saturation; `1.0` is neutral, `0.0` is grayscale.
    Saturation,
    /// Brightness multiplier; `1.0` is neutral.
    Brightness,
}

impl EffectProperty {
    /// Value at which the property leaves the window unchanged.
    #[must_use]
    pub const fn neutral(self) -> f64 {
        match self {
            Self::Saturation | Self::Brightness => 1.0,
        }
    }
}

impl fmt::Display for EffectProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saturation => write!(f, "saturation"),
            Self::Brightness => write!(f, "brightness"),
        }
    }
}

/// One animated property within a request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropertyAnimation {
    /// The animated property.
    pub property: EffectProperty,
    /// Start value; `None` starts from the current value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    /// Target value.
    pub to: f64,
}

impl PropertyAnimation {
    /// Animates `property` from its current value to `to`.
    #[must_use]
    pub const fn to(property: EffectProperty, to: f64) -> Self {
        Self { property, from: None, to }
    }

    /// Animates `property` from `from` to `to`.
    #[must_use]
    pub const fn between(property: EffectProperty, from: f64, to: f64) -> Self {
        Self { property, from: Some(from), to }
    }
}

impl fmt::Display for PropertyAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Some(from) => write!(f, "{} {from}->{}", self.property, self.to),
            None => write!(f, "{} ->{}", self.property, self.to),
        }
    }
}

/// Property list of a single request. Effects rarely animate more than two.
pub type PropertyAnimations = SmallVec<[PropertyAnimation; 2]>;

// ============================================================================
// Engine Contract
// ============================================================================

/// An engine that animates window effect properties.
///
/// Implementations are driven by an external frame clock. Requests return
/// immediately; callers never wait for completion.
pub trait AnimationEngine: Send + Sync {
    /// Animates toward the `to` values and holds them until canceled.
    fn apply_persistent(
        &self,
        window: &Window,
        duration: Duration,
        animations: &[PropertyAnimation],
    ) -> AnimationHandle;

    /// Tweens once between `from` and `to`, then restores the baseline.
    fn apply_transient(
        &self,
        window: &Window,
        duration: Duration,
        animations: &[PropertyAnimation],
    ) -> AnimationHandle;

    /// Stops the animation behind `handle`.
    ///
    /// Returns `false` when the handle was already inert, canceled or unknown.
    fn cancel(&self, handle: AnimationHandle) -> bool;
}

impl<E: AnimationEngine + ?Sized> AnimationEngine for Arc<E> {
    fn apply_persistent(
        &self,
        window: &Window,
        duration: Duration,
        animations: &[PropertyAnimation],
    ) -> AnimationHandle {
        (**self).apply_persistent(window, duration, animations)
    }

    fn apply_transient(
        &self,
        window: &Window,
        duration: Duration,
        animations: &[PropertyAnimation],
    ) -> AnimationHandle {
        (**self).apply_transient(window, duration, animations)
    }

    fn cancel(&self, handle: AnimationHandle) -> bool { (**self).cancel(handle) }
}

// ============================================================================
// Timing
// ============================================================================

/// Scales a base duration by the global animation-speed factor.
///
/// A factor of `0` (animations disabled) or a non-finite factor still yields
/// [`MIN_ANIMATION_TIME`], so a request never carries a zero duration.
#[must_use]
pub fn animation_time(base: Duration, speed_factor: f64) -> Duration {
    if !speed_factor.is_finite() || speed_factor <= 0.0 {
        return MIN_ANIMATION_TIME;
    }
    Duration::try_from_secs_f64(base.as_secs_f64() * speed_factor)
        .unwrap_or(Duration::MAX)
        .max(MIN_ANIMATION_TIME)
}

/// Serializes a duration as whole milliseconds.
pub(crate) fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_time_scales_base() {
        let base = Duration::from_millis(1500);
        assert_eq!(animation_time(base, 1.0), Duration::from_millis(1500));
        assert_eq!(animation_time(base, 0.5), Duration::from_millis(750));
        assert_eq!(animation_time(base, 2.0), Duration::from_millis(3000));
    }

    #[test]
    fn test_animation_time_never_drops_below_minimum() {
        let base = Duration::from_millis(250);
        assert_eq!(animation_time(base, 0.0), MIN_ANIMATION_TIME);
        assert_eq!(animation_time(base, -1.0), MIN_ANIMATION_TIME);
        assert_eq!(animation_time(base, f64::NAN), MIN_ANIMATION_TIME);
        assert_eq!(animation_time(base, 0.000_001), MIN_ANIMATION_TIME);
    }

    #[test]
    fn test_property_animation_constructors() {
        let to = PropertyAnimation::to(EffectProperty::Saturation, 0.1);
        assert_eq!(to.from, None);
        assert!((to.to - 0.1).abs() < f64::EPSILON);

        let between = PropertyAnimation::between(EffectProperty::Brightness, 1.5, 1.0);
        assert_eq!(between.from, Some(1.5));
        assert_eq!(between.to_string(), "brightness 1.5->1");
    }

    #[test]
    fn test_neutral_values() {
        assert!((EffectProperty::Saturation.neutral() - 1.0).abs() < f64::EPSILON);
        assert!((EffectProperty::Brightness.neutral() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_property_serializes_camel_case() {
        let json = serde_json::to_string(&PropertyAnimation::to(EffectProperty::Saturation, 0.5))
            .unwrap();
        assert_eq!(json, r#"{"property":"saturation","to":0.5}"#);
    }
}
