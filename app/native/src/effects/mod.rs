//! Window effects driven by compositor signals.
//!
//! An effect subscribes to an [`EffectsHandler`](crate::compositor::EffectsHandler),
//! keeps its own per-window bookkeeping, and turns lifecycle events into
//! requests against an [`AnimationEngine`](crate::animation::AnimationEngine).
//! Effects never touch pixels themselves.

pub mod frozen_app;

pub use frozen_app::{FAST_PATH_DURATION, FrozenAppEffect, FrozenAppTimings, FrozenLook};
