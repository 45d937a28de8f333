//! Frostpane - frozen-look feedback for unresponsive compositor windows.
//!
//! When a window stops responding to input, the frozen-app effect fades it
//! into a desaturated, over-bright look and fades it back once the window
//! recovers or closes. This library provides the pieces around that effect:
//!
//! - [`compositor`]: the typed event bus, window handles and a simulated
//!   compositor that drives them
//! - [`animation`]: the animation-engine contract and a recording engine
//! - [`effects`]: the frozen-app effect itself
//! - [`harness`]: a probe that reports compositor signals as text lines
//! - [`trace`]: JSONC lifecycle traces and their replay
//! - [`config`]: the hot-reloadable JSONC configuration
//! - [`cli`]: the `frostpane` command-line interface

pub mod animation;
pub mod cli;
pub mod compositor;
pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod harness;
pub mod schema;
pub mod trace;
