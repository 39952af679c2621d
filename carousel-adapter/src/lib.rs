//! A framework-neutral carousel widget built on the `carousel` engine.
//!
//! The `carousel` crate is UI-agnostic and holds the geometry, motion and gesture math. This
//! crate wires it to a concrete layout system through the [`Host`] trait and adds what a
//! complete widget needs around the engine:
//!
//! - The automatic advance timer (with timer-only looping)
//! - Deferred continuations: first render, resize settling, transition completion
//! - The "moved" event and a paired navigation control ([`Nav`])
//! - Touch input forwarding with hard cancellation of in-flight transitions
//!
//! Time is passed in explicitly (`now_ms`), so the widget runs the same under a browser event
//! loop, a terminal frame loop, or a test.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod emitter;
mod host;
mod nav;
mod widget;

#[cfg(test)]
mod tests;

pub use emitter::{Emitter, ListenerId};
pub use host::{Host, TransitionSupport};
pub use nav::{Nav, NavItem};
pub use widget::{COMPLETION_ARM_MS, Carousel, MoveOptions, RESIZE_SETTLE_MS};
