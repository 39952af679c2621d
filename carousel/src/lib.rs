//! A headless carousel engine.
//!
//! For the framework-neutral widget (timer, scheduling, events, navigation), see the
//! `carousel-adapter` crate.
//!
//! This crate holds the parts of a carousel that are actually hard: partitioning a possibly
//! non-uniform run of child elements into discrete slides, computing pixel targets under the
//! alignment and end-pinning policies, guarding a single in-flight transition, and reconciling a
//! free-form touch drag (with rubber-band resistance) back into the discrete slide model.
//!
//! It is UI-agnostic. A DOM/TUI/GUI layer is expected to provide:
//! - the stage width and child widths (measured at zero offset)
//! - the raw offset currently rendered
//! - a way to apply a raw offset, optionally animated with a [`Transition`]
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod gesture;
mod layout;
mod motion;
mod options;
mod tween;
mod types;


pub use gesture::{
    DEADZONE_PX, FLICK_MS, FLICK_PX, Gesture, Intent, RESISTANCE, Release, TouchPoint,
    TouchUpdate,
};
pub use layout::{Layout, Measurements};
pub use motion::{MovePlan, MoveRequest, Motion, OFFSET_EPSILON};
pub use options::{CarouselOptions, ParseOptionError};
pub use tween::{Easing, Transition, Tween};
pub use types::{
    Bounds, ChildBox, EndsAlignment, Position, SlideAlignment, SlideMode, SlideSize, Trigger,
};
