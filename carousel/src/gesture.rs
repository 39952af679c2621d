use crate::Bounds;

/// Travel on either axis before a gesture commits to an axis.
pub const DEADZONE_PX: f64 = 3.0;
/// Travel past the resistance anchor is divided by this factor.
pub const RESISTANCE: f64 = 1.25;
/// A release within this window counts as a flick.
pub const FLICK_MS: u64 = 250;
/// Minimum horizontal travel for a flick to commit.
pub const FLICK_PX: f64 = 20.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which way a gesture was classified once it left the deadzone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Mostly vertical: the page scrolls, the carousel ignores the rest of the gesture.
    Scroll,
    /// Mostly horizontal: the carousel follows the finger.
    Swipe,
}

/// Result of feeding a move event to the reconciler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchUpdate {
    /// No gesture is being tracked.
    Ignored,
    /// Still inside the deadzone.
    Pending,
    /// Classified as page scroll. Do not prevent the default behavior.
    Scroll,
    /// Render `offset` as the raw offset and suppress default scrolling.
    Drag { offset: f64 },
}

impl TouchUpdate {
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Drag { .. })
    }
}

/// What to do when the finger lifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Move one slide in `direction` (`+1` or `-1`).
    Commit(isize),
    /// Snap back to the current slide with `move(0)`.
    SnapBack,
    /// Nothing moved; just resume the timer.
    Resume,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Track {
    origin: TouchPoint,
    start_ms: u64,
    /// Target-space offset at touch start (`-rendered_offset`).
    start_target: f64,
    intent: Option<Intent>,
    delta_x: f64,
    low_anchor: Option<f64>,
    high_anchor: Option<f64>,
}

impl Track {
    fn resist(&mut self, target: f64, bounds: Bounds) -> f64 {
        if target < bounds.min {
            self.high_anchor = None;
            let anchor = *self.low_anchor.get_or_insert(target);
            anchor + (target - anchor) / RESISTANCE
        } else if target > bounds.max {
            self.low_anchor = None;
            let anchor = *self.high_anchor.get_or_insert(target);
            anchor + (target - anchor) / RESISTANCE
        } else {
            self.low_anchor = None;
            self.high_anchor = None;
            target
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum State {
    #[default]
    Idle,
    Tracking(Track),
    /// Released; waiting for the resulting move to complete.
    Settling,
}

/// Touch state machine: `Idle -> Tracking -> Settling -> Idle`.
///
/// Works in raw offsets at its edges (what the host renders) and in target space internally.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gesture {
    state: State,
}

impl Gesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, State::Tracking(_))
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.state, State::Settling)
    }

    pub fn intent(&self) -> Option<Intent> {
        match &self.state {
            State::Tracking(track) => track.intent,
            _ => None,
        }
    }

    /// Starts tracking from the offset currently rendered by the host.
    pub fn start(&mut self, point: TouchPoint, now_ms: u64, rendered_offset: f64) {
        self.state = State::Tracking(Track {
            origin: point,
            start_ms: now_ms,
            start_target: -rendered_offset,
            intent: None,
            delta_x: 0.0,
            low_anchor: None,
            high_anchor: None,
        });
    }

    /// Feeds a move event. `bounds` is the undamped range in target space.
    pub fn track(&mut self, point: TouchPoint, bounds: Bounds) -> TouchUpdate {
        let State::Tracking(track) = &mut self.state else {
            return TouchUpdate::Ignored;
        };
        let dx = point.x - track.origin.x;
        let dy = point.y - track.origin.y;

        match track.intent {
            Some(Intent::Scroll) => return TouchUpdate::Scroll,
            Some(Intent::Swipe) => {}
            None => {
                if dx.abs() <= DEADZONE_PX && dy.abs() <= DEADZONE_PX {
                    return TouchUpdate::Pending;
                }
                let intent = if dy.abs() > dx.abs() {
                    Intent::Scroll
                } else {
                    Intent::Swipe
                };
                ctrace!(?intent, dx, dy, "gesture axis resolved");
                track.intent = Some(intent);
                if intent == Intent::Scroll {
                    return TouchUpdate::Scroll;
                }
            }
        }

        track.delta_x = dx;
        let target = track.resist(track.start_target - dx, bounds);
        TouchUpdate::Drag { offset: -target }
    }

    /// Ends the gesture and decides whether it commits a slide change.
    pub fn release(&mut self, now_ms: u64, stage_size: f64) -> Release {
        let release = match self.state {
            State::Tracking(track) => {
                let distance = track.delta_x.abs();
                let flick = now_ms.saturating_sub(track.start_ms) < FLICK_MS && distance > FLICK_PX;
                let swipe = track.intent == Some(Intent::Swipe);
                if swipe && (flick || distance > stage_size / 2.0) {
                    Release::Commit(if track.delta_x < 0.0 { 1 } else { -1 })
                } else if track.delta_x != 0.0 {
                    Release::SnapBack
                } else {
                    Release::Resume
                }
            }
            _ => Release::Resume,
        };
        self.finish_release(release);
        release
    }

    /// Ends the gesture without ever committing (touch cancel).
    pub fn cancel(&mut self) -> Release {
        let release = match self.state {
            State::Tracking(track) if track.delta_x != 0.0 => Release::SnapBack,
            _ => Release::Resume,
        };
        self.finish_release(release);
        release
    }

    /// The move resolved from the gesture has completed.
    pub fn settle(&mut self) {
        self.state = State::Idle;
    }

    /// Forgets any gesture in progress.
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }

    fn finish_release(&mut self, release: Release) {
        ctrace!(?release, "gesture released");
        self.state = match release {
            Release::Resume => State::Idle,
            Release::Commit(_) | Release::SnapBack => State::Settling,
        };
    }
}
