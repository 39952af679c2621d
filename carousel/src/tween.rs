/// A transition curve: how long a move animates and how it eases.
///
/// A zero duration is an instant transition (no animation, no completion signal to wait for).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Transition {
    pub const fn new(duration_ms: u64, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }

    pub const fn instant() -> Self {
        Self::new(0, Easing::Linear)
    }

    pub fn is_instant(&self) -> bool {
        self.duration_ms == 0
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(400, Easing::EaseInOutCubic)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    Linear,
    SmoothStep,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    pub fn sample(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
        }
    }
}

/// Samples a [`Transition`] between two raw offsets.
///
/// Hosts without a native transition engine (terminals, canvases, tests) can hold one of these
/// per in-flight move, apply `sample(now_ms)` every frame, and report completion once
/// `is_done(now_ms)` holds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, start_ms: u64, transition: Transition) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: transition.duration_ms.max(1),
            easing: transition.easing,
        }
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    pub fn sample(&self, now_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = (elapsed as f64 / self.duration_ms as f64).clamp(0.0, 1.0);
        let eased = self.easing.sample(t);
        self.from + (self.to - self.from) * eased
    }

    pub fn retarget(&mut self, now_ms: u64, new_to: f64, transition: Transition) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, new_to, now_ms, transition);
    }
}
