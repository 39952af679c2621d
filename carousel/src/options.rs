use alloc::string::String;

use crate::{EndsAlignment, SlideAlignment, SlideMode, SlideSize, Transition};
use crate::{Easing, Trigger};

/// Error returned when parsing a string-form carousel option.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseOptionError {
    #[error("invalid slide size `{0}` (expected `auto`, a pixel count or a percentage)")]
    SlideSize(String),
    #[error("invalid slide alignment `{0}` (expected `left`, `right` or `center`)")]
    SlideAlignment(String),
    #[error("invalid slide ends alignment `{0}` (expected `sticky` or `aligned`)")]
    EndsAlignment(String),
    #[error("invalid slide mode `{0}` (expected `multiple`, `single` or `single-flex`)")]
    SlideMode(String),
}

/// Configuration for a carousel. Immutable once handed to the engine.
///
/// With `feature = "serde"`, options (de)serialize with kebab-case keys (`delay`, `loop`,
/// `slide-size`, `slide-alignment`, `slide-ends-alignment`, `slide-mode`, ...). A `delay` that is
/// non-positive or not a number deserializes to "timer disabled".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct CarouselOptions {
    /// Milliseconds between automatic advances. `None` disables the timer.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "delay", deserialize_with = "crate::options::serde_impl::delay")
    )]
    pub delay_ms: Option<u64>,
    /// Whether a timer-driven advance past the last slide wraps to slide 0.
    #[cfg_attr(feature = "serde", serde(rename = "loop"))]
    pub looping: bool,
    pub slide_size: SlideSize,
    pub slide_alignment: SlideAlignment,
    pub slide_ends_alignment: EndsAlignment,
    /// Ignored when `slide_size` is not `Auto`.
    pub slide_mode: SlideMode,
    /// Curve used by ordinary moves.
    pub transition: Transition,
    /// Curve used by moves resolved from a touch gesture.
    pub touch_transition: Transition,
    /// Whether the adapter should pair a navigation control with the carousel.
    pub nav: bool,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            delay_ms: None,
            looping: false,
            slide_size: SlideSize::Auto,
            slide_alignment: SlideAlignment::Left,
            slide_ends_alignment: EndsAlignment::Sticky,
            slide_mode: SlideMode::Multiple,
            transition: Transition::default(),
            touch_transition: Transition::new(250, Easing::EaseOutCubic),
            nav: false,
        }
    }
}

impl CarouselOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timer delay. Non-positive values disable the timer.
    pub fn with_delay(mut self, delay_ms: i64) -> Self {
        self.delay_ms = u64::try_from(delay_ms).ok().filter(|&d| d > 0);
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_slide_size(mut self, slide_size: SlideSize) -> Self {
        self.slide_size = slide_size;
        self
    }

    pub fn with_slide_alignment(mut self, slide_alignment: SlideAlignment) -> Self {
        self.slide_alignment = slide_alignment;
        self
    }

    pub fn with_slide_ends_alignment(mut self, slide_ends_alignment: EndsAlignment) -> Self {
        self.slide_ends_alignment = slide_ends_alignment;
        self
    }

    pub fn with_slide_mode(mut self, slide_mode: SlideMode) -> Self {
        self.slide_mode = slide_mode;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_touch_transition(mut self, touch_transition: Transition) -> Self {
        self.touch_transition = touch_transition;
        self
    }

    pub fn with_nav(mut self, nav: bool) -> Self {
        self.nav = nav;
        self
    }

    pub fn is_sticky(&self) -> bool {
        self.slide_ends_alignment == EndsAlignment::Sticky
    }

    /// The slide mode in effect: a configured slide size turns child-based modes off.
    pub fn effective_mode(&self) -> Option<SlideMode> {
        if self.slide_size.is_auto() {
            Some(self.slide_mode)
        } else {
            None
        }
    }

    /// `single` or `single-flex` with automatic sizing.
    pub fn is_single_like(&self) -> bool {
        matches!(
            self.effective_mode(),
            Some(SlideMode::Single | SlideMode::SingleFlex)
        )
    }

    pub fn is_single_flex(&self) -> bool {
        self.effective_mode() == Some(SlideMode::SingleFlex)
    }

    /// The curve a move uses when the request does not name one.
    pub fn transition_for(&self, trigger: Trigger) -> Transition {
        match trigger {
            Trigger::Touch => self.touch_transition,
            Trigger::Fix => Transition::instant(),
            _ => self.transition,
        }
    }
}

#[cfg(feature = "serde")]
pub(crate) mod serde_impl {
    use core::fmt;

    use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};

    use crate::SlideSize;

    pub(crate) fn delay<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        d.deserialize_any(DelayVisitor)
    }

    struct DelayVisitor;

    impl<'de> Visitor<'de> for DelayVisitor {
        type Value = Option<u64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a delay in milliseconds")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v).filter(|&d| d > 0))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(u64::try_from(v).ok().filter(|&d| d > 0))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() && v > 0.0 {
                Ok(Some((v as u64).max(1)))
            } else {
                Ok(None)
            }
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(DelayVisitor)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    impl serde::Serialize for SlideSize {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            match *self {
                SlideSize::Auto => s.serialize_none(),
                SlideSize::Pixels(px) => s.serialize_f64(px),
                SlideSize::Percent(pct) => s.collect_str(&format_args!("{pct}%")),
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for SlideSize {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_any(SlideSizeVisitor)
        }
    }

    struct SlideSizeVisitor;

    impl<'de> Visitor<'de> for SlideSizeVisitor {
        type Value = SlideSize;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("null, a pixel count, or a percentage string such as \"50%\"")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(SlideSize::Pixels(v as f64))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            if v < 0 {
                return Err(E::invalid_value(de::Unexpected::Signed(v), &self));
            }
            Ok(SlideSize::Pixels(v as f64))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if !v.is_finite() || v < 0.0 {
                return Err(E::invalid_value(de::Unexpected::Float(v), &self));
            }
            Ok(SlideSize::Pixels(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(SlideSize::Auto)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(SlideSize::Auto)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(SlideSizeVisitor)
        }
    }
}
