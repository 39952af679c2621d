use carousel::{ChildBox, Transition};

/// Whether the host reports when an animated offset change has finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionSupport {
    /// The host calls [`crate::Carousel::transition_finished`] when an animation ends.
    #[default]
    Native,
    /// No completion signal. Moves are assumed finished once the completion delay elapses.
    None,
}

/// The layout/style system a carousel renders into (e.g. a DOM list element).
///
/// All reads are synchronous. Widths are in pixels; offsets are signed raw transform values
/// (`<= 0` when the content is scrolled forward).
pub trait Host {
    /// Visible viewport width.
    fn stage_width(&self) -> f64;

    /// Full scrollable content width. Only read while the content is at offset 0.
    fn content_width(&self) -> f64;

    fn child_count(&self) -> usize;

    /// Box of the child at `index`, relative to the content start. `None` if it no longer exists.
    fn child_box(&self, index: usize) -> Option<ChildBox>;

    /// The raw offset currently on screen, read from the live transform.
    ///
    /// While an animation runs this differs from the last offset the carousel applied.
    fn rendered_offset(&self) -> f64;

    /// Applies a raw offset, animated with `transition` when given, instantly otherwise.
    fn apply_offset(&mut self, offset: f64, transition: Option<&Transition>);

    fn transition_support(&self) -> TransitionSupport {
        TransitionSupport::Native
    }

    /// Touch handling is inert when this returns `false`.
    fn supports_touch(&self) -> bool {
        true
    }
}
