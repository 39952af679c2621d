use alloc::vec::Vec;

use crate::{CarouselOptions, SlideAlignment, SlideMode};

/// Raw host measurements the geometry engine works from.
///
/// All values are taken with the content at offset 0; the adapter is responsible for the
/// measure/restore discipline around reading them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurements {
    /// Visible viewport width.
    pub stage_width: f64,
    /// True scrollable width of the content with all children laid out contiguously.
    pub content_width: f64,
    /// Rendered width of each child, in order.
    pub child_widths: Vec<f64>,
}

impl Measurements {
    pub fn new(stage_width: f64, content_width: f64, child_widths: Vec<f64>) -> Self {
        Self {
            stage_width,
            content_width,
            child_widths,
        }
    }

    /// Measurements for contiguous children with no extra content around them.
    pub fn from_children(stage_width: f64, child_widths: Vec<f64>) -> Self {
        let content_width = child_widths.iter().copied().map(sanitize).sum();
        Self::new(stage_width, content_width, child_widths)
    }
}

/// Computed slide geometry. Rebuilt wholesale on every recalculation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    pub stage_size: f64,
    pub total_size: f64,
    /// Width of one slide. Equals `stage_size` in `single-flex` mode, where widths are read
    /// per child at move time instead.
    pub slide_size: f64,
    pub slide_offset_left: f64,
    pub slide_offset_right: f64,
    /// Always at least 1.
    pub slide_count: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            stage_size: 0.0,
            total_size: 0.0,
            slide_size: 0.0,
            slide_offset_left: 0.0,
            slide_offset_right: 0.0,
            slide_count: 1,
        }
    }
}

impl Layout {
    /// Recomputes the slide geometry for the given measurements.
    pub fn compute(m: &Measurements, options: &CarouselOptions) -> Self {
        let stage_size = sanitize(m.stage_width);
        let total_size = sanitize(m.content_width);

        let (slide_size, slide_count) = if let Some(size) = options.slide_size.resolve(stage_size)
        {
            let size = sanitize(size);
            (size, count_for(total_size, size))
        } else if m.child_widths.is_empty() {
            (stage_size, 1)
        } else {
            match options.slide_mode {
                SlideMode::Single => {
                    let size = sanitize(m.child_widths[0]);
                    let count = if size > 0.0 { m.child_widths.len() } else { 1 };
                    (size, count)
                }
                SlideMode::SingleFlex => (stage_size, m.child_widths.len()),
                SlideMode::Multiple => {
                    let size = pack_children(&m.child_widths, stage_size, total_size);
                    (size, count_for(total_size, size))
                }
            }
        };

        let (slide_offset_left, slide_offset_right) =
            alignment_offsets(stage_size, slide_size, options.slide_alignment);

        let layout = Self {
            stage_size,
            total_size,
            slide_size,
            slide_offset_left,
            slide_offset_right,
            slide_count: slide_count.max(1),
        };
        cdebug!(
            stage_size = layout.stage_size,
            total_size = layout.total_size,
            slide_size = layout.slide_size,
            slide_count = layout.slide_count,
            "Layout::compute"
        );
        layout
    }

    pub fn last_slide(&self) -> usize {
        self.slide_count.saturating_sub(1)
    }

    /// Largest scroll target that keeps the stage filled (0 when the content is narrower).
    pub fn max_scroll(&self) -> f64 {
        (self.total_size - self.stage_size).max(0.0)
    }

    /// Target for a slide under uniform per-slide offsets (every mode but `single-flex`).
    pub fn slide_target(&self, index: usize) -> f64 {
        let i = index as f64;
        i * self.stage_size - i * (self.slide_offset_left + self.slide_offset_right)
            - self.slide_offset_left
    }
}

/// Sums whole children that fit into the stage.
///
/// When not even the first child fits and that leaves the slide narrower than the content,
/// the slide falls back to the full stage width. Later windows are not re-checked.
fn pack_children(child_widths: &[f64], stage_size: f64, total_size: f64) -> f64 {
    let mut width = 0.0;
    let mut packed = 0usize;
    for &w in child_widths {
        let w = sanitize(w);
        if width + w > stage_size {
            break;
        }
        width += w;
        packed += 1;
    }
    if packed == 0 && width < total_size {
        return stage_size;
    }
    width
}

fn count_for(total_size: f64, slide_size: f64) -> usize {
    if slide_size <= 0.0 {
        return 1;
    }
    let count = (total_size / slide_size).ceil();
    if count.is_finite() && count >= 1.0 {
        count as usize
    } else {
        1
    }
}

fn alignment_offsets(stage_size: f64, slide_size: f64, alignment: SlideAlignment) -> (f64, f64) {
    let base = (stage_size - slide_size) / 2.0;
    match alignment {
        SlideAlignment::Left => (0.0, base * 2.0),
        SlideAlignment::Right => (base * 2.0, 0.0),
        SlideAlignment::Center => (base, base),
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        cwarn!(value = v, "non-finite measurement treated as 0");
        0.0
    }
}
