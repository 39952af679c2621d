use core::str::FromStr;

use crate::ParseOptionError;

/// How leftover stage space is distributed around a slide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SlideAlignment {
    /// All padding goes to the right of the slide.
    #[default]
    Left,
    /// All padding goes to the left of the slide.
    Right,
    Center,
}

/// Whether the first/last slide is pinned to the viewport edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EndsAlignment {
    /// Targets are clamped to `[0, total_size - stage_size]`.
    #[default]
    Sticky,
    /// The end slides honor [`SlideAlignment`] like every other slide.
    Aligned,
}

/// How child elements are grouped into slides when no fixed slide size is configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SlideMode {
    /// Pack as many whole children as fit into the stage.
    #[default]
    Multiple,
    /// One child per slide, every slide as wide as the first child.
    Single,
    /// One child per slide, widths read per child at move time.
    SingleFlex,
}

/// Configured slide size. Overrides child-based sizing when not `Auto`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SlideSize {
    #[default]
    Auto,
    Pixels(f64),
    /// Percentage of the stage width (`50.0` means half the stage).
    Percent(f64),
}

impl SlideSize {
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolves the configured size against a stage width. `None` for `Auto`.
    pub fn resolve(&self, stage_size: f64) -> Option<f64> {
        match *self {
            Self::Auto => None,
            Self::Pixels(px) => Some(px),
            Self::Percent(pct) => Some(stage_size * pct / 100.0),
        }
    }
}

/// What issued a move. Only [`Trigger::Timer`] may wrap past the last slide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Trigger {
    #[default]
    Manual,
    Timer,
    Touch,
    Nav,
    /// A re-snap issued by layout recalculation.
    Fix,
}

/// Where the carousel is: resting on a slide, or following a finger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    Settled(usize),
    /// `slide` is the slide the drag started from; `offset` is the live raw offset.
    Dragging { slide: usize, offset: f64 },
}

impl Position {
    pub fn slide(&self) -> usize {
        match *self {
            Self::Settled(slide) => slide,
            Self::Dragging { slide, .. } => slide,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::Settled(0)
    }
}

/// A child element's box along the scroll axis, measured at zero offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChildBox {
    pub left: f64,
    pub width: f64,
}

impl ChildBox {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Scrollable range in target space (positive = content scrolled left).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn contains(&self, target: f64) -> bool {
        target >= self.min && target <= self.max
    }

    /// Clamps without panicking when `max < min` (content narrower than the stage).
    pub fn clamp(&self, target: f64) -> f64 {
        target.min(self.max).max(self.min)
    }
}

impl FromStr for SlideAlignment {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" => Ok(Self::Center),
            other => Err(ParseOptionError::SlideAlignment(other.into())),
        }
    }
}

impl FromStr for EndsAlignment {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sticky" => Ok(Self::Sticky),
            "aligned" => Ok(Self::Aligned),
            other => Err(ParseOptionError::EndsAlignment(other.into())),
        }
    }
}

impl FromStr for SlideMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "multiple" => Ok(Self::Multiple),
            "single" => Ok(Self::Single),
            "single-flex" => Ok(Self::SingleFlex),
            other => Err(ParseOptionError::SlideMode(other.into())),
        }
    }
}

impl FromStr for SlideSize {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "auto" || s == "null" {
            return Ok(Self::Auto);
        }
        let invalid = || ParseOptionError::SlideSize(s.into());
        if let Some(pct) = s.strip_suffix('%') {
            let pct = pct.trim().parse::<f64>().map_err(|_| invalid())?;
            if !pct.is_finite() || pct < 0.0 {
                return Err(invalid());
            }
            return Ok(Self::Percent(pct));
        }
        let px = s.strip_suffix("px").unwrap_or(s).trim();
        let px = px.parse::<f64>().map_err(|_| invalid())?;
        if !px.is_finite() || px < 0.0 {
            return Err(invalid());
        }
        Ok(Self::Pixels(px))
    }
}
