use crate::{Bounds, CarouselOptions, ChildBox, Layout, Position, SlideAlignment, Transition, Trigger};

/// Raw offsets closer than this are considered equal.
pub const OFFSET_EPSILON: f64 = 0.5;

/// A request to move by a relative number of slides.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveRequest {
    /// Relative slide count. `0` re-snaps to the current slide.
    pub direction: isize,
    pub trigger: Trigger,
    /// Overrides the curve [`CarouselOptions::transition_for`] would pick.
    pub transition: Option<Transition>,
}

impl MoveRequest {
    pub fn new(direction: isize) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_transition(mut self, transition: Option<Transition>) -> Self {
        self.transition = transition;
        self
    }
}

/// What the adapter has to do to carry out a move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MovePlan {
    /// A transition is already in flight. Nothing changed; complete the caller immediately.
    Dropped,
    /// The target could not be resolved (missing child). `slide` is the unchanged current slide.
    Aborted { slide: usize },
    /// Already resting at the target offset. Emit "moved" and complete immediately.
    Settled { slide: usize },
    /// The committed slide renders at the same offset as before; issue the move again one step
    /// further (`direction` is `+1` or `-1`) so it makes visible progress.
    Retry { slide: usize, direction: isize },
    /// Animate the raw offset from `from` to `to`, then call [`Motion::finish_move`].
    Animate {
        slide: usize,
        from: f64,
        to: f64,
        transition: Transition,
    },
}

impl MovePlan {
    /// The slide the plan committed, if any.
    pub fn committed_slide(&self) -> Option<usize> {
        match *self {
            Self::Dropped | Self::Aborted { .. } => None,
            Self::Settled { slide } | Self::Retry { slide, .. } | Self::Animate { slide, .. } => {
                Some(slide)
            }
        }
    }
}

/// The discrete motion controller.
///
/// Owns the current slide, the raw offset mirror of the last applied transform, and the
/// in-flight flag. It never touches a UI: every operation returns what the adapter should
/// render.
#[derive(Clone, Debug)]
pub struct Motion {
    options: CarouselOptions,
    layout: Layout,
    position: Position,
    offset: f64,
    in_flight: Option<usize>,
}

impl Motion {
    pub fn new(options: CarouselOptions) -> Self {
        Self {
            options,
            layout: Layout::default(),
            position: Position::default(),
            offset: 0.0,
            in_flight: None,
        }
    }

    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn current_slide(&self) -> usize {
        self.position.slide()
    }

    pub fn slide_count(&self) -> usize {
        self.layout.slide_count
    }

    /// The raw offset of the last applied transform (`<= 0` when scrolled forward).
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_moving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Replaces the layout and clamps the current slide into the new range.
    ///
    /// Any drag in progress is dropped back to a settled position.
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        let slide = self.position.slide().min(self.layout.last_slide());
        self.position = Position::Settled(slide);
    }

    /// Overwrites the offset mirror, e.g. after the host was re-measured.
    pub fn sync_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Scroll target (positive pixels) for a slide, after the sticky clamp.
    ///
    /// `child` is only consulted in `single-flex` mode; `None` means the child is gone.
    pub fn target_for(
        &self,
        index: usize,
        child: impl FnOnce(usize) -> Option<ChildBox>,
    ) -> Option<f64> {
        let layout = &self.layout;
        let target = if self.options.is_single_flex() {
            let child = child(index)?;
            let slack = layout.stage_size - child.width;
            match self.options.slide_alignment {
                SlideAlignment::Left => child.left,
                SlideAlignment::Right => child.left - slack,
                SlideAlignment::Center => child.left - slack / 2.0,
            }
        } else {
            layout.slide_target(index)
        };

        if self.options.is_sticky() {
            let bounds = Bounds {
                min: 0.0,
                max: layout.max_scroll(),
            };
            Some(bounds.clamp(target))
        } else {
            Some(target)
        }
    }

    /// Resolves a move request against the current state and commits the target slide.
    pub fn plan_move(
        &mut self,
        request: MoveRequest,
        child: impl FnOnce(usize) -> Option<ChildBox>,
    ) -> MovePlan {
        if self.in_flight.is_some() {
            ctrace!(direction = request.direction, "move dropped: transition in flight");
            return MovePlan::Dropped;
        }

        let current = self.position.slide();
        let last = self.layout.last_slide();
        let mut index = (current as isize)
            .saturating_add(request.direction)
            .clamp(0, last as isize) as usize;
        if self.options.looping
            && request.direction == 1
            && request.trigger == Trigger::Timer
            && current == last
        {
            index = 0;
        }

        let Some(target) = self.target_for(index, child) else {
            cdebug!(index, "move aborted: no child at target");
            self.position = Position::Settled(current);
            return MovePlan::Aborted { slide: current };
        };

        self.position = Position::Settled(index);
        let to = -target;

        if (self.offset - to).abs() < OFFSET_EPSILON {
            let interior = index > 0 && index < last;
            if request.direction != 0
                && self.options.is_sticky()
                && self.options.is_single_like()
                && interior
            {
                let direction = request.direction.signum();
                ctrace!(index, direction, "move retry");
                return MovePlan::Retry {
                    slide: index,
                    direction,
                };
            }
            ctrace!(index, "move settled in place");
            return MovePlan::Settled { slide: index };
        }

        let transition = request
            .transition
            .unwrap_or_else(|| self.options.transition_for(request.trigger));
        let from = self.offset;
        self.offset = to;
        self.in_flight = Some(index);
        ctrace!(index, from, to, "move animate");
        MovePlan::Animate {
            slide: index,
            from,
            to,
            transition,
        }
    }

    /// Clears the in-flight flag. Returns the resolved slide when a move was in flight.
    pub fn finish_move(&mut self) -> Option<usize> {
        let slide = self.in_flight.take()?;
        ctrace!(slide, "move finished");
        Some(slide)
    }

    /// Hard-cancels the in-flight move, pinning the offset mirror to what is on screen.
    ///
    /// The committed slide is kept. Returns it when a move was in flight.
    pub fn cancel_move(&mut self, rendered_offset: f64) -> Option<usize> {
        let slide = self.in_flight.take()?;
        self.offset = rendered_offset;
        cdebug!(slide, rendered_offset, "move cancelled");
        Some(slide)
    }

    /// Enters free-form dragging from the given rendered offset.
    pub fn begin_drag(&mut self, rendered_offset: f64) {
        self.offset = rendered_offset;
        self.position = Position::Dragging {
            slide: self.position.slide(),
            offset: rendered_offset,
        };
    }

    /// Applies a live drag offset without touching the current slide.
    pub fn drag_to(&mut self, offset: f64) {
        self.offset = offset;
        if let Position::Dragging { slide, .. } = self.position {
            self.position = Position::Dragging { slide, offset };
        }
    }

    /// Leaves dragging without a move; the offset mirror keeps the last drag offset.
    pub fn end_drag(&mut self) {
        self.position = Position::Settled(self.position.slide());
    }

    /// Whether the offset mirror sits away from the current slide's resting target.
    pub fn is_off_slide(&self, child: impl FnOnce(usize) -> Option<ChildBox>) -> bool {
        match self.target_for(self.current_slide(), child) {
            Some(target) => (self.offset + target).abs() >= OFFSET_EPSILON,
            None => false,
        }
    }

    /// The range a drag may travel before resistance kicks in, in target space.
    pub fn drag_bounds(&self) -> Bounds {
        let max = self.layout.max_scroll();
        if self.options.is_sticky() {
            Bounds { min: 0.0, max }
        } else {
            Bounds {
                min: -self.layout.slide_offset_left,
                max: max + self.layout.slide_offset_right,
            }
        }
    }
}
