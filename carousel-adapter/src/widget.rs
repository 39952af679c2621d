use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use carousel::{
    CarouselOptions, Gesture, Layout, Measurements, Motion, MovePlan, MoveRequest, Position,
    Release, TouchPoint, TouchUpdate, Transition, Trigger,
};

use crate::{Emitter, Host, ListenerId, Nav, TransitionSupport};

/// Quiet period after the last resize/mutation signal before geometry is recomputed.
pub const RESIZE_SETTLE_MS: u64 = 50;
/// Delay between applying an animated offset and listening for its completion.
pub const COMPLETION_ARM_MS: u64 = 20;

/// Per-call options for a move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveOptions {
    pub trigger: Trigger,
    /// Overrides the configured curve for this move.
    pub transition: Option<Transition>,
}

impl MoveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    fn request(self, direction: isize) -> MoveRequest {
        MoveRequest::new(direction)
            .with_trigger(self.trigger)
            .with_transition(self.transition)
    }
}

enum OnComplete {
    Nothing,
    Callback(Box<dyn FnOnce(usize)>),
    ResumeTimer,
    /// The move resolved from a touch gesture: return the gesture to idle, then resume.
    TouchSettled,
}

impl fmt::Debug for OnComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => f.write_str("Nothing"),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::ResumeTimer => f.write_str("ResumeTimer"),
            Self::TouchSettled => f.write_str("TouchSettled"),
        }
    }
}

#[derive(Debug)]
struct PendingMove {
    on_complete: OnComplete,
    arm_at_ms: u64,
    armed: bool,
    /// The host signalled completion before arming.
    signalled: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Timer {
    running: bool,
    next_due_ms: u64,
}

/// A framework-neutral carousel widget.
///
/// Wraps a [`Host`] and the headless engine. The host drives it by forwarding events:
/// - `tick(now_ms)` every frame/timer tick (initial render, resize settling, nav activations,
///   completion arming, automatic advance)
/// - `transition_finished(now_ms)` when an animated offset change ends
/// - `on_resize` / `on_children_changed` when the stage or its children change
/// - `touch_start` / `touch_move` / `touch_end` / `touch_cancel` for touch input
///
/// Everything runs on the caller's thread; nothing blocks.
#[derive(Debug)]
pub struct Carousel<H> {
    host: H,
    motion: Motion,
    gesture: Gesture,
    nav: Option<Nav>,
    moved: Emitter<usize>,
    timer: Timer,
    init_pending: bool,
    recalc_due_ms: Option<u64>,
    pending: Option<PendingMove>,
    attached: bool,
}

impl<H: Host> Carousel<H> {
    /// Creates a carousel over `host`. The first layout pass runs on the first `tick`.
    pub fn new(host: H, options: CarouselOptions) -> Self {
        let nav = options.nav.then(|| Nav::new(1));
        adebug!(?options, "Carousel::new");
        Self {
            host,
            motion: Motion::new(options),
            gesture: Gesture::new(),
            nav,
            moved: Emitter::new(),
            timer: Timer::default(),
            init_pending: true,
            recalc_due_ms: None,
            pending: None,
            attached: true,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn options(&self) -> &CarouselOptions {
        self.motion.options()
    }

    pub fn layout(&self) -> &Layout {
        self.motion.layout()
    }

    pub fn current_slide(&self) -> usize {
        self.motion.current_slide()
    }

    pub fn slide_count(&self) -> usize {
        self.motion.slide_count()
    }

    pub fn position(&self) -> Position {
        self.motion.position()
    }

    /// The raw offset the carousel last applied.
    pub fn offset(&self) -> f64 {
        self.motion.offset()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    pub fn is_running(&self) -> bool {
        self.timer.running
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn nav(&self) -> Option<&Nav> {
        self.nav.as_ref()
    }

    pub fn nav_mut(&mut self) -> Option<&mut Nav> {
        self.nav.as_mut()
    }

    /// Subscribes to "moved", emitted with the resolved slide after every settled move.
    pub fn on_moved(&mut self, listener: impl FnMut(&usize) + 'static) -> ListenerId {
        self.moved.subscribe(listener)
    }

    pub fn off_moved(&mut self, id: ListenerId) -> bool {
        self.moved.unsubscribe(id)
    }

    /// Starts (or restarts) the automatic advance timer. No-op without a configured delay.
    pub fn start(&mut self, now_ms: u64) {
        if !self.attached {
            return;
        }
        let Some(delay) = self.motion.options().delay_ms else {
            self.timer.running = false;
            return;
        };
        self.timer = Timer {
            running: true,
            next_due_ms: now_ms.saturating_add(delay),
        };
    }

    pub fn stop(&mut self) {
        self.timer.running = false;
    }

    /// Recomputes the geometry and re-snaps to the current slide without animation.
    ///
    /// An in-flight move is cancelled first; its completion callback still runs. A touch drag
    /// in progress is dropped and the timer resumes as if the gesture had been released.
    pub fn fix(&mut self, now_ms: u64) {
        let measurements = self.measure();
        let layout = Layout::compute(&measurements, self.motion.options());

        let rendered = self.host.rendered_offset();
        self.cancel_pending(rendered, now_ms);
        let dropped_drag = self.gesture.is_tracking();
        if dropped_drag {
            adebug!("touch drag dropped by recalculation");
        }
        self.gesture.reset();
        self.motion.set_layout(layout);
        self.motion.sync_offset(rendered);

        let count = self.motion.slide_count();
        if let Some(nav) = self.nav.as_mut() {
            nav.update(count);
        }
        self.select_nav(self.motion.current_slide());

        let request = MoveRequest::new(0).with_trigger(Trigger::Fix);
        let on_complete = if dropped_drag {
            OnComplete::ResumeTimer
        } else {
            OnComplete::Nothing
        };
        self.run_move(request, on_complete, now_ms);
    }

    /// Moves by `direction` slides (`0` re-snaps to the current slide).
    pub fn move_by(&mut self, direction: isize, options: MoveOptions, now_ms: u64) {
        self.run_move(options.request(direction), OnComplete::Nothing, now_ms);
    }

    /// Like [`Self::move_by`]; `on_complete` runs exactly once with the resulting slide.
    pub fn move_by_with(
        &mut self,
        direction: isize,
        options: MoveOptions,
        now_ms: u64,
        on_complete: impl FnOnce(usize) + 'static,
    ) {
        let on_complete = OnComplete::Callback(Box::new(on_complete));
        self.run_move(options.request(direction), on_complete, now_ms);
    }

    pub fn move_to_index(&mut self, index: usize, options: MoveOptions, now_ms: u64) {
        let direction = self.direction_to(index);
        self.move_by(direction, options, now_ms);
    }

    pub fn move_to_index_with(
        &mut self,
        index: usize,
        options: MoveOptions,
        now_ms: u64,
        on_complete: impl FnOnce(usize) + 'static,
    ) {
        let direction = self.direction_to(index);
        self.move_by_with(direction, options, now_ms, on_complete);
    }

    pub fn next(&mut self, now_ms: u64) {
        self.move_by(1, MoveOptions::new(), now_ms);
    }

    pub fn previous(&mut self, now_ms: u64) {
        self.move_by(-1, MoveOptions::new(), now_ms);
    }

    /// Activates navigation item `index`: emits "choose", then stops the timer, moves there and
    /// restarts the timer once the move completes.
    ///
    /// Items activated directly through [`Self::nav_mut`] get the same answer on the next
    /// `tick`. Returns `false` when there is no navigation control or no such item.
    pub fn choose(&mut self, index: usize, now_ms: u64) -> bool {
        let Some(nav) = self.nav.as_mut() else {
            return false;
        };
        if !nav.activate(index) {
            return false;
        }
        if let Some(index) = nav.take_chosen() {
            self.answer_choose(index, now_ms);
        }
        true
    }

    /// Runs whatever is due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        if self.attached && self.init_pending {
            self.init_pending = false;
            self.fix(now_ms);
            self.start(now_ms);
        }

        if self.attached {
            if let Some(due) = self.recalc_due_ms.filter(|&due| now_ms >= due) {
                atrace!(due, now_ms, "recalculating after resize");
                self.recalc_due_ms = None;
                let was_running = self.timer.running;
                self.stop();
                self.fix(now_ms);
                if was_running {
                    self.start(now_ms);
                }
            }
        }

        if self.attached {
            if let Some(index) = self.nav.as_mut().and_then(Nav::take_chosen) {
                self.answer_choose(index, now_ms);
            }
        }

        let degraded = self.host.transition_support() == TransitionSupport::None;
        let mut finish = false;
        if let Some(pending) = self.pending.as_mut() {
            if !pending.armed && now_ms >= pending.arm_at_ms {
                pending.armed = true;
                finish = pending.signalled || degraded;
            }
        }
        if finish {
            self.finish_pending(now_ms);
        }

        if self.attached && self.timer.running && now_ms >= self.timer.next_due_ms {
            if let Some(delay) = self.motion.options().delay_ms {
                self.timer.next_due_ms = now_ms.saturating_add(delay);
                let request = MoveRequest::new(1).with_trigger(Trigger::Timer);
                self.run_move(request, OnComplete::Nothing, now_ms);
            }
        }
    }

    /// The host's transition-finished signal for the carousel's content element.
    pub fn transition_finished(&mut self, now_ms: u64) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if pending.armed {
            self.finish_pending(now_ms);
        } else {
            pending.signalled = true;
        }
    }

    /// The stage was resized. Geometry is recomputed once resizing settles.
    pub fn on_resize(&mut self, now_ms: u64) {
        if self.attached {
            self.recalc_due_ms = Some(now_ms.saturating_add(RESIZE_SETTLE_MS));
        }
    }

    /// Children were added, removed or resized.
    pub fn on_children_changed(&mut self, now_ms: u64) {
        self.on_resize(now_ms);
    }

    pub fn touch_start(&mut self, point: TouchPoint, now_ms: u64) {
        if !self.attached || !self.host.supports_touch() {
            return;
        }
        let rendered = self.host.rendered_offset();
        self.cancel_pending(rendered, now_ms);
        self.stop();
        self.motion.begin_drag(rendered);
        self.gesture.start(point, now_ms, rendered);
    }

    /// Returns `true` when the host should suppress default scrolling for this event.
    pub fn touch_move(&mut self, point: TouchPoint) -> bool {
        if !self.gesture.is_tracking() {
            return false;
        }
        let bounds = self.motion.drag_bounds();
        match self.gesture.track(point, bounds) {
            TouchUpdate::Drag { offset } => {
                self.motion.drag_to(offset);
                self.host.apply_offset(offset, None);
                true
            }
            TouchUpdate::Ignored | TouchUpdate::Pending | TouchUpdate::Scroll => false,
        }
    }

    pub fn touch_end(&mut self, now_ms: u64) {
        if !self.gesture.is_tracking() {
            return;
        }
        let stage_size = self.motion.layout().stage_size;
        let release = self.gesture.release(now_ms, stage_size);
        self.resolve_release(release, now_ms);
    }

    pub fn touch_cancel(&mut self, now_ms: u64) {
        if !self.gesture.is_tracking() {
            return;
        }
        let release = self.gesture.cancel();
        self.resolve_release(release, now_ms);
    }

    /// Full teardown: drops listeners, stops the timer, destroys the navigation control.
    ///
    /// A move still in flight may complete afterwards through `transition_finished`.
    pub fn detach(&mut self) {
        adebug!("Carousel::detach");
        self.stop();
        self.moved.clear();
        if let Some(mut nav) = self.nav.take() {
            nav.destroy();
        }
        self.gesture.reset();
        self.init_pending = false;
        self.recalc_due_ms = None;
        self.attached = false;
    }

    fn answer_choose(&mut self, index: usize, now_ms: u64) {
        atrace!(index, "nav choose");
        self.stop();
        let request = MoveOptions::new()
            .with_trigger(Trigger::Nav)
            .request(self.direction_to(index));
        self.run_move(request, OnComplete::ResumeTimer, now_ms);
    }

    fn direction_to(&self, index: usize) -> isize {
        index as isize - self.motion.current_slide() as isize
    }

    /// Reads the geometry at offset 0, then restores the previous offset.
    fn measure(&mut self) -> Measurements {
        let prev = self.host.rendered_offset();
        self.host.apply_offset(0.0, None);
        let stage_width = self.host.stage_width();
        let content_width = self.host.content_width();
        let child_widths: Vec<f64> = (0..self.host.child_count())
            .map(|i| self.host.child_box(i).map_or(0.0, |c| c.width))
            .collect();
        self.host.apply_offset(prev, None);
        Measurements::new(stage_width, content_width, child_widths)
    }

    fn run_move(&mut self, request: MoveRequest, on_complete: OnComplete, now_ms: u64) {
        let host = &self.host;
        let plan = self.motion.plan_move(request, |i| host.child_box(i));
        if let Some(slide) = plan.committed_slide() {
            self.select_nav(slide);
        }

        match plan {
            MovePlan::Dropped => {
                let slide = self.motion.current_slide();
                self.complete(on_complete, slide, now_ms);
            }
            MovePlan::Aborted { slide } => {
                awarn!(slide, direction = request.direction, "move aborted");
                self.complete(on_complete, slide, now_ms);
            }
            MovePlan::Settled { slide } => {
                self.moved.emit(&slide);
                self.complete(on_complete, slide, now_ms);
            }
            MovePlan::Retry { direction, .. } => {
                let request = MoveRequest {
                    direction,
                    ..request
                };
                self.run_move(request, on_complete, now_ms);
            }
            MovePlan::Animate { to, transition, .. } => {
                if transition.is_instant() {
                    self.host.apply_offset(to, None);
                    self.settle_in_flight(on_complete, now_ms);
                } else {
                    self.host.apply_offset(to, Some(&transition));
                    self.pending = Some(PendingMove {
                        on_complete,
                        arm_at_ms: now_ms.saturating_add(COMPLETION_ARM_MS),
                        armed: false,
                        signalled: false,
                    });
                }
            }
        }
    }

    fn finish_pending(&mut self, now_ms: u64) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.settle_in_flight(pending.on_complete, now_ms);
    }

    fn settle_in_flight(&mut self, on_complete: OnComplete, now_ms: u64) {
        let slide = self
            .motion
            .finish_move()
            .unwrap_or_else(|| self.motion.current_slide());
        atrace!(slide, "move completed");
        self.moved.emit(&slide);
        self.complete(on_complete, slide, now_ms);
    }

    /// Hard-cancels an in-flight move, pinning the host at `rendered`. Its completion runs
    /// without "moved".
    fn cancel_pending(&mut self, rendered: f64, now_ms: u64) {
        let Some(slide) = self.motion.cancel_move(rendered) else {
            return;
        };
        self.host.apply_offset(rendered, None);
        adebug!(slide, rendered, "transition cancelled");
        if let Some(pending) = self.pending.take() {
            self.complete(pending.on_complete, slide, now_ms);
        }
    }

    fn resolve_release(&mut self, release: Release, now_ms: u64) {
        match release {
            Release::Commit(direction) => {
                let request = MoveRequest::new(direction).with_trigger(Trigger::Touch);
                self.run_move(request, OnComplete::TouchSettled, now_ms);
            }
            Release::SnapBack => {
                let request = MoveRequest::new(0).with_trigger(Trigger::Touch);
                self.run_move(request, OnComplete::TouchSettled, now_ms);
            }
            Release::Resume => {
                self.motion.end_drag();
                let host = &self.host;
                if self.motion.is_off_slide(|i| host.child_box(i)) {
                    // A tap that interrupted a transition left the content mid-way.
                    let request = MoveRequest::new(0).with_trigger(Trigger::Touch);
                    self.run_move(request, OnComplete::ResumeTimer, now_ms);
                } else {
                    self.start(now_ms);
                }
            }
        }
    }

    fn complete(&mut self, on_complete: OnComplete, slide: usize, now_ms: u64) {
        match on_complete {
            OnComplete::Nothing => {}
            OnComplete::Callback(f) => f(slide),
            OnComplete::ResumeTimer => self.start(now_ms),
            OnComplete::TouchSettled => {
                self.gesture.settle();
                self.start(now_ms);
            }
        }
    }

    fn select_nav(&mut self, slide: usize) {
        if let Some(nav) = self.nav.as_mut() {
            nav.set_selected(slide);
        }
    }
}
