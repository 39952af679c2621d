use crate::*;

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use carousel::{
    CarouselOptions, ChildBox, Position, SlideAlignment, SlideMode, TouchPoint, Transition, Trigger,
    Tween,
};

/// An in-memory layout host. Animated offsets are tweened against `now`.
#[derive(Debug)]
struct TestHost {
    stage: f64,
    children: Vec<f64>,
    offset: f64,
    tween: Option<Tween>,
    now: u64,
    support: TransitionSupport,
    touch: bool,
    applied: Vec<(f64, bool)>,
}

impl TestHost {
    fn new(stage: f64, children: Vec<f64>) -> Self {
        Self {
            stage,
            children,
            offset: 0.0,
            tween: None,
            now: 0,
            support: TransitionSupport::Native,
            touch: true,
            applied: Vec::new(),
        }
    }

    fn degraded(mut self) -> Self {
        self.support = TransitionSupport::None;
        self
    }

    /// Ends a finished tween. Returns `true` when the host should signal completion.
    fn finish_tween(&mut self, now: u64) -> bool {
        match self.tween {
            Some(tween) if tween.is_done(now) => {
                self.tween = None;
                self.offset = tween.to;
                self.support == TransitionSupport::Native
            }
            _ => false,
        }
    }

    fn last_applied(&self) -> Option<(f64, bool)> {
        self.applied.last().copied()
    }
}

impl Host for TestHost {
    fn stage_width(&self) -> f64 {
        self.stage
    }

    fn content_width(&self) -> f64 {
        self.children.iter().sum()
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_box(&self, index: usize) -> Option<ChildBox> {
        let width = *self.children.get(index)?;
        let left = self.children[..index].iter().sum();
        Some(ChildBox::new(left, width))
    }

    fn rendered_offset(&self) -> f64 {
        match self.tween {
            Some(tween) => tween.sample(self.now),
            None => self.offset,
        }
    }

    fn apply_offset(&mut self, offset: f64, transition: Option<&Transition>) {
        let animated = transition.is_some_and(|t| !t.is_instant());
        self.applied.push((offset, animated));
        self.tween = match transition {
            Some(t) if animated => Some(Tween::new(self.rendered_offset(), offset, self.now, *t)),
            _ => None,
        };
        self.offset = offset;
    }

    fn transition_support(&self) -> TransitionSupport {
        self.support
    }

    fn supports_touch(&self) -> bool {
        self.touch
    }
}

fn set_now(c: &mut Carousel<TestHost>, now: u64) {
    c.host_mut().now = now;
}

/// One host frame: advance the clock, tick, and report finished transitions.
fn frame(c: &mut Carousel<TestHost>, now: u64) {
    set_now(c, now);
    c.tick(now);
    if c.host_mut().finish_tween(now) {
        c.transition_finished(now);
    }
}

fn run_frames(c: &mut Carousel<TestHost>, from: u64, to: u64) {
    let mut now = from;
    while now <= to {
        frame(c, now);
        now += 10;
    }
}

fn record_moved(c: &mut Carousel<TestHost>) -> Rc<RefCell<Vec<usize>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    c.on_moved(move |&slide| sink.borrow_mut().push(slide));
    log
}

fn four_in_250(options: CarouselOptions) -> Carousel<TestHost> {
    Carousel::new(TestHost::new(250.0, vec![100.0; 4]), options)
}

#[test]
fn first_layout_pass_waits_for_the_first_tick() {
    let mut c = four_in_250(CarouselOptions::new());
    let moved = record_moved(&mut c);
    assert_eq!(c.slide_count(), 1);
    assert!(c.host().applied.is_empty());

    c.tick(0);
    assert_eq!(c.slide_count(), 2);
    assert_eq!(c.layout().slide_size, 200.0);
    assert_eq!(*moved.borrow(), vec![0]);
    assert_eq!(c.host().rendered_offset(), 0.0);
}

#[test]
fn move_to_last_slide_clamps_and_completes_on_signal() {
    let mut c = four_in_250(CarouselOptions::new());
    let moved = record_moved(&mut c);
    c.tick(0);

    set_now(&mut c, 10);
    c.move_to_index(1, MoveOptions::new(), 10);
    assert_eq!(c.host().last_applied(), Some((-150.0, true)));
    assert_eq!(c.current_slide(), 1);
    assert!(c.is_moving());

    // Signalled before the completion delay elapsed: honored once armed.
    c.transition_finished(15);
    assert!(c.is_moving());
    c.tick(10 + COMPLETION_ARM_MS);
    assert!(!c.is_moving());
    assert_eq!(*moved.borrow(), vec![0, 1]);
}

#[test]
fn animated_move_finishes_when_host_transition_ends() {
    let mut c = four_in_250(CarouselOptions::new());
    let moved = record_moved(&mut c);
    c.tick(0);

    set_now(&mut c, 10);
    c.next(10);
    run_frames(&mut c, 20, 400);
    assert!(c.is_moving());
    run_frames(&mut c, 410, 420);
    assert!(!c.is_moving());
    assert_eq!(c.host().rendered_offset(), -150.0);
    assert_eq!(*moved.borrow(), vec![0, 1]);
}

#[test]
fn reentrant_move_completes_immediately_without_moving() {
    let mut c = Carousel::new(
        TestHost::new(100.0, vec![100.0; 5]),
        CarouselOptions::new(),
    );
    let moved = record_moved(&mut c);
    c.tick(0);

    c.move_by(2, MoveOptions::new(), 10);
    assert!(c.is_moving());

    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);
    c.move_by_with(1, MoveOptions::new(), 11, move |slide| sink.set(Some(slide)));
    assert_eq!(seen.get(), Some(2));
    assert_eq!(c.current_slide(), 2);
    assert_eq!(*moved.borrow(), vec![0]);
}

#[test]
fn completion_fires_once_on_settled_and_aborted_moves() {
    let options = CarouselOptions::new().with_slide_mode(SlideMode::SingleFlex);
    let mut c = Carousel::new(TestHost::new(300.0, vec![100.0, 100.0, 100.0]), options);
    let moved = record_moved(&mut c);
    c.tick(0);
    assert_eq!(c.slide_count(), 3);

    let calls = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&calls);
    c.move_by_with(0, MoveOptions::new(), 5, move |slide| sink.borrow_mut().push(slide));
    assert_eq!(*calls.borrow(), vec![0]);
    assert_eq!(*moved.borrow(), vec![0, 0]);

    // A child disappears before the layout is recomputed.
    c.host_mut().children.pop();
    let sink = Rc::clone(&calls);
    c.move_to_index_with(2, MoveOptions::new(), 6, move |slide| {
        sink.borrow_mut().push(slide)
    });
    assert_eq!(*calls.borrow(), vec![0, 0]);
    assert_eq!(c.current_slide(), 0);
    assert!(!c.is_moving());
    assert_eq!(*moved.borrow(), vec![0, 0]);
}

#[test]
fn timer_advances_and_wraps_when_looping() {
    let options = CarouselOptions::new().with_delay(1000).with_loop(true);
    let mut c = Carousel::new(TestHost::new(100.0, vec![100.0; 3]).degraded(), options);
    let moved = record_moved(&mut c);
    c.tick(0);
    assert!(c.is_running());

    for second in 1..=3u64 {
        let now = second * 1000;
        c.tick(now);
        c.tick(now + COMPLETION_ARM_MS);
    }
    assert_eq!(*moved.borrow(), vec![0, 1, 2, 0]);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn timer_without_loop_rests_on_last_slide() {
    let options = CarouselOptions::new().with_delay(1000);
    let mut c = Carousel::new(TestHost::new(100.0, vec![100.0; 3]).degraded(), options);
    let moved = record_moved(&mut c);
    c.tick(0);

    for second in 1..=3u64 {
        let now = second * 1000;
        c.tick(now);
        c.tick(now + COMPLETION_ARM_MS);
    }
    assert_eq!(*moved.borrow(), vec![0, 1, 2, 2]);
}

#[test]
fn disabled_timer_never_advances() {
    let options = CarouselOptions::new().with_delay(0);
    let mut c = Carousel::new(TestHost::new(100.0, vec![100.0; 3]).degraded(), options);
    c.tick(0);
    c.start(0);
    assert!(!c.is_running());
    c.tick(60_000);
    assert_eq!(c.current_slide(), 0);
}

#[test]
fn quick_swipe_commits_and_resumes_timer() {
    let mut c = four_in_250(CarouselOptions::new().with_delay(5000));
    let moved = record_moved(&mut c);
    c.tick(0);

    set_now(&mut c, 100);
    c.touch_start(TouchPoint::new(200.0, 0.0), 100);
    assert!(!c.is_running());
    assert!(c.touch_move(TouchPoint::new(190.0, 0.0)));
    assert!(c.touch_move(TouchPoint::new(160.0, 0.0)));
    assert_eq!(c.host().rendered_offset(), -40.0);
    assert_eq!(
        c.position(),
        Position::Dragging {
            slide: 0,
            offset: -40.0
        }
    );

    set_now(&mut c, 150);
    c.touch_end(150);
    assert!(c.gesture().is_settling());
    assert_eq!(c.current_slide(), 1);
    assert!(!c.is_running());

    run_frames(&mut c, 160, 400);
    assert!(!c.is_moving());
    assert!(c.gesture().is_idle());
    assert!(c.is_running());
    assert_eq!(c.host().rendered_offset(), -150.0);
    assert_eq!(*moved.borrow(), vec![0, 1]);
}

#[test]
fn short_slow_drag_snaps_back() {
    let mut c = four_in_250(CarouselOptions::new());
    let moved = record_moved(&mut c);
    c.tick(0);

    c.touch_start(TouchPoint::new(200.0, 0.0), 0);
    assert!(c.touch_move(TouchPoint::new(190.0, 0.0)));
    set_now(&mut c, 1000);
    c.touch_end(1000);
    assert_eq!(c.current_slide(), 0);
    assert_eq!(c.host().last_applied(), Some((0.0, true)));

    run_frames(&mut c, 1010, 1300);
    assert_eq!(c.host().rendered_offset(), 0.0);
    assert_eq!(*moved.borrow(), vec![0, 0]);
}

#[test]
fn vertical_gesture_does_not_move_the_carousel() {
    let mut c = four_in_250(CarouselOptions::new().with_delay(5000));
    let moved = record_moved(&mut c);
    c.tick(0);

    c.touch_start(TouchPoint::new(100.0, 100.0), 10);
    assert!(!c.touch_move(TouchPoint::new(98.0, 140.0)));
    assert!(!c.touch_move(TouchPoint::new(20.0, 150.0)));
    c.touch_end(60);

    assert!(c.is_running());
    assert_eq!(c.host().rendered_offset(), 0.0);
    assert_eq!(*moved.borrow(), vec![0]);
    assert_eq!(c.position(), Position::Settled(0));
}

#[test]
fn dragging_past_the_start_is_damped() {
    let mut c = four_in_250(CarouselOptions::new());
    c.tick(0);

    c.touch_start(TouchPoint::new(0.0, 0.0), 0);
    c.touch_move(TouchPoint::new(50.0, 0.0));
    assert_eq!(c.host().rendered_offset(), 50.0);
    c.touch_move(TouchPoint::new(100.0, 0.0));
    let offset = c.host().rendered_offset();
    assert!(offset < 100.0 && offset > 50.0, "offset {offset}");
}

#[test]
fn touch_start_hard_cancels_the_running_transition() {
    let mut c = four_in_250(CarouselOptions::new().with_delay(5000));
    let moved = record_moved(&mut c);
    c.tick(0);

    set_now(&mut c, 10);
    let calls = Rc::new(Cell::new(0usize));
    let sink = Rc::clone(&calls);
    c.move_by_with(1, MoveOptions::new(), 10, move |_| sink.set(sink.get() + 1));

    set_now(&mut c, 210);
    let rendered = c.host().rendered_offset();
    assert!(rendered < 0.0 && rendered > -150.0);

    c.touch_start(TouchPoint::new(100.0, 0.0), 210);
    assert!(!c.is_moving());
    assert!(!c.is_running());
    assert_eq!(calls.get(), 1);
    assert_eq!(c.host().last_applied(), Some((rendered, false)));
    assert_eq!(
        c.position(),
        Position::Dragging {
            slide: 1,
            offset: rendered
        }
    );
    assert_eq!(*moved.borrow(), vec![0]);

    // A tap without travel still brings the content back onto the slide.
    set_now(&mut c, 220);
    c.touch_end(220);
    run_frames(&mut c, 230, 500);
    assert_eq!(c.host().rendered_offset(), -150.0);
    assert!(c.is_running());
    assert_eq!(calls.get(), 1);
    assert_eq!(*moved.borrow(), vec![0, 1]);
}

#[test]
fn touch_is_inert_without_touch_support() {
    let mut host = TestHost::new(250.0, vec![100.0; 4]);
    host.touch = false;
    let mut c = Carousel::new(host, CarouselOptions::new());
    c.tick(0);

    c.touch_start(TouchPoint::new(200.0, 0.0), 10);
    assert!(!c.touch_move(TouchPoint::new(100.0, 0.0)));
    c.touch_end(20);
    assert_eq!(c.position(), Position::Settled(0));
    assert_eq!(c.host().rendered_offset(), 0.0);
}

#[test]
fn nav_tracks_slides_and_answers_choose() {
    let options = CarouselOptions::new().with_nav(true).with_delay(3000);
    let mut c = Carousel::new(TestHost::new(100.0, vec![100.0; 4]).degraded(), options);
    c.tick(0);

    let nav = c.nav().unwrap();
    assert_eq!(nav.len(), 4);
    assert_eq!(nav.selected(), Some(0));

    let chosen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&chosen);
    c.nav_mut()
        .unwrap()
        .on_choose(move |&i| sink.borrow_mut().push(i));

    assert!(c.choose(2, 100));
    assert_eq!(*chosen.borrow(), vec![2]);
    assert_eq!(c.current_slide(), 2);
    assert_eq!(c.nav().unwrap().selected(), Some(2));
    assert!(!c.is_running());

    c.tick(100 + COMPLETION_ARM_MS);
    assert!(!c.is_moving());
    assert!(c.is_running());

    assert!(!c.choose(9, 200));
    assert_eq!(*chosen.borrow(), vec![2]);
}

#[test]
fn nav_update_then_select_marks_exactly_one_item() {
    let mut nav = Nav::new(2);
    nav.set_selected(1);
    nav.update(5);
    assert_eq!(nav.selected(), None);

    nav.set_selected(3);
    let selected: Vec<usize> = nav
        .items()
        .iter()
        .filter(|it| it.selected)
        .map(|it| it.index)
        .collect();
    assert_eq!(selected, vec![3]);
    assert!(nav.items()[3].selected);
}

#[test]
fn resize_recomputes_after_signals_settle() {
    let mut c = four_in_250(CarouselOptions::new().with_delay(5000));
    let moved = record_moved(&mut c);
    c.tick(0);
    assert_eq!(c.slide_count(), 2);

    c.host_mut().stage = 100.0;
    c.on_resize(100);
    c.on_resize(130);
    c.tick(170);
    assert_eq!(c.slide_count(), 2);

    c.tick(130 + RESIZE_SETTLE_MS);
    assert_eq!(c.layout().stage_size, 100.0);
    assert_eq!(c.slide_count(), 4);
    assert!(c.is_running());
    assert_eq!(*moved.borrow(), vec![0, 0]);
}

#[test]
fn children_changes_clamp_current_slide() {
    let mut c = Carousel::new(
        TestHost::new(100.0, vec![100.0; 5]).degraded(),
        CarouselOptions::new(),
    );
    c.tick(0);
    c.move_to_index(4, MoveOptions::new(), 10);
    c.tick(10 + COMPLETION_ARM_MS);
    assert_eq!(c.current_slide(), 4);

    c.host_mut().children.truncate(2);
    c.on_children_changed(100);
    c.tick(100 + RESIZE_SETTLE_MS);
    assert_eq!(c.slide_count(), 2);
    assert_eq!(c.current_slide(), 1);
    assert_eq!(c.host().rendered_offset(), -100.0);
}

#[test]
fn fix_wins_over_an_in_flight_move() {
    let mut c = four_in_250(CarouselOptions::new());
    let moved = record_moved(&mut c);
    c.tick(0);

    set_now(&mut c, 10);
    let calls = Rc::new(Cell::new(0usize));
    let sink = Rc::clone(&calls);
    c.move_by_with(1, MoveOptions::new(), 10, move |_| sink.set(sink.get() + 1));

    set_now(&mut c, 100);
    c.fix(100);
    assert_eq!(calls.get(), 1);
    assert!(!c.is_moving());
    assert_eq!(c.current_slide(), 1);
    assert_eq!(c.host().rendered_offset(), -150.0);
    assert_eq!(c.host().last_applied(), Some((-150.0, false)));
    assert_eq!(*moved.borrow(), vec![0, 1]);

    // The stale host signal is ignored.
    c.transition_finished(500);
    assert_eq!(calls.get(), 1);
    assert_eq!(*moved.borrow(), vec![0, 1]);
}

#[test]
fn detach_tears_down_and_tolerates_late_completion() {
    let options = CarouselOptions::new().with_nav(true).with_delay(1000);
    let mut c = four_in_250(options);
    let moved = record_moved(&mut c);
    c.tick(0);

    set_now(&mut c, 10);
    let calls = Rc::new(Cell::new(0usize));
    let sink = Rc::clone(&calls);
    c.move_by_with(1, MoveOptions::new(), 10, move |_| sink.set(sink.get() + 1));

    c.detach();
    assert!(!c.is_attached());
    assert!(!c.is_running());
    assert!(c.nav().is_none());

    c.start(20);
    assert!(!c.is_running());

    run_frames(&mut c, 20, 500);
    assert_eq!(calls.get(), 1);
    assert_eq!(*moved.borrow(), vec![0]);
    assert_eq!(c.current_slide(), 1);

    c.tick(5000);
    assert_eq!(c.current_slide(), 1);
}

#[test]
fn previous_and_explicit_transitions() {
    let mut c = Carousel::new(
        TestHost::new(100.0, vec![100.0; 3]),
        CarouselOptions::new(),
    );
    c.tick(0);

    c.move_to_index(2, MoveOptions::new().with_transition(Transition::instant()), 5);
    assert!(!c.is_moving());
    assert_eq!(c.host().last_applied(), Some((-200.0, false)));

    set_now(&mut c, 10);
    c.previous(10);
    assert_eq!(c.current_slide(), 1);
    assert_eq!(c.host().last_applied(), Some((-100.0, true)));
    assert_eq!(
        c.host().tween.map(|t| t.duration_ms),
        Some(CarouselOptions::new().transition.duration_ms)
    );

    run_frames(&mut c, 20, 420);
    let touch = MoveOptions::new().with_trigger(Trigger::Touch);
    c.move_by(-1, touch, 430);
    assert_eq!(
        c.host().tween.map(|t| t.duration_ms),
        Some(CarouselOptions::new().touch_transition.duration_ms)
    );
}

#[test]
fn emitter_unsubscribes_listeners() {
    let mut emitter = Emitter::<usize>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let a = Rc::clone(&seen);
    let b = Rc::clone(&seen);
    let first = emitter.subscribe(move |&v| a.borrow_mut().push(v));
    emitter.subscribe(move |&v| b.borrow_mut().push(v * 10));

    emitter.emit(&1);
    assert!(emitter.unsubscribe(first));
    assert!(!emitter.unsubscribe(first));
    emitter.emit(&2);
    assert_eq!(*seen.borrow(), vec![1, 10, 20]);
    assert_eq!(emitter.len(), 1);

    emitter.clear();
    assert!(emitter.is_empty());
}

#[test]
fn recalculation_during_drag_resumes_the_timer() {
    let mut c = four_in_250(CarouselOptions::new().with_delay(5000));
    c.tick(0);

    set_now(&mut c, 100);
    c.touch_start(TouchPoint::new(200.0, 0.0), 100);
    assert!(c.touch_move(TouchPoint::new(160.0, 0.0)));
    assert!(!c.is_running());

    c.on_resize(110);
    frame(&mut c, 110 + RESIZE_SETTLE_MS);
    assert!(c.gesture().is_idle());
    assert!(c.is_running());
    assert_eq!(c.position(), Position::Settled(0));
    assert_eq!(c.host().rendered_offset(), 0.0);

    // The rest of the interrupted gesture is ignored.
    assert!(!c.touch_move(TouchPoint::new(120.0, 0.0)));
    c.touch_end(200);
    run_frames(&mut c, 210, 1000);
    assert!(c.is_running());
    assert_eq!(c.current_slide(), 0);
}

#[test]
fn nav_activation_is_answered_on_next_tick() {
    let options = CarouselOptions::new().with_nav(true).with_delay(3000);
    let mut c = Carousel::new(TestHost::new(100.0, vec![100.0; 4]).degraded(), options);
    let moved = record_moved(&mut c);
    c.tick(0);

    assert!(c.nav_mut().unwrap().activate(2));
    assert_eq!(c.current_slide(), 0);

    c.tick(100);
    assert_eq!(c.current_slide(), 2);
    assert_eq!(c.nav().unwrap().selected(), Some(2));
    assert!(!c.is_running());

    c.tick(100 + COMPLETION_ARM_MS);
    assert!(c.is_running());
    assert_eq!(*moved.borrow(), vec![0, 2]);

    // Answered once.
    c.tick(200);
    assert_eq!(*moved.borrow(), vec![0, 2]);
}

#[test]
fn touch_cancel_after_travel_snaps_back() {
    let mut c = four_in_250(CarouselOptions::new().with_delay(5000));
    let moved = record_moved(&mut c);
    c.tick(0);

    set_now(&mut c, 100);
    c.touch_start(TouchPoint::new(200.0, 0.0), 100);
    assert!(c.touch_move(TouchPoint::new(50.0, 0.0)));
    assert_eq!(c.host().rendered_offset(), -150.0);

    c.touch_cancel(120);
    assert!(c.gesture().is_settling());
    assert_eq!(c.current_slide(), 0);
    assert_eq!(c.host().last_applied(), Some((0.0, true)));

    run_frames(&mut c, 130, 400);
    assert!(c.gesture().is_idle());
    assert!(c.is_running());
    assert_eq!(c.current_slide(), 0);
    assert_eq!(c.host().rendered_offset(), 0.0);
    assert_eq!(*moved.borrow(), vec![0, 0]);
}

#[test]
fn touch_cancel_without_travel_only_resumes_timer() {
    let mut c = four_in_250(CarouselOptions::new().with_delay(5000));
    let moved = record_moved(&mut c);
    c.tick(0);
    let applied = c.host().applied.len();

    c.touch_start(TouchPoint::new(200.0, 0.0), 100);
    assert!(!c.is_running());
    c.touch_cancel(110);

    assert!(c.is_running());
    assert!(c.gesture().is_idle());
    assert!(!c.is_moving());
    assert_eq!(c.host().applied.len(), applied);
    assert_eq!(*moved.borrow(), vec![0]);
}

#[test]
fn fix_after_transition_reached_target_stops_host_animation() {
    let mut c = four_in_250(CarouselOptions::new());
    let moved = record_moved(&mut c);
    c.tick(0);

    set_now(&mut c, 10);
    c.next(10);

    // The tween has reached its end but the host has not reported it yet.
    set_now(&mut c, 410);
    c.fix(410);
    assert!(c.host().tween.is_none());
    assert_eq!(c.host().last_applied(), Some((-150.0, false)));
    assert!(!c.is_moving());
    assert_eq!(*moved.borrow(), vec![0, 1]);
}

#[test]
fn multi_step_move_past_coinciding_slides_stops_at_first_progress() {
    let options = CarouselOptions::new()
        .with_slide_mode(SlideMode::Single)
        .with_slide_alignment(SlideAlignment::Right);
    let mut c = Carousel::new(TestHost::new(500.0, vec![100.0; 10]).degraded(), options);
    let moved = record_moved(&mut c);
    c.tick(0);

    c.move_to_index(2, MoveOptions::new(), 10);
    assert_eq!(c.current_slide(), 5);
    assert_eq!(c.host().last_applied(), Some((-100.0, true)));
    c.tick(10 + COMPLETION_ARM_MS);
    assert_eq!(*moved.borrow(), vec![0, 5]);
}
