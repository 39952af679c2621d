use carousel::{CarouselOptions, ChildBox, TouchPoint, Transition, Tween};
use carousel_adapter::{Carousel, Host, MoveOptions};

// A frame-loop host without a native transition engine of its own: it tweens offsets itself
// and reports completion back to the carousel, like a terminal or canvas renderer would.
struct FrameHost {
    stage: f64,
    children: Vec<f64>,
    offset: f64,
    tween: Option<Tween>,
    now_ms: u64,
}

impl FrameHost {
    fn advance(&mut self, now_ms: u64) -> bool {
        self.now_ms = now_ms;
        match self.tween {
            Some(tween) if tween.is_done(now_ms) => {
                self.offset = tween.to;
                self.tween = None;
                true
            }
            _ => false,
        }
    }
}

impl Host for FrameHost {
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
        Some(ChildBox::new(self.children[..index].iter().sum(), width))
    }

    fn rendered_offset(&self) -> f64 {
        self.tween.map_or(self.offset, |t| t.sample(self.now_ms))
    }

    fn apply_offset(&mut self, offset: f64, transition: Option<&Transition>) {
        self.tween = match transition {
            Some(t) if !t.is_instant() => {
                Some(Tween::new(self.rendered_offset(), offset, self.now_ms, *t))
            }
            _ => None,
        };
        self.offset = offset;
    }
}

fn frame(c: &mut Carousel<FrameHost>, now_ms: u64) {
    c.tick(now_ms);
    if c.host_mut().advance(now_ms) {
        c.transition_finished(now_ms);
    }
}

fn main() {
    let host = FrameHost {
        stage: 250.0,
        children: vec![100.0; 6],
        offset: 0.0,
        tween: None,
        now_ms: 0,
    };
    let options = CarouselOptions::new().with_delay(1_000).with_loop(true).with_nav(true);
    let mut c = Carousel::new(host, options);
    c.on_moved(|slide| println!("moved -> slide {slide}"));

    let mut now_ms = 0u64;
    while now_ms <= 4_000 {
        frame(&mut c, now_ms);
        if now_ms % 400 == 0 {
            println!(
                "t={now_ms} slide={}/{} offset={:.1}",
                c.current_slide(),
                c.slide_count(),
                c.host().rendered_offset()
            );
        }
        now_ms += 16;
    }

    // A quick swipe back toward the first slide.
    c.touch_start(TouchPoint::new(100.0, 50.0), now_ms);
    c.touch_move(TouchPoint::new(110.0, 51.0));
    c.touch_move(TouchPoint::new(160.0, 52.0));
    c.touch_end(now_ms + 80);

    for _ in 0..30 {
        now_ms += 16;
        frame(&mut c, now_ms);
    }

    c.move_to_index(0, MoveOptions::new().with_transition(Transition::instant()), now_ms);
    println!(
        "done: slide={} nav={:?}",
        c.current_slide(),
        c.nav().and_then(|nav| nav.selected())
    );
    c.detach();
}
