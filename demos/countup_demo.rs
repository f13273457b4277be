//! Headless walk-through: three counters below the fold, scrolled into view
//! one after another while a 60 Hz frame loop drives them.
//!
//! Run with `RUST_LOG=countup=debug` to see the state transitions.

use countup::prelude::*;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    env_logger::init();

    let observer = ViewportObserver::new(Rect::from_size(1280.0, 720.0));
    let frames = FrameLoop::new();

    let revenue = Element::with_text(Rect::new(40.0, 900.0, 300.0, 48.0), "$0.0M");
    let users = Element::with_text(Rect::new(40.0, 1400.0, 300.0, 48.0), "0");
    let uptime = Element::with_text(Rect::new(40.0, 1900.0, 300.0, 48.0), "0%");

    let counters = [
        CountUp::bind(
            revenue.clone(),
            CountUpOptions::to(12.4)
                .duration(1200.0)
                .easing(Easing::EaseOut)
                .decimals(1)
                .prefix("$")
                .suffix("M"),
            &observer,
            frames.clone(),
        ),
        CountUp::bind(
            users.clone(),
            CountUpOptions::to(48_210.0)
                .duration(1500.0)
                .tolerance(120.0)
                .easing(Easing::EaseInOut),
            &observer,
            frames.clone(),
        ),
        CountUpDirective::integer().bind_options(
            &uptime,
            CountUpOptions::to(99.9).duration(800.0).easing(Easing::EaseIn),
            &observer,
            frames.clone(),
        ),
    ];

    let elements = [("revenue", &revenue), ("users", &users), ("uptime", &uptime)];

    // Scroll 10px per frame until everything has finished
    while counters.iter().any(|c| !c.is_done()) {
        observer.scroll_by(0.0, 10.0);
        observer.check();
        frames.tick_by(FRAME_MS);

        if frames.frame_count() % 15 == 0 {
            let line: Vec<String> = elements
                .iter()
                .map(|(name, el)| format!("{name}={}", el.text()))
                .collect();
            println!("frame {:>4}: {}", frames.frame_count(), line.join("  "));
        }
    }

    for (name, el) in elements {
        println!("{name}: {}", el.text());
    }
}
