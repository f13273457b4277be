//! Visibility-triggered count-up animation.
//!
//! A [`CountUp`] binds one element to one animation. It waits for the
//! element to scroll into view, then counts from `start` to `end` over the
//! configured duration, rewriting the element's text every frame.
//!
//! The element can be any host node implementing
//! [`TextTarget`](crate::platform::TextTarget), watched by a
//! [`VisibilityService`](crate::platform::VisibilityService) for that node
//! type. It defaults to the headless [`Element`].
//!
//! ```
//! use countup::prelude::*;
//!
//! let observer = ViewportObserver::new(Rect::from_size(800.0, 600.0));
//! let frames = FrameLoop::new();
//! let el = Element::new(Rect::new(0.0, 100.0, 200.0, 40.0));
//!
//! let counter = CountUp::new(el.clone(), CountUpOptions::to(100.0).duration(1000.0));
//! counter.attach(&observer, frames.clone());
//!
//! observer.check(); // element is on screen: the run starts
//! frames.tick(500.0);
//! assert_eq!(el.text(), "50");
//! frames.tick(1000.0);
//! assert_eq!(el.text(), "100");
//! assert!(counter.is_done());
//! ```
//!
//! ## States
//!
//! `Idle → Armed → Running → Done`. A binding plays at most once: there is
//! no transition back to `Idle`. [`CountUp::dispose`] moves an `Idle` or
//! `Armed` binding to `Disposed` and releases its visibility watch; once
//! running, the animation always completes.

mod directive;
mod format;
mod options;

pub use directive::{CountUpDirective, Rendering};
pub use format::{to_fixed, FixedDecimals, IntegerFloor, ValueFormatter};
pub use options::{CountUpOptions, OptionsError, DEFAULT_DURATION_MS, MAX_DECIMALS};

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::animation::Tween;
use crate::element::Element;
use crate::platform::{
    FrameScheduler, IntersectionEntry, Subscription, TextTarget, VisibilityService,
};

/// The one in-flight run of a binding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationRun {
    /// Scheduler time at which the element became visible
    pub started_at: f64,
    /// Latest linear progress rendered, in `[0, 1]`
    pub progress: f64,
}

/// Lifecycle of a count-up binding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunState {
    /// Created, not yet watching for visibility
    Idle,
    /// Waiting for the element to become visible
    Armed,
    Running(AnimationRun),
    /// Landed on the end value
    Done,
    /// Torn down before the run started
    Disposed,
}

impl RunState {
    /// True once the run has started, whether or not it has finished.
    pub fn has_animated(&self) -> bool {
        matches!(self, RunState::Running(_) | RunState::Done)
    }
}

struct Binding<T: ?Sized> {
    element: Rc<T>,
    options: CountUpOptions,
    tween: Tween,
    formatter: Box<dyn ValueFormatter>,
    state: RunState,
    watch: Option<Subscription>,
    frames: Option<Rc<dyn FrameScheduler>>,
}

/// Text writes produced by one frame, applied once the binding is released.
struct FrameOutput<T: ?Sized> {
    element: Rc<T>,
    texts: Vec<String>,
    next_frame: Option<Rc<dyn FrameScheduler>>,
}

/// A count-up animation bound to one element.
///
/// Cloning yields another handle to the same binding. The binding lives as
/// long as any handle does; dropping the last handle stops pending frames and
/// disconnects the visibility watch.
#[must_use = "dropping every handle to a CountUp stops its animation"]
pub struct CountUp<T: ?Sized = Element> {
    inner: Rc<RefCell<Binding<T>>>,
}

impl<T: ?Sized> Clone for CountUp<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: TextTarget + ?Sized + 'static> CountUp<T> {
    /// Bind `options` to `element`, rendering with fixed decimals and the
    /// configured prefix and suffix.
    pub fn new(element: Rc<T>, options: CountUpOptions) -> Self {
        let formatter = FixedDecimals::from(&options);
        Self::with_formatter(element, options, formatter)
    }

    /// Bind `options` to `element` with a custom rendering strategy.
    pub fn with_formatter(
        element: Rc<T>,
        options: CountUpOptions,
        formatter: impl ValueFormatter + 'static,
    ) -> Self {
        let tween = options.tween();
        Self {
            inner: Rc::new(RefCell::new(Binding {
                element,
                options,
                tween,
                formatter: Box::new(formatter),
                state: RunState::Idle,
                watch: None,
                frames: None,
            })),
        }
    }

    /// Create a binding and arm it in one go.
    pub fn bind<V, F>(
        element: Rc<T>,
        options: CountUpOptions,
        visibility: &V,
        frames: F,
    ) -> Self
    where
        V: VisibilityService<T> + ?Sized,
        F: FrameScheduler + 'static,
    {
        let counter = Self::new(element, options);
        counter.attach(visibility, frames);
        counter
    }

    /// Start watching the element's visibility.
    ///
    /// Only an `Idle` binding can be armed; calling this in any other state
    /// does nothing.
    pub fn attach<V, F>(&self, visibility: &V, frames: F)
    where
        V: VisibilityService<T> + ?Sized,
        F: FrameScheduler + 'static,
    {
        let (element, root_margin) = {
            let mut binding = self.inner.borrow_mut();
            if binding.state != RunState::Idle {
                log::debug!(
                    "count-up on element {:p} already attached ({:?})",
                    binding.element,
                    binding.state
                );
                return;
            }
            binding.frames = Some(Rc::new(frames));
            binding.state = RunState::Armed;
            (binding.element.clone(), binding.options.root_margin())
        };

        let weak = Rc::downgrade(&self.inner);
        let watch = visibility.observe(
            &element,
            root_margin,
            Box::new(move |entry: &IntersectionEntry| {
                if entry.is_intersecting {
                    if let Some(inner) = weak.upgrade() {
                        Binding::trigger(&inner);
                    }
                }
            }),
        );

        let mut binding = self.inner.borrow_mut();
        if binding.state == RunState::Armed {
            log::debug!(
                "count-up armed on element {:p} (tolerance {}px)",
                element,
                binding.options.tolerance_px
            );
            binding.watch = Some(watch);
        } else {
            // The service reported visibility before `observe` returned
            drop(binding);
            watch.cancel();
        }
    }

    /// Release the visibility watch if the run has not started yet.
    ///
    /// A running animation is left to finish; a finished one is untouched.
    pub fn dispose(&self) {
        let watch = {
            let mut binding = self.inner.borrow_mut();
            match binding.state {
                RunState::Idle | RunState::Armed => {
                    log::debug!("count-up on element {:p} disposed", binding.element);
                    binding.state = RunState::Disposed;
                    binding.watch.take()
                }
                _ => None,
            }
        };
        drop(watch);
    }

    pub fn state(&self) -> RunState {
        self.inner.borrow().state
    }

    /// True once the animation has been triggered.
    pub fn has_animated(&self) -> bool {
        self.state().has_animated()
    }

    pub fn is_done(&self) -> bool {
        self.state() == RunState::Done
    }

    /// True while a visibility watch is connected.
    pub fn is_watching(&self) -> bool {
        self.inner.borrow().watch.is_some()
    }
}

impl<T: ?Sized> fmt::Debug for CountUp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = self.inner.borrow();
        f.debug_struct("CountUp")
            .field("element", &Rc::as_ptr(&binding.element))
            .field("options", &binding.options)
            .field("state", &binding.state)
            .finish()
    }
}

impl<T: TextTarget + ?Sized + 'static> Binding<T> {
    /// Armed → Running. Later calls are ignored.
    fn trigger(inner: &Rc<RefCell<Binding<T>>>) {
        let (watch, frames) = {
            let mut binding = inner.borrow_mut();
            if binding.state != RunState::Armed {
                return;
            }
            let Some(frames) = binding.frames.clone() else {
                return;
            };
            let started_at = frames.now();
            binding.state = RunState::Running(AnimationRun {
                started_at,
                progress: 0.0,
            });
            log::debug!(
                "count-up on element {:p} started at {:.1}ms: {} -> {} over {}ms ({})",
                binding.element,
                started_at,
                binding.tween.from,
                binding.tween.to,
                binding.tween.duration_ms,
                binding.tween.easing
            );
            (binding.watch.take(), frames)
        };

        drop(watch);
        Self::schedule(inner, frames.as_ref());
    }

    fn schedule(inner: &Rc<RefCell<Binding<T>>>, frames: &dyn FrameScheduler) {
        let weak: Weak<RefCell<Binding<T>>> = Rc::downgrade(inner);
        frames.request_frame(Box::new(move |timestamp| {
            if let Some(inner) = weak.upgrade() {
                Binding::on_frame(&inner, timestamp);
            }
        }));
    }

    fn on_frame(inner: &Rc<RefCell<Binding<T>>>, timestamp: f64) {
        let Some(output) = inner.borrow_mut().advance(timestamp) else {
            return;
        };

        for text in &output.texts {
            output.element.set_text(text);
        }
        if let Some(frames) = output.next_frame {
            Self::schedule(inner, frames.as_ref());
        }
    }

    fn advance(&mut self, timestamp: f64) -> Option<FrameOutput<T>> {
        let RunState::Running(run) = self.state else {
            return None;
        };

        // Never step backwards, even if the host clock does
        let progress = self
            .tween
            .progress(timestamp - run.started_at)
            .max(run.progress);
        let value = self.tween.value_at(progress);
        let mut texts = vec![self.formatter.format(value)];
        log::trace!(
            "count-up frame at {:.1}ms: progress {:.3}, value {}",
            timestamp,
            progress,
            value
        );

        let next_frame = if progress < 1.0 {
            self.state = RunState::Running(AnimationRun {
                started_at: run.started_at,
                progress,
            });
            self.frames.clone()
        } else {
            // Land exactly on `end`, not on the last interpolated value
            texts.push(self.formatter.format(self.tween.to));
            self.state = RunState::Done;
            log::debug!("count-up on element {:p} done", self.element);
            None
        };

        Some(FrameOutput {
            element: self.element.clone(),
            texts,
            next_frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Easing;
    use crate::layout::{Insets, Rect};
    use crate::platform::{FrameLoop, IntersectionHandler, ViewportObserver};
    use std::cell::Cell;

    /// Reports every target as visible from inside `observe`.
    #[derive(Default)]
    struct AlwaysVisible {
        observed: Cell<usize>,
        cancelled: Rc<Cell<usize>>,
    }

    impl<T: ?Sized> VisibilityService<T> for AlwaysVisible {
        fn observe(
            &self,
            _target: &Rc<T>,
            _root_margin: Insets,
            mut handler: IntersectionHandler,
        ) -> Subscription {
            self.observed.set(self.observed.get() + 1);
            handler(&IntersectionEntry {
                is_intersecting: true,
            });
            let cancelled = self.cancelled.clone();
            Subscription::new(move || cancelled.set(cancelled.get() + 1))
        }
    }

    /// Host node that keeps every text it was given.
    #[derive(Default)]
    struct Label {
        texts: RefCell<Vec<String>>,
    }

    impl TextTarget for Label {
        fn set_text(&self, text: &str) {
            self.texts.borrow_mut().push(text.to_string());
        }
    }

    fn setup(element_y: f32) -> (ViewportObserver, FrameLoop, Rc<Element>) {
        let observer = ViewportObserver::new(Rect::from_size(800.0, 600.0));
        let frames = FrameLoop::new();
        let el = Element::new(Rect::new(0.0, element_y, 200.0, 40.0));
        (observer, frames, el)
    }

    #[test]
    fn test_starts_idle() {
        let (_, _, el) = setup(0.0);
        let counter = CountUp::new(el, CountUpOptions::to(10.0));
        assert_eq!(counter.state(), RunState::Idle);
        assert!(!counter.has_animated());
    }

    #[test]
    fn test_attach_arms() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::new(el, CountUpOptions::to(10.0));
        counter.attach(&observer, frames);
        assert_eq!(counter.state(), RunState::Armed);
        assert!(counter.is_watching());
        assert_eq!(observer.watch_count(), 1);
    }

    #[test]
    fn test_second_attach_is_ignored() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::new(el, CountUpOptions::to(10.0));
        counter.attach(&observer, frames.clone());
        counter.attach(&observer, frames);
        assert_eq!(observer.watch_count(), 1);
    }

    #[test]
    fn test_trigger_disconnects_watch() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::bind(el, CountUpOptions::to(10.0), &observer, frames.clone());

        observer.check();
        assert!(matches!(counter.state(), RunState::Running(_)));
        assert!(!counter.is_watching());
        assert_eq!(observer.watch_count(), 0);
        assert_eq!(frames.pending(), 1);
    }

    #[test]
    fn test_run_starts_at_scheduler_time() {
        let (observer, _, el) = setup(0.0);
        let frames = FrameLoop::starting_at(250.0);
        let counter = CountUp::bind(el, CountUpOptions::to(10.0), &observer, frames);

        observer.check();
        assert_eq!(
            counter.state(),
            RunState::Running(AnimationRun {
                started_at: 250.0,
                progress: 0.0
            })
        );
    }

    #[test]
    fn test_lands_on_end() {
        let (observer, frames, el) = setup(0.0);
        let options = CountUpOptions::to(1.0 / 3.0)
            .duration(100.0)
            .decimals(4)
            .easing(Easing::EaseInOut);
        let counter = CountUp::bind(el.clone(), options, &observer, frames.clone());

        observer.check();
        frames.run_until_idle(16.0, 100);
        assert!(counter.is_done());
        assert_eq!(el.text(), "0.3333");
    }

    #[test]
    fn test_final_frame_writes_end_after_value() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::bind(
            el.clone(),
            CountUpOptions::to(10.0).duration(100.0),
            &observer,
            frames.clone(),
        );

        observer.check();
        frames.tick(200.0);
        assert!(counter.is_done());
        assert_eq!(el.text_writes(), 2);
        assert!(!frames.has_pending());
    }

    #[test]
    fn test_progress_never_decreases() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::bind(
            el.clone(),
            CountUpOptions::to(100.0).duration(1000.0),
            &observer,
            frames.clone(),
        );

        observer.check();
        frames.tick(600.0);
        assert_eq!(el.text(), "60");
        frames.tick(300.0);
        assert_eq!(el.text(), "60");
        match counter.state() {
            RunState::Running(run) => assert_eq!(run.progress, 0.6),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_dispose_before_trigger() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::bind(el.clone(), CountUpOptions::to(10.0), &observer, frames.clone());

        counter.dispose();
        assert_eq!(counter.state(), RunState::Disposed);
        assert_eq!(observer.watch_count(), 0);

        observer.check();
        frames.tick(5000.0);
        assert_eq!(el.text_writes(), 0);
    }

    #[test]
    fn test_dispose_while_running_is_ignored() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::bind(
            el.clone(),
            CountUpOptions::to(10.0).duration(100.0),
            &observer,
            frames.clone(),
        );

        observer.check();
        counter.dispose();
        frames.run_until_idle(16.0, 100);
        assert!(counter.is_done());
        assert_eq!(el.text(), "10");
    }

    #[test]
    fn test_dropping_handle_stops_frames() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::bind(
            el.clone(),
            CountUpOptions::to(10.0).duration(100.0),
            &observer,
            frames.clone(),
        );

        observer.check();
        drop(counter);
        frames.tick(50.0);
        assert_eq!(el.text_writes(), 0);
        assert!(!frames.has_pending());
    }

    #[test]
    fn test_custom_formatter() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::with_formatter(
            el.clone(),
            CountUpOptions::to(3.0).duration(10.0),
            |v: f64| format!("{} stars", v as i64),
        );
        counter.attach(&observer, frames.clone());

        observer.check();
        frames.tick(10.0);
        assert_eq!(el.text(), "3 stars");
    }

    #[test]
    fn test_visible_during_observe_runs_once() {
        let (_, frames, el) = setup(0.0);
        let visibility = AlwaysVisible::default();
        let counter = CountUp::new(el.clone(), CountUpOptions::to(10.0).duration(100.0));
        counter.attach(&visibility, frames.clone());

        assert!(counter.has_animated());
        assert!(!counter.is_watching());
        assert_eq!(visibility.cancelled.get(), 1);
        assert_eq!(frames.pending(), 1);

        frames.run_until_idle(16.0, 100);
        counter.attach(&visibility, frames.clone());
        assert!(counter.is_done());
        assert_eq!(visibility.observed.get(), 1);
        assert_eq!(el.text(), "10");
    }

    #[test]
    fn test_writes_through_host_text_target() {
        let frames = FrameLoop::new();
        let label = Rc::new(Label::default());
        let counter = CountUp::bind(
            label.clone(),
            CountUpOptions::to(4.0).duration(100.0).suffix("x"),
            &AlwaysVisible::default(),
            frames.clone(),
        );

        frames.tick(50.0);
        frames.tick(100.0);
        assert!(counter.is_done());
        assert_eq!(*label.texts.borrow(), vec!["2x", "4x", "4x"]);
    }

    #[test]
    fn test_end_below_binary_midpoint_lands_rounded_down() {
        let (observer, frames, el) = setup(0.0);
        let counter = CountUp::bind(
            el.clone(),
            CountUpOptions::to(0.35).decimals(1).duration(10.0),
            &observer,
            frames.clone(),
        );

        observer.check();
        frames.tick(20.0);
        assert!(counter.is_done());
        assert_eq!(el.text(), "0.3");
    }
}
