//! Caller-driven implementations of the platform collaborators.
//!
//! Nothing here runs on its own: the host moves the viewport and calls
//! [`ViewportObserver::check`] after layout or scrolling, and drives
//! [`FrameLoop::tick`] once per repaint.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{
    FrameCallback, FrameScheduler, IntersectionEntry, IntersectionHandler, Subscription,
    VisibilityService,
};
use crate::element::Element;
use crate::layout::{Insets, Rect};

type WatchId = u64;

struct Watch {
    id: WatchId,
    target: Weak<Element>,
    root_margin: Insets,
    /// Taken out while the handler runs so it can cancel its own watch.
    handler: Option<IntersectionHandler>,
    /// Intersecting state last reported, `None` before the first check.
    reported: Option<bool>,
}

#[derive(Default)]
struct ObserverState {
    viewport: Rect,
    watches: Vec<Watch>,
    next_id: WatchId,
}

impl ObserverState {
    fn watch_mut(&mut self, id: WatchId) -> Option<&mut Watch> {
        self.watches.iter_mut().find(|w| w.id == id)
    }

    fn remove(&mut self, id: WatchId) {
        self.watches.retain(|w| w.id != id);
    }
}

/// Intersection observer over a single viewport rectangle.
///
/// Each watch gets an entry on the first [`check`](Self::check) after it was
/// registered, then one entry per change of its intersecting state. Watches
/// whose element has been dropped are discarded.
#[derive(Clone, Default)]
pub struct ViewportObserver {
    inner: Rc<RefCell<ObserverState>>,
}

impl ViewportObserver {
    pub fn new(viewport: Rect) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObserverState {
                viewport,
                ..Default::default()
            })),
        }
    }

    /// Move the viewport, as a scroll of the document would.
    pub fn scroll_by(&self, dx: f32, dy: f32) {
        let mut state = self.inner.borrow_mut();
        state.viewport = state.viewport.offset(dx, dy);
    }

    /// Number of connected watches.
    pub fn watch_count(&self) -> usize {
        self.inner.borrow().watches.len()
    }

    /// Recompute intersections and deliver entries for changed watches.
    ///
    /// Returns the number of entries delivered.
    pub fn check(&self) -> usize {
        let pending: Vec<(WatchId, IntersectionEntry)> = {
            let mut state = self.inner.borrow_mut();
            let viewport = state.viewport;
            state.watches.retain(|w| w.target.strong_count() > 0);
            state
                .watches
                .iter_mut()
                .filter_map(|watch| {
                    let target = watch.target.upgrade()?;
                    let root = viewport.outset(watch.root_margin);
                    let is_intersecting = root.intersection(&target.bounds()).is_some();
                    if watch.reported == Some(is_intersecting) {
                        return None;
                    }
                    watch.reported = Some(is_intersecting);
                    Some((watch.id, IntersectionEntry { is_intersecting }))
                })
                .collect()
        };

        let mut delivered = 0;
        for (id, entry) in pending {
            // An earlier handler in this pass may have cancelled this watch
            let handler = self
                .inner
                .borrow_mut()
                .watch_mut(id)
                .and_then(|w| w.handler.take());
            let Some(mut handler) = handler else {
                continue;
            };

            handler(&entry);
            delivered += 1;

            if let Some(watch) = self.inner.borrow_mut().watch_mut(id) {
                watch.handler = Some(handler);
            }
        }
        delivered
    }
}

impl VisibilityService for ViewportObserver {
    fn observe(
        &self,
        target: &Rc<Element>,
        root_margin: Insets,
        handler: IntersectionHandler,
    ) -> Subscription {
        let id = {
            let mut state = self.inner.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.watches.push(Watch {
                id,
                target: Rc::downgrade(target),
                root_margin,
                handler: Some(handler),
                reported: None,
            });
            id
        };
        log::trace!("observing element {:?} (watch {})", target.id(), id);

        let state = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().remove(id);
            }
        })
    }
}

#[derive(Default)]
struct FrameQueue {
    now: f64,
    pending: Vec<FrameCallback>,
    frames: u64,
}

/// Manually ticked frame scheduler.
///
/// Callbacks requested during a tick are queued for the next tick, so a
/// callback that re-requests itself runs once per frame.
#[derive(Clone, Default)]
pub struct FrameLoop {
    inner: Rc<RefCell<FrameQueue>>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `now` milliseconds.
    pub fn starting_at(now: f64) -> Self {
        let frames = Self::new();
        frames.inner.borrow_mut().now = now;
        frames
    }

    /// Number of callbacks waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending() > 0
    }

    /// Number of ticks run so far.
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frames
    }

    /// Run one frame at `timestamp`, returning the number of callbacks run.
    pub fn tick(&self, timestamp: f64) -> usize {
        let callbacks = {
            let mut queue = self.inner.borrow_mut();
            queue.now = timestamp;
            queue.frames += 1;
            std::mem::take(&mut queue.pending)
        };

        let count = callbacks.len();
        for callback in callbacks {
            callback(timestamp);
        }
        count
    }

    /// Run one frame `delta_ms` after the current time.
    pub fn tick_by(&self, delta_ms: f64) -> usize {
        let now = self.now();
        self.tick(now + delta_ms)
    }

    /// Tick every `interval_ms` until nothing is pending or `max_frames`
    /// frames have run. Returns the number of frames run.
    pub fn run_until_idle(&self, interval_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.has_pending() && frames < max_frames {
            self.tick_by(interval_ms);
            frames += 1;
        }
        frames
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&self, callback: FrameCallback) {
        self.inner.borrow_mut().pending.push(callback);
    }

    fn now(&self) -> f64 {
        self.inner.borrow().now
    }
}
