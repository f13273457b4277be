//! Host collaborators a count-up binding depends on.
//!
//! A UI runtime plugs into the animation through three small traits:
//!
//! - [`VisibilityService`] reports when an element enters or leaves the view
//! - [`FrameScheduler`] runs one-shot callbacks before the next repaint
//! - [`TextTarget`] receives the rendered text
//!
//! A binding is generic over the host's node type: the node receives the
//! text and is what the visibility service watches. [`headless`] provides
//! in-process implementations over [`Element`](crate::element::Element),
//! driven by the caller, used by tests and by hosts without a native
//! observer.

pub mod headless;
mod subscription;

pub use headless::{FrameLoop, ViewportObserver};
pub use subscription::Subscription;

use std::rc::Rc;

use crate::element::Element;
use crate::layout::Insets;

/// One visibility change delivered to an observer handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    /// True when the target overlaps the root (edges inclusive)
    pub is_intersecting: bool,
}

/// Handler invoked for every entry of a visibility watch.
pub type IntersectionHandler = Box<dyn FnMut(&IntersectionEntry)>;

/// One-shot frame callback, receiving the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Watches nodes of type `T` for visibility changes.
pub trait VisibilityService<T: ?Sized = Element> {
    /// Start watching `target`.
    ///
    /// The handler receives an entry whenever the target's intersecting state
    /// changes. Cancelling or dropping the returned subscription disconnects
    /// the watch; no entry is delivered afterwards.
    fn observe(
        &self,
        target: &Rc<T>,
        root_margin: Insets,
        handler: IntersectionHandler,
    ) -> Subscription;
}

pub trait FrameScheduler {
    /// Run `callback` once, before the next repaint.
    fn request_frame(&self, callback: FrameCallback);

    /// Current high-resolution time in milliseconds, on the same clock as
    /// the frame timestamps.
    fn now(&self) -> f64;
}

/// Anything with a settable displayed text.
pub trait TextTarget {
    /// Replace the whole displayed text.
    fn set_text(&self, text: &str);
}
