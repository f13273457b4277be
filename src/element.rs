//! A minimal text-bearing element.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::layout::Rect;
use crate::platform::TextTarget;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An element with layout bounds and displayed text.
///
/// Bounds use the same coordinate space as the viewport of the
/// [`ViewportObserver`](crate::platform::ViewportObserver) watching it.
#[derive(Debug)]
pub struct Element {
    id: ElementId,
    bounds: Cell<Rect>,
    text: RefCell<String>,
    text_writes: Cell<usize>,
}

impl Element {
    pub fn new(bounds: Rect) -> Rc<Self> {
        Self::with_text(bounds, "")
    }

    pub fn with_text(bounds: Rect, text: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: ElementId::next(),
            bounds: Cell::new(bounds),
            text: RefCell::new(text.into()),
            text_writes: Cell::new(0),
        })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Number of times the text has been written since creation.
    pub fn text_writes(&self) -> usize {
        self.text_writes.get()
    }
}

impl TextTarget for Element {
    fn set_text(&self, text: &str) {
        let mut current = self.text.borrow_mut();
        current.clear();
        current.push_str(text);
        self.text_writes.set(self.text_writes.get() + 1);
    }
}
