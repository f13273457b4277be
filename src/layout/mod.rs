//! Geometry used by visibility detection.
//!
//! Coordinates are logical pixels with the origin at the top-left corner of
//! the viewport and `y` growing downwards.

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin with the given size.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Grow each edge outwards by the matching inset. Negative insets shrink
    /// the rectangle; the size never drops below zero.
    pub fn outset(&self, insets: Insets) -> Self {
        let x = self.x - insets.left;
        let y = self.y - insets.top;
        Self {
            x,
            y,
            width: (self.right() + insets.right - x).max(0.0),
            height: (self.bottom() + insets.bottom - y).max(0.0),
        }
    }

    /// The overlapping region of two rectangles.
    ///
    /// Edges are inclusive: rectangles that only share an edge produce a
    /// zero-area intersection rather than `None`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left <= right && top <= bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

/// Per-edge distances, used as the root margin of a visibility watch.
///
/// Positive values extend the root outwards, negative values pull that edge
/// inwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Margin that requires an element to travel `tolerance` pixels past the
    /// bottom edge of the viewport before it counts as visible.
    pub fn bottom_tolerance(tolerance: f32) -> Self {
        Self {
            bottom: -tolerance.max(0.0),
            ..Self::ZERO
        }
    }
}
