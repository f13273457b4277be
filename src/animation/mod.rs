mod timing;

pub use timing::Easing;

/// A single timed interpolation between two numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    /// Value at progress 0
    pub from: f64,
    /// Value at progress 1
    pub to: f64,
    /// Duration of the animation in milliseconds
    pub duration_ms: f64,
    /// Easing curve applied to the raw progress
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    /// Set the easing curve
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear time progress after `elapsed_ms`, clamped to `[0, 1]`.
    ///
    /// A zero or negative duration completes immediately; an infinite one
    /// never leaves the start.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        let raw = elapsed_ms / self.duration_ms;
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 1.0)
        }
    }

    /// Interpolated value at linear progress `progress`.
    pub fn value_at(&self, progress: f64) -> f64 {
        let eased = self.easing.evaluate(progress);
        self.from + (self.to - self.from) * eased
    }
}
