//! Easing curves for count-up animations.
//!
//! Easing curves control the rate of change during an animation, allowing
//! for natural-feeling motion rather than linear interpolation. Every curve
//! maps `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.
//!
//! ## Built-in Curves
//!
//! - [`Easing::Linear`] - Constant speed (no easing)
//! - [`Easing::EaseIn`] - Starts slow, ends fast (cubic acceleration)
//! - [`Easing::EaseOut`] - Starts fast, ends slow (cubic deceleration)
//! - [`Easing::EaseInOut`] - Slow start and end, fast middle
//!
//! ## Example
//!
//! ```
//! use countup::animation::Easing;
//!
//! let easing: Easing = "ease-in".parse().unwrap();
//! assert_eq!(easing.evaluate(0.5), 0.125);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Easing curve that shapes the progress of an animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Linear interpolation (constant speed)
    #[default]
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    /// Starts slow, speeds up, then slows down
    EaseInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Evaluate the curve at progress `t`.
    ///
    /// `t` is clamped to `[0, 1]` first, so the result is always in `[0, 1]`.
    pub fn evaluate(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseIn => ease_in(t),
            Easing::EaseOut => ease_out(t),
            Easing::EaseInOut => ease_in_out(t),
        }
    }

    /// Resolve a curve by its CSS-style name.
    ///
    /// Unknown names resolve to [`Easing::Linear`].
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "linear" => Easing::Linear,
            "ease-in" => Easing::EaseIn,
            "ease-out" => Easing::EaseOut,
            "ease-in-out" => Easing::EaseInOut,
            other => {
                log::debug!("unknown easing {:?}, using linear", other);
                Easing::Linear
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Easing::from_name(s))
    }
}

impl<'de> Deserialize<'de> for Easing {
    /// Any value that is not a known curve name decodes to linear.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(name) => Easing::from_name(&name),
            other => {
                log::debug!("non-string easing {}, using linear", other);
                Easing::Linear
            }
        })
    }
}

// Easing functions (cubic)

fn ease_in(t: f64) -> f64 {
    t * t * t
}

fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
