//! Count-up number animations triggered by element visibility.
//!
//! Bind a [`CountUp`](countup::CountUp) to an element and it will count from
//! a start value to an end value the first time the element scrolls into
//! view, rewriting the element's text on every frame and landing exactly on
//! the end value.
//!
//! The host UI runtime supplies visibility detection and frame scheduling
//! through the traits in [`platform`]; [`platform::headless`] implements both
//! for hosts that drive them by hand.

pub mod animation;
pub mod countup;
pub mod element;
pub mod layout;
pub mod platform;
pub mod reactive;

pub mod prelude {
    pub use crate::animation::{Easing, Tween};
    pub use crate::countup::{
        CountUp, CountUpDirective, CountUpOptions, FixedDecimals, IntegerFloor, Rendering,
        RunState, ValueFormatter,
    };
    pub use crate::element::{Element, ElementId};
    pub use crate::layout::{Insets, Rect};
    pub use crate::platform::{
        FrameLoop, FrameScheduler, Subscription, TextTarget, ViewportObserver, VisibilityService,
    };
    pub use crate::reactive::{dispose_owner, on_cleanup, with_owner};
}
