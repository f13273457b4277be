use std::rc::Rc;

use super::{CountUp, CountUpOptions, FixedDecimals, IntegerFloor, OptionsError};
use crate::platform::{FrameScheduler, TextTarget, VisibilityService};
use crate::reactive::on_cleanup;

/// How a directive renders the animated value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rendering {
    /// `decimals`, `prefix` and `suffix` from the options
    #[default]
    Formatted,
    /// Floor to a bare integer; formatting options are ignored
    IntegerFloor,
}

/// The `countup` directive a host registers on its elements.
///
/// Binding inside an owner scope (see [`with_owner`](crate::reactive::with_owner))
/// hands the binding to that scope: it stays alive until the scope is
/// disposed, and disposal releases a visibility watch that never fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountUpDirective {
    rendering: Rendering,
}

impl CountUpDirective {
    pub const NAME: &'static str = "countup";

    /// Directive rendering fixed decimals with prefix and suffix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directive rendering floored integers.
    pub fn integer() -> Self {
        Self {
            rendering: Rendering::IntegerFloor,
        }
    }

    pub fn rendering(&self) -> Rendering {
        self.rendering
    }

    /// Bind the directive to `element` with options decoded from a JSON
    /// object `expression`, and arm it.
    pub fn bind<T, V, F>(
        &self,
        element: &Rc<T>,
        expression: &str,
        visibility: &V,
        frames: F,
    ) -> Result<CountUp<T>, OptionsError>
    where
        T: TextTarget + ?Sized + 'static,
        V: VisibilityService<T> + ?Sized,
        F: FrameScheduler + 'static,
    {
        let options = CountUpOptions::from_json(expression)?;
        Ok(self.bind_options(element, options, visibility, frames))
    }

    /// Bind already-decoded options to `element`, and arm it.
    pub fn bind_options<T, V, F>(
        &self,
        element: &Rc<T>,
        options: CountUpOptions,
        visibility: &V,
        frames: F,
    ) -> CountUp<T>
    where
        T: TextTarget + ?Sized + 'static,
        V: VisibilityService<T> + ?Sized,
        F: FrameScheduler + 'static,
    {
        let counter = match self.rendering {
            Rendering::Formatted => {
                let formatter = FixedDecimals::from(&options);
                CountUp::with_formatter(element.clone(), options, formatter)
            }
            Rendering::IntegerFloor => {
                CountUp::with_formatter(element.clone(), options, IntegerFloor)
            }
        };
        counter.attach(visibility, frames);

        let owned = counter.clone();
        if !on_cleanup(move || owned.dispose()) {
            log::trace!(
                "{} bound to element {:p} outside an owner scope",
                Self::NAME,
                element
            );
        }
        counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countup::RunState;
    use crate::element::Element;
    use crate::layout::Rect;
    use crate::platform::{FrameLoop, ViewportObserver};
    use crate::reactive::{dispose_owner, with_owner};

    #[test]
    fn test_bind_parses_expression() {
        let observer = ViewportObserver::new(Rect::from_size(800.0, 600.0));
        let frames = FrameLoop::new();
        let el = Element::new(Rect::new(0.0, 0.0, 100.0, 20.0));

        let counter = CountUpDirective::new()
            .bind(
                &el,
                r#"{"end": 12.5, "decimals": 1, "suffix": "%", "duration": 100}"#,
                &observer,
                frames.clone(),
            )
            .unwrap();
        assert_eq!(counter.state(), RunState::Armed);

        observer.check();
        frames.run_until_idle(16.0, 50);
        assert_eq!(el.text(), "12.5%");
    }

    #[test]
    fn test_bind_rejects_bad_expression() {
        let observer = ViewportObserver::new(Rect::from_size(800.0, 600.0));
        let el = Element::new(Rect::default());
        let result = CountUpDirective::new().bind(&el, "not json", &observer, FrameLoop::new());
        assert!(result.is_err());
        assert_eq!(observer.watch_count(), 0);
    }

    #[test]
    fn test_integer_rendering_ignores_affixes() {
        let observer = ViewportObserver::new(Rect::from_size(800.0, 600.0));
        let frames = FrameLoop::new();
        let el = Element::new(Rect::default());

        let directive = CountUpDirective::integer();
        assert_eq!(directive.rendering(), Rendering::IntegerFloor);
        let _counter = directive
            .bind(
                &el,
                r#"{"end": 7.9, "prefix": "$", "duration": 10}"#,
                &observer,
                frames.clone(),
            )
            .unwrap();

        observer.check();
        frames.tick(5.0);
        assert_eq!(el.text(), "3");
    }

    #[test]
    fn test_owner_keeps_binding_alive_and_disposes_it() {
        let observer = ViewportObserver::new(Rect::from_size(800.0, 600.0));
        let frames = FrameLoop::new();
        let el = Element::new(Rect::new(0.0, 2000.0, 100.0, 20.0));

        let (_, owner) = with_owner(|| {
            // The returned handle is dropped right away; the owner holds it
            let _ = CountUpDirective::new().bind(&el, r#"{"end": 5}"#, &observer, frames.clone());
        });
        assert_eq!(observer.watch_count(), 1);

        dispose_owner(owner);
        assert_eq!(observer.watch_count(), 0);

        observer.scroll_by(0.0, 2000.0);
        observer.check();
        frames.tick(10_000.0);
        assert_eq!(el.text_writes(), 0);
    }

    #[test]
    fn test_owned_binding_runs_without_handle() {
        let observer = ViewportObserver::new(Rect::from_size(800.0, 600.0));
        let frames = FrameLoop::new();
        let el = Element::new(Rect::default());

        let (_, _owner) = with_owner(|| {
            let _ = CountUpDirective::new().bind(
                &el,
                r#"{"end": 40, "duration": 100}"#,
                &observer,
                frames.clone(),
            );
        });

        observer.check();
        frames.run_until_idle(16.0, 50);
        assert_eq!(el.text(), "40");
    }
}
