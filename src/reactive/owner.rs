//! Owner scopes for automatic teardown of bindings.
//!
//! A host creates an owner scope per mounted view (or per element) and
//! binds count-up animations inside it. Bindings register their disposal with
//! the current owner through [`on_cleanup`]; disposing the owner when the
//! element leaves the document releases every visibility watch still
//! pending.
//!
//! # Example
//!
//! ```
//! use countup::reactive::{dispose_owner, on_cleanup, with_owner};
//!
//! let ((), owner) = with_owner(|| {
//!     on_cleanup(|| println!("element removed"));
//! });
//! dispose_owner(owner);
//! ```

use std::cell::RefCell;

/// Unique identifier for an owner in the owner arena.
pub type OwnerId = usize;

struct Owner {
    cleanups: Vec<Box<dyn FnOnce()>>,
    children: Vec<OwnerId>,
}

/// Arena-based storage for owners.
#[derive(Default)]
struct OwnerArena {
    owners: Vec<Option<Owner>>,
}

impl OwnerArena {
    fn allocate(&mut self) -> OwnerId {
        let id = self.owners.len();
        self.owners.push(Some(Owner {
            cleanups: Vec::new(),
            children: Vec::new(),
        }));
        id
    }

    fn get_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.owners.get_mut(id).and_then(|o| o.as_mut())
    }

    fn take(&mut self, id: OwnerId) -> Option<Owner> {
        self.owners.get_mut(id).and_then(|o| o.take())
    }
}

thread_local! {
    static CURRENT_OWNER: RefCell<Option<OwnerId>> = const { RefCell::new(None) };
    static OWNERS: RefCell<OwnerArena> = RefCell::new(OwnerArena::default());
}

/// Execute a closure within a new owner scope.
///
/// The new owner becomes a child of the current one, if any. Returns the
/// closure's result and the new owner's id.
pub fn with_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    let parent = current_owner();

    let owner_id = OWNERS.with(|owners| {
        let mut owners = owners.borrow_mut();
        let id = owners.allocate();
        if let Some(parent_id) = parent {
            if let Some(parent_owner) = owners.get_mut(parent_id) {
                parent_owner.children.push(id);
            }
        }
        id
    });

    let prev_owner = CURRENT_OWNER.with(|current| current.replace(Some(owner_id)));
    let result = f();
    CURRENT_OWNER.with(|current| *current.borrow_mut() = prev_owner);

    (result, owner_id)
}

/// Get the current owner ID, if any.
pub fn current_owner() -> Option<OwnerId> {
    CURRENT_OWNER.with(|current| *current.borrow())
}

/// Dispose an owner: child owners first, then its own cleanups in reverse
/// registration order. Disposing twice is a no-op.
pub fn dispose_owner(id: OwnerId) {
    let Some(owner) = OWNERS.with(|owners| owners.borrow_mut().take(id)) else {
        return;
    };

    for child_id in owner.children {
        dispose_owner(child_id);
    }

    for cleanup in owner.cleanups.into_iter().rev() {
        cleanup();
    }
}

/// Register a cleanup callback to run when the current owner is disposed.
///
/// Outside any owner scope this does nothing and returns `false`.
pub fn on_cleanup(f: impl FnOnce() + 'static) -> bool {
    let Some(owner_id) = current_owner() else {
        return false;
    };
    OWNERS.with(|owners| {
        let mut owners = owners.borrow_mut();
        if let Some(owner) = owners.get_mut(owner_id) {
            owner.cleanups.push(Box::new(f));
            true
        } else {
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_with_owner_basic() {
        let (value, _owner_id) = with_owner(|| 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_current_owner_outside_scope() {
        assert!(current_owner().is_none());
        assert!(!on_cleanup(|| {}));
    }

    #[test]
    fn test_nested_owners_dispose_children_first() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let outer_order = order.clone();
        let (_, outer_id) = with_owner(|| {
            let o = outer_order.clone();
            on_cleanup(move || o.borrow_mut().push("outer"));

            let o = outer_order.clone();
            with_owner(|| {
                on_cleanup(move || o.borrow_mut().push("inner"));
            });
        });

        dispose_owner(outer_id);
        assert_eq!(*order.borrow(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_on_cleanup_reverse_order() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        let (_, owner_id) = with_owner(|| {
            for name in ["first", "second", "third"] {
                let o = o.clone();
                on_cleanup(move || o.borrow_mut().push(name));
            }
        });

        dispose_owner(owner_id);
        assert_eq!(*order.borrow(), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_dispose_owner_twice_is_safe() {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let (_, owner_id) = with_owner(|| {
            on_cleanup(move || *c.borrow_mut() += 1);
        });

        dispose_owner(owner_id);
        dispose_owner(owner_id);
        assert_eq!(*count.borrow(), 1);
    }
}
