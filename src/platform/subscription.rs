use std::fmt;

/// Handle to an active subscription.
///
/// The subscription is disconnected when [`Subscription::cancel`] is called or
/// when the handle is dropped, whichever comes first.
#[must_use = "dropping a Subscription disconnects it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn cancel(mut self) {
        self.disconnect();
    }

    fn disconnect(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
