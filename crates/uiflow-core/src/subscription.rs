use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle to a live observer. Dropping it stops delivery.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    active: Arc<AtomicBool>,
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    pub(crate) fn new(active: Arc<AtomicBool>, teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            active,
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// Stops delivery. Runs at most once (safe to call multiple times).
    pub fn unsubscribe(&self) {
        self.active.store(false, Ordering::Release);
        if let Some(f) = self.teardown.lock().take() {
            f()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Keeps the observer registered for as long as the source lives.
    pub fn detach(self) {
        self.teardown.lock().take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.teardown.get_mut().is_some() {
            self.unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
