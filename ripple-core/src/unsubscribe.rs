//! Single-use unsubscribe handles.

use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

type Remover = Box<dyn FnOnce() + Send + 'static>;

/// A handle that removes one subscription when called.
///
/// The removal runs at most once; later calls do nothing. A handle whose
/// target no longer exists is also a no-op.
pub struct Unsubscribe {
    remover: Mutex<Option<Remover>>,
}

impl Unsubscribe {
    /// Create a handle that runs `remove` on first call.
    pub fn new<F>(remove: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            remover: Mutex::new(Some(Box::new(remove))),
        }
    }

    /// A handle that never removes anything.
    pub fn noop() -> Self {
        Self {
            remover: Mutex::new(None),
        }
    }

    /// Remove the subscription this handle is bound to.
    pub fn call(&self) {
        let remover = self
            .remover
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        // run outside the lock: removal may re-enter the registry
        if let Some(remove) = remover {
            remove();
        }
    }

    /// Whether the handle has already been used (or was a no-op from the start).
    pub fn is_spent(&self) -> bool {
        self.remover
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("spent", &self.is_spent())
            .finish()
    }
}
