//! Dispatch-time fan-out to matching subscriptions.

use crate::registry::{SharedRegistry, SubscriptionId, lock};
use ripple_core::{Action, BoxError, Host, ModelOps, StateView, Unsubscribe};
use std::sync::Arc;

/// Outcome of one notification round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Number of handlers invoked.
    pub notified: usize,
}

impl Delivery {
    /// Whether any handler ran.
    pub const fn is_empty(&self) -> bool {
        self.notified == 0
    }
}

/// Build an unsubscribe handle for the entry with `id`.
///
/// The handle holds a weak reference: once the router is dropped it does
/// nothing.
pub fn unsubscribe_by_id<H: Host>(registry: &SharedRegistry<H>, id: SubscriptionId) -> Unsubscribe {
    let registry = Arc::downgrade(registry);
    Unsubscribe::new(move || {
        if let Some(registry) = registry.upgrade() {
            let removed = lock(&registry).remove(id);
            #[cfg(feature = "tracing")]
            {
                if let Some(entry) = removed {
                    tracing::debug!(
                        model = entry.model(),
                        pattern = entry.pattern().as_str(),
                        "subscription removed by its handler"
                    );
                }
            }
            #[cfg(not(feature = "tracing"))]
            let _ = removed;
        }
    })
}

/// Invokes the handlers whose pattern matches a dispatched action.
pub struct Notifier<H: Host> {
    registry: SharedRegistry<H>,
}

impl<H: Host> Clone for Notifier<H> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<H: Host> Notifier<H> {
    /// Create a notifier over `registry`.
    pub fn new(registry: SharedRegistry<H>) -> Self {
        Self { registry }
    }

    /// Run one notification round for `action`.
    ///
    /// The matching set is fixed before the first handler runs. Handlers
    /// removed during the round still run in it; handlers added during the
    /// round do not. The first handler error stops the round and is
    /// returned unchanged.
    pub fn notify(&self, action: &Action<H::Payload>, host: &H) -> Result<Delivery, BoxError> {
        // the lock is released before any handler runs
        let matched = lock(&self.registry).find_matching(action.name());

        #[cfg(feature = "tracing")]
        tracing::trace!(
            action = action.name(),
            matched = matched.len(),
            "notifying subscribers"
        );

        let state = StateView::new(host);
        for subscription in &matched {
            let unsubscribe = unsubscribe_by_id(&self.registry, subscription.id());
            let ops = ModelOps::new(host, subscription.model());

            let result = subscription
                .handler()
                .on_action(action, &state, &unsubscribe, &ops);

            if let Err(err) = result {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    model = subscription.model(),
                    pattern = subscription.pattern().as_str(),
                    action = action.name(),
                    error = %err,
                    "subscription handler failed"
                );
                return Err(err);
            }
        }

        Ok(Delivery {
            notified: matched.len(),
        })
    }
}
