//! Live table of active subscriptions.
//!
//! Entries are kept in a flat vector so notification order is registration
//! order. Lookups return owned snapshots (`Vec<Arc<Subscription<H>>>`), so
//! a notification round is unaffected by removals that happen while its
//! handlers run.

use ripple_core::{ActionPattern, Host, SharedHandler};
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A registry shared between a router and the unsubscribe handles it hands out.
pub type SharedRegistry<H> = Arc<Mutex<SubscriptionRegistry<H>>>;

/// Lock a mutex, recovering the guard if a handler panicked while it was held.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Identity of one installed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// One installed subscription. Never mutated after creation.
pub struct Subscription<H: Host> {
    id: SubscriptionId,
    model: String,
    pattern: ActionPattern,
    handler: SharedHandler<H>,
}

impl<H: Host> Subscription<H> {
    /// Create a subscription entry.
    pub fn new(
        id: SubscriptionId,
        model: impl Into<String>,
        pattern: ActionPattern,
        handler: SharedHandler<H>,
    ) -> Self {
        Self {
            id,
            model: model.into(),
            pattern,
            handler,
        }
    }

    /// The subscription's identity.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The model that declared it.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &ActionPattern {
        &self.pattern
    }

    /// The handler to invoke.
    pub fn handler(&self) -> &SharedHandler<H> {
        &self.handler
    }

    /// Whether this entry is keyed by `(model, pattern)`.
    pub fn is_keyed(&self, model: &str, pattern: &str) -> bool {
        self.model == model && self.pattern.as_str() == pattern
    }
}

impl<H: Host> fmt::Debug for Subscription<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// The ordered collection of active subscriptions.
pub struct SubscriptionRegistry<H: Host> {
    entries: Vec<Arc<Subscription<H>>>,
}

impl<H: Host> Default for SubscriptionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> SubscriptionRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wrap a new registry for sharing.
    pub fn shared() -> SharedRegistry<H> {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Append a subscription. Later entries are notified after earlier ones.
    pub fn add(&mut self, subscription: Subscription<H>) -> Arc<Subscription<H>> {
        let entry = Arc::new(subscription);
        self.entries.push(Arc::clone(&entry));
        entry
    }

    /// Remove the entry with `id`. Removing an absent entry is a no-op.
    pub fn remove(&mut self, id: SubscriptionId) -> Option<Arc<Subscription<H>>> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Remove the entry keyed by `(model, pattern)`, if any.
    pub fn remove_keyed(&mut self, model: &str, pattern: &str) -> Option<Arc<Subscription<H>>> {
        let index = self
            .entries
            .iter()
            .position(|e| e.is_keyed(model, pattern))?;
        Some(self.entries.remove(index))
    }

    /// Remove every entry owned by `model`. Returns how many were removed.
    pub fn remove_model(&mut self, model: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.model != model);
        before - self.entries.len()
    }

    /// Snapshot of the entries matching `action_name`, in registration order.
    pub fn find_matching(&self, action_name: &str) -> Vec<Arc<Subscription<H>>> {
        self.entries
            .iter()
            .filter(|e| e.pattern.matches(action_name))
            .cloned()
            .collect()
    }

    /// Whether an entry keyed by `(model, pattern)` exists.
    pub fn contains_keyed(&self, model: &str, pattern: &str) -> bool {
        self.entries.iter().any(|e| e.is_keyed(model, pattern))
    }

    /// Iterate over the entries owned by `model`, in registration order.
    pub fn for_model<'a>(
        &'a self,
        model: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Subscription<H>>> + 'a {
        self.entries.iter().filter(move |e| e.model == model)
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no subscription is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::{BoxError, SubscriptionDecl};

    struct NullHost;

    impl Host for NullHost {
        type Payload = ();
        type State = ();

        fn state(&self) -> Self::State {}

        fn invoke(&self, _model: &str, _handler: &str, _payload: ()) -> Result<(), BoxError> {
            Ok(())
        }
    }

    fn entry(id: u64, model: &str, pattern: &str) -> Subscription<NullHost> {
        let decl = SubscriptionDecl::<NullHost>::new(pattern, |_, _, _, _| Ok(()));
        let handler = match decl.into_parts().1 {
            ripple_core::DeclaredValue::Handler(handler) => handler,
            ripple_core::DeclaredValue::NotCallable { .. } => unreachable!(),
        };
        Subscription::new(
            SubscriptionId::new(id),
            model,
            ActionPattern::parse(pattern).unwrap(),
            handler,
        )
    }

    fn ids(entries: &[Arc<Subscription<NullHost>>]) -> Vec<u64> {
        entries.iter().map(|e| e.id().get()).collect()
    }

    #[test]
    fn test_find_matching_keeps_registration_order() {
        let mut registry = SubscriptionRegistry::new();
        registry.add(entry(1, "c", "b/addOne"));
        registry.add(entry(2, "a", "b/*"));
        registry.add(entry(3, "d", "x/addOne"));
        registry.add(entry(4, "e", "*/add*"));

        assert_eq!(ids(&registry.find_matching("b/addOne")), vec![1, 2, 4]);
        assert_eq!(ids(&registry.find_matching("x/reset")), Vec::<u64>::new());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = SubscriptionRegistry::new();
        registry.add(entry(1, "a", "b/*"));

        assert!(registry.remove(SubscriptionId::new(1)).is_some());
        assert!(registry.remove(SubscriptionId::new(1)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_keyed_only_touches_owner() {
        let mut registry = SubscriptionRegistry::new();
        registry.add(entry(1, "first", "second/*"));
        registry.add(entry(2, "third", "second/*"));

        assert!(registry.remove_keyed("first", "second/*").is_some());
        assert!(registry.remove_keyed("first", "second/*").is_none());
        assert!(!registry.contains_keyed("first", "second/*"));
        assert!(registry.contains_keyed("third", "second/*"));
    }

    #[test]
    fn test_snapshot_survives_removal() {
        let mut registry = SubscriptionRegistry::new();
        registry.add(entry(1, "a", "b/*"));
        registry.add(entry(2, "c", "b/*"));

        let snapshot = registry.find_matching("b/x");
        registry.remove(SubscriptionId::new(2));

        assert_eq!(ids(&snapshot), vec![1, 2]);
        assert_eq!(ids(&registry.find_matching("b/x")), vec![1]);
    }

    #[test]
    fn test_remove_model() {
        let mut registry = SubscriptionRegistry::new();
        registry.add(entry(1, "a", "b/*"));
        registry.add(entry(2, "a", "c/*"));
        registry.add(entry(3, "d", "b/*"));

        assert_eq!(registry.remove_model("a"), 2);
        assert_eq!(registry.for_model("a").count(), 0);
        assert_eq!(registry.len(), 1);
    }
}
