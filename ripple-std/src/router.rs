//! # Subscription Router
//!
//! The entry point a host wires into its model-registration and dispatch
//! paths. One router serves one store; several routers can coexist in a
//! process without sharing anything.
//!
//! # Host Integration
//!
//! ```rust,ignore
//! // when a model is defined
//! router.on_model_init(
//!     ModelDeclaration::new("first")
//!         .handler("addOne")
//!         .subscribe("second/addOne", |_, _, _, ops| ops.dispatch("addOne", 1)),
//! )?;
//!
//! // after the host has run its own reducers for an action
//! router.notify_action(&Action::new("second/addOne", 1), &store)?;
//! ```
//!
//! Handlers run synchronously on the dispatching thread. A handler that
//! dispatches through its `ModelOps` re-enters the host, which in turn may
//! call [`SubscriptionRouter::notify_action`] again; those nested rounds use
//! the same snapshot discipline as the outer one. Cycles between
//! subscriptions are not detected.

use crate::{
    config::{RouterBuilder, RouterConfig},
    names::NameRegistry,
    notify::{Delivery, Notifier, unsubscribe_by_id},
    registry::{SharedRegistry, Subscription, SubscriptionId, SubscriptionRegistry, lock},
    validate::Validator,
};
use ripple_core::{
    Action, ActionPattern, BoxError, Host, ModelDeclaration, PatternError, RegistrationError,
    SubscriptionDecl, Unsubscribe,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

/// Routes dispatched actions to cross-model subscriptions.
pub struct SubscriptionRouter<H: Host> {
    validator: Validator,
    names: Mutex<NameRegistry>,
    registry: SharedRegistry<H>,
    notifier: Notifier<H>,
    next_id: AtomicU64,
}

impl<H: Host> Default for SubscriptionRouter<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> SubscriptionRouter<H> {
    /// Create a router with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Start a [`RouterBuilder`].
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Create a router with `config`.
    pub fn with_config(config: RouterConfig) -> Self {
        let registry = SubscriptionRegistry::shared();
        Self {
            validator: Validator::new(config),
            names: Mutex::new(NameRegistry::new()),
            notifier: Notifier::new(Arc::clone(&registry)),
            registry,
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a model: record its handler names and install its subscriptions.
    ///
    /// Nothing is recorded if any declaration is rejected.
    pub fn on_model_init(
        &self,
        model: ModelDeclaration<H>,
    ) -> Result<Vec<SubscriptionId>, RegistrationError> {
        let (name, handlers, subscriptions) = model.into_parts();
        let handlers: Vec<&str> = handlers.iter().map(String::as_str).collect();
        self.install(&name, Some(handlers.as_slice()), subscriptions)
    }

    /// Record the regular handler names of `model`.
    ///
    /// Hosts that register models in two steps call this before
    /// [`install_subscriptions`](Self::install_subscriptions).
    pub fn record_handler_names<I, S>(&self, model: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.names).record(model, names);
    }

    /// Whether `model` declared a regular handler called `name`.
    pub fn has_handler(&self, model: &str, name: &str) -> bool {
        lock(&self.names).has_handler(model, name)
    }

    /// Validate and install `model`'s subscriptions against its recorded
    /// handler names.
    ///
    /// Either every declaration is installed or none is.
    pub fn install_subscriptions(
        &self,
        model: &str,
        declarations: Vec<SubscriptionDecl<H>>,
    ) -> Result<Vec<SubscriptionId>, RegistrationError> {
        self.install(model, None, declarations)
    }

    fn install(
        &self,
        model: &str,
        handlers: Option<&[&str]>,
        declarations: Vec<SubscriptionDecl<H>>,
    ) -> Result<Vec<SubscriptionId>, RegistrationError> {
        // lock order: names, then registry
        let mut names = lock(&self.names);
        let mut registry = lock(&self.registry);

        let own_handlers: Vec<&str> = match handlers {
            Some(handlers) => handlers.to_vec(),
            None => names.handlers(model).collect(),
        };

        let valid = match self
            .validator
            .validate(model, &own_handlers, declarations, &names, &registry)
        {
            Ok(valid) => valid,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(model, error = %err, "rejected subscription declarations");
                return Err(err);
            }
        };

        if let Some(handlers) = handlers {
            names.record(model, handlers.iter().copied());
        }

        let ids: Vec<SubscriptionId> = valid
            .into_iter()
            .map(|valid| {
                let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
                registry.add(Subscription::new(id, model, valid.pattern, valid.handler));
                id
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(model, installed = ids.len(), "installed subscriptions");

        Ok(ids)
    }

    /// Notify every subscription matching `action`.
    ///
    /// Call once per dispatched action, after the host's own reducers and
    /// effects for it have run. Handler errors propagate unchanged and stop
    /// the round.
    pub fn notify_action(&self, action: &Action<H::Payload>, host: &H) -> Result<Delivery, BoxError> {
        self.notifier.notify(action, host)
    }

    /// Create a handle that removes `model`'s subscription to `pattern`.
    ///
    /// The pattern is compiled here, so a malformed pattern fails now rather
    /// than when the handle is called. Calling the handle when no such
    /// subscription exists does nothing.
    pub fn create_unsubscribe(&self, model: &str, pattern: &str) -> Result<Unsubscribe, PatternError> {
        let pattern = ActionPattern::parse(pattern)?;
        let model = model.to_string();
        let registry = Arc::downgrade(&self.registry);

        Ok(Unsubscribe::new(move || {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            let removed = lock(&registry).remove_keyed(&model, pattern.as_str());
            #[cfg(feature = "tracing")]
            tracing::debug!(
                model = model.as_str(),
                pattern = pattern.as_str(),
                removed = removed.is_some(),
                "unsubscribe"
            );
            #[cfg(not(feature = "tracing"))]
            let _ = removed;
        }))
    }

    /// Create a handle bound to one subscription's identity.
    pub fn unsubscribe_handle(&self, id: SubscriptionId) -> Unsubscribe {
        unsubscribe_by_id(&self.registry, id)
    }

    /// Tear down `model`: drop its subscriptions and its handler-name record.
    ///
    /// Returns how many subscriptions were removed.
    pub fn remove_model(&self, model: &str) -> usize {
        let mut names = lock(&self.names);
        let mut registry = lock(&self.registry);

        names.remove(model);
        let removed = registry.remove_model(model);

        #[cfg(feature = "tracing")]
        tracing::debug!(model, removed, "removed model");

        removed
    }

    /// The patterns `model` is subscribed to, in registration order.
    pub fn subscriptions(&self, model: &str) -> Vec<String> {
        lock(&self.registry)
            .for_model(model)
            .map(|s| s.pattern().as_str().to_string())
            .collect()
    }

    /// Number of active subscriptions across all models.
    pub fn len(&self) -> usize {
        lock(&self.registry).len()
    }

    /// Whether no subscription is active.
    pub fn is_empty(&self) -> bool {
        lock(&self.registry).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Probe {
        calls: AtomicUsize,
    }

    impl Host for Probe {
        type Payload = ();
        type State = usize;

        fn state(&self) -> Self::State {
            self.calls.load(Ordering::SeqCst)
        }

        fn invoke(&self, _model: &str, _handler: &str, _payload: ()) -> Result<(), BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn bump(decl: ModelDeclaration<Probe>, pattern: &str) -> ModelDeclaration<Probe> {
        decl.subscribe(pattern, |_, _, _, ops| ops.dispatch("bump", ()))
    }

    #[test]
    fn test_install_and_notify() {
        let router = SubscriptionRouter::<Probe>::new();
        let ids = router
            .on_model_init(bump(ModelDeclaration::new("a").handler("bump"), "b/addOne"))
            .unwrap();
        assert_eq!(ids.len(), 1);
        assert!(router.has_handler("a", "bump"));

        let probe = Probe::default();
        let delivery = router
            .notify_action(&Action::new("b/addOne", ()), &probe)
            .unwrap();
        assert_eq!(delivery.notified, 1);
        assert_eq!(probe.state(), 1);
    }

    #[test]
    fn test_rejected_set_installs_nothing() {
        let router = SubscriptionRouter::<Probe>::new();
        let decl = bump(
            bump(ModelDeclaration::new("first").handler("addOne"), "second/*"),
            "first/addOne",
        );

        let err = router.on_model_init(decl).unwrap_err();
        assert!(matches!(err, RegistrationError::SubscriptionCollision { .. }));
        assert!(router.is_empty());
        assert!(!router.has_handler("first", "addOne"));
    }

    #[test]
    fn test_two_step_registration() {
        let router = SubscriptionRouter::<Probe>::new();
        router.record_handler_names("first", ["sayHi"]);

        let err = router
            .install_subscriptions(
                "first",
                vec![SubscriptionDecl::<Probe>::new("first/sayHi", |_, _, _, _| Ok(()))],
            )
            .unwrap_err();
        assert!(matches!(err, RegistrationError::SubscriptionCollision { .. }));

        router
            .install_subscriptions(
                "first",
                vec![SubscriptionDecl::<Probe>::new("second/sayHi", |_, _, _, _| Ok(()))],
            )
            .unwrap();
        assert_eq!(router.subscriptions("first"), vec!["second/sayHi"]);
    }

    #[test]
    fn test_duplicate_across_calls() {
        let router = SubscriptionRouter::<Probe>::new();
        router
            .on_model_init(bump(ModelDeclaration::new("a"), "b/*"))
            .unwrap();
        let err = router
            .install_subscriptions("a", vec![SubscriptionDecl::<Probe>::new("b/*", |_, _, _, _| Ok(()))])
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateSubscription { .. }));
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_create_unsubscribe() {
        let router = SubscriptionRouter::<Probe>::new();
        router
            .on_model_init(bump(ModelDeclaration::new("first"), "second/*"))
            .unwrap();
        router
            .on_model_init(bump(ModelDeclaration::new("third"), "second/*"))
            .unwrap();

        assert!(router.create_unsubscribe("first", "an/invalid/action").is_err());

        router.create_unsubscribe("first", "not/existing").unwrap().call();
        assert_eq!(router.len(), 2);

        router.create_unsubscribe("first", "second/*").unwrap().call();
        assert!(router.subscriptions("first").is_empty());
        assert_eq!(router.subscriptions("third"), vec!["second/*"]);
    }

    #[test]
    fn test_unsubscribe_handle_by_id() {
        let router = SubscriptionRouter::<Probe>::new();
        let ids = router
            .on_model_init(bump(bump(ModelDeclaration::new("a"), "b/*"), "c/*"))
            .unwrap();

        router.unsubscribe_handle(ids[0]).call();
        assert_eq!(router.subscriptions("a"), vec!["c/*"]);
    }

    #[test]
    fn test_remove_model() {
        let router = SubscriptionRouter::<Probe>::new();
        router
            .on_model_init(bump(bump(ModelDeclaration::new("a").handler("x"), "b/*"), "c/*"))
            .unwrap();
        router
            .on_model_init(bump(ModelDeclaration::new("d"), "b/*"))
            .unwrap();

        assert_eq!(router.remove_model("a"), 2);
        assert!(!router.has_handler("a", "x"));
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_builder_forward_references() {
        let router = SubscriptionRouter::<Probe>::builder()
            .allow_forward_references(false)
            .build::<Probe>();

        let err = router
            .on_model_init(bump(ModelDeclaration::new("a"), "later/*"))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownTarget { .. }));

        router
            .on_model_init(ModelDeclaration::new("later").handler("go"))
            .unwrap();
        router
            .on_model_init(bump(ModelDeclaration::new("a"), "later/*"))
            .unwrap();
    }

    #[test]
    fn test_routers_are_independent() {
        let one = SubscriptionRouter::<Probe>::new();
        let two = SubscriptionRouter::<Probe>::new();
        one.on_model_init(bump(ModelDeclaration::new("a"), "b/*"))
            .unwrap();

        let probe = Probe::default();
        assert!(
            two.notify_action(&Action::new("b/x", ()), &probe)
                .unwrap()
                .is_empty()
        );
        assert_eq!(probe.state(), 0);
    }
}
