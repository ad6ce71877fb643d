//! Testing utilities for Ripple.
//!
//! This module provides a small in-memory host to exercise a router end to
//! end without a real state container.
//!
//! # Features
//!
//! - [`CounterStore`]: A host whose models each hold one integer
//! - [`CounterModel`]: Builder for a counter model's reducers, effects, and subscriptions
//! - [`StoreError`]: Errors raised by the store itself
//!
//! # Example
//!
//! ```rust
//! use ripple_std::testing::{CounterModel, CounterStore};
//!
//! let store = CounterStore::new();
//! store
//!     .model(
//!         CounterModel::new("first")
//!             .reducer("addOne", |s, _| s + 1)
//!             .subscribe("second/addOne", |_, _, _, ops| ops.dispatch("addOne", 1)),
//!     )
//!     .unwrap();
//! store.model(CounterModel::new("second").reducer("addOne", |s, _| s + 1)).unwrap();
//!
//! store.dispatch("second", "addOne", 1).unwrap();
//! assert_eq!(store.get("first"), Some(1));
//! ```

use crate::{
    notify::Delivery,
    registry::lock,
    router::SubscriptionRouter,
};
use ripple_core::{
    Action, BoxError, Host, ModelDeclaration, ModelOps, RegistrationError, StateView,
    SubscriptionDecl, Unsubscribe,
};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

/// Errors raised by [`CounterStore`] before the router is involved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The dispatched action names no reducer or effect.
    #[error("no handler `{model}/{handler}`")]
    UnknownHandler {
        /// Target model.
        model: String,
        /// Missing handler.
        handler: String,
    },
}

/// A reducer over a model's integer state: `(state, payload) -> state`.
pub type Reducer = fn(i64, i64) -> i64;

/// Global state of a [`CounterStore`]: model name to value.
pub type CounterState = BTreeMap<String, i64>;

/// Definition of one counter model.
pub struct CounterModel {
    name: String,
    initial: i64,
    reducers: Vec<(String, Reducer)>,
    effects: Vec<String>,
    subscriptions: Vec<SubscriptionDecl<CounterStore>>,
}

impl CounterModel {
    /// Start a model with initial state `0`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: 0,
            reducers: Vec::new(),
            effects: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Set the initial state.
    pub fn state(mut self, initial: i64) -> Self {
        self.initial = initial;
        self
    }

    /// Add a reducer.
    pub fn reducer(mut self, name: impl Into<String>, reducer: Reducer) -> Self {
        self.reducers.push((name.into(), reducer));
        self
    }

    /// Add an effect. Effects only claim a name; dispatching one leaves state alone.
    pub fn effect(mut self, name: impl Into<String>) -> Self {
        self.effects.push(name.into());
        self
    }

    /// Add a closure subscription.
    pub fn subscribe<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(
                &Action<i64>,
                &StateView<'_, CounterStore>,
                &Unsubscribe,
                &ModelOps<'_, CounterStore>,
            ) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.declare(SubscriptionDecl::new(pattern, handler))
    }

    /// Add a prepared declaration, e.g. a non-callable value.
    pub fn declare(mut self, decl: SubscriptionDecl<CounterStore>) -> Self {
        self.subscriptions.push(decl);
        self
    }
}

/// An in-memory host: every model holds one `i64`.
///
/// Dispatch runs the model's reducer first, then notifies the router, so
/// subscriptions observe the already-updated state.
pub struct CounterStore {
    router: SubscriptionRouter<CounterStore>,
    state: Mutex<CounterState>,
    reducers: Mutex<HashMap<String, HashMap<String, Option<Reducer>>>>,
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterStore {
    /// Create an empty store with a default router.
    pub fn new() -> Self {
        Self::with_router(SubscriptionRouter::new())
    }

    /// Create an empty store around `router`.
    pub fn with_router(router: SubscriptionRouter<CounterStore>) -> Self {
        Self {
            router,
            state: Mutex::new(BTreeMap::new()),
            reducers: Mutex::new(HashMap::new()),
        }
    }

    /// Register a model. On error the store is unchanged.
    pub fn model(&self, model: CounterModel) -> Result<(), RegistrationError> {
        let CounterModel {
            name,
            initial,
            reducers,
            effects,
            subscriptions,
        } = model;

        let mut handlers: HashMap<String, Option<Reducer>> = reducers
            .into_iter()
            .map(|(handler, reducer)| (handler, Some(reducer)))
            .collect();
        handlers.extend(effects.into_iter().map(|effect| (effect, None)));

        let declaration = subscriptions.into_iter().fold(
            ModelDeclaration::new(name.clone()).handlers(handlers.keys().cloned()),
            ModelDeclaration::declare,
        );
        self.router.on_model_init(declaration)?;

        lock(&self.reducers).insert(name.clone(), handlers);
        lock(&self.state).insert(name, initial);
        Ok(())
    }

    /// Dispatch `model/handler` with `payload`.
    pub fn dispatch(&self, model: &str, handler: &str, payload: i64) -> Result<Delivery, BoxError> {
        let reducer = lock(&self.reducers)
            .get(model)
            .and_then(|handlers| handlers.get(handler).copied())
            .ok_or_else(|| StoreError::UnknownHandler {
                model: model.to_string(),
                handler: handler.to_string(),
            })?;

        if let Some(reducer) = reducer {
            let mut state = lock(&self.state);
            let value = state.entry(model.to_string()).or_default();
            *value = reducer(*value, payload);
        }

        self.router
            .notify_action(&Action::from_parts(model, handler, payload), self)
    }

    /// Tear down a model and its subscriptions.
    pub fn remove_model(&self, model: &str) -> usize {
        lock(&self.reducers).remove(model);
        lock(&self.state).remove(model);
        self.router.remove_model(model)
    }

    /// The current value of `model`.
    pub fn get(&self, model: &str) -> Option<i64> {
        lock(&self.state).get(model).copied()
    }

    /// A copy of the whole state.
    pub fn snapshot(&self) -> CounterState {
        lock(&self.state).clone()
    }

    /// The router this store notifies.
    pub fn router(&self) -> &SubscriptionRouter<CounterStore> {
        &self.router
    }
}

impl Host for CounterStore {
    type Payload = i64;
    type State = CounterState;

    fn state(&self) -> Self::State {
        self.snapshot()
    }

    fn invoke(&self, model: &str, handler: &str, payload: i64) -> Result<(), BoxError> {
        self.dispatch(model, handler, payload).map(|_| ())
    }
}
