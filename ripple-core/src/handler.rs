//! # Subscription Handlers
//!
//! A subscription handler reacts to an action dispatched against another
//! model. It receives four explicit arguments:
//!
//! 1. the dispatched [`Action`],
//! 2. a [`StateView`] over global state,
//! 3. an [`Unsubscribe`] handle bound to its own subscription,
//! 4. the [`ModelOps`] of the model that declared the subscription.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|action, state, unsubscribe, ops| { ... }`
//! 2. **Struct implementation**: `impl SubscriptionHandler<MyStore> for MyHandler`
//!
//! Hosts that load model definitions dynamically may find values that are
//! not callable under a subscription key; [`DeclaredValue::NotCallable`]
//! carries those through to validation so they are rejected with a
//! descriptive error.

use crate::{
    action::Action,
    error::BoxError,
    host::{Host, ModelOps, StateView},
    unsubscribe::Unsubscribe,
};
use std::{fmt, sync::Arc};

/// A reaction to actions matching a subscription pattern.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle subscription notifications for `{H}`",
    label = "missing `SubscriptionHandler<{H}>` implementation",
    note = "Subscription handlers take (action, state, unsubscribe, ops) and return `Result<(), BoxError>`."
)]
pub trait SubscriptionHandler<H: Host>: Send + Sync + 'static {
    /// Called once per matching action.
    fn on_action(
        &self,
        action: &Action<H::Payload>,
        state: &StateView<'_, H>,
        unsubscribe: &Unsubscribe,
        ops: &ModelOps<'_, H>,
    ) -> Result<(), BoxError>;
}

// Blanket impl for closures
impl<H, F> SubscriptionHandler<H> for F
where
    H: Host,
    F: Fn(&Action<H::Payload>, &StateView<'_, H>, &Unsubscribe, &ModelOps<'_, H>) -> Result<(), BoxError>
        + Send
        + Sync
        + 'static,
{
    fn on_action(
        &self,
        action: &Action<H::Payload>,
        state: &StateView<'_, H>,
        unsubscribe: &Unsubscribe,
        ops: &ModelOps<'_, H>,
    ) -> Result<(), BoxError> {
        (self)(action, state, unsubscribe, ops)
    }
}

/// A shared, type-erased subscription handler.
pub type SharedHandler<H> = Arc<dyn SubscriptionHandler<H>>;

/// The value a model declared under a subscription key.
pub enum DeclaredValue<H: Host> {
    /// An invocable handler.
    Handler(SharedHandler<H>),
    /// Something that cannot be invoked; `found` describes what it was.
    NotCallable {
        /// Human-readable type of the declared value, e.g. `"number"`.
        found: String,
    },
}

impl<H: Host> Clone for DeclaredValue<H> {
    fn clone(&self) -> Self {
        match self {
            DeclaredValue::Handler(handler) => DeclaredValue::Handler(Arc::clone(handler)),
            DeclaredValue::NotCallable { found } => DeclaredValue::NotCallable {
                found: found.clone(),
            },
        }
    }
}

impl<H: Host> fmt::Debug for DeclaredValue<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredValue::Handler(_) => f.write_str("Handler(..)"),
            DeclaredValue::NotCallable { found } => {
                f.debug_struct("NotCallable").field("found", found).finish()
            }
        }
    }
}

/// One `(pattern, handler)` entry from a model definition.
///
/// The pattern is kept raw; compiling it is the validator's job so that a
/// malformed key is reported together with its model.
pub struct SubscriptionDecl<H: Host> {
    pattern: String,
    value: DeclaredValue<H>,
}

impl<H: Host> SubscriptionDecl<H> {
    /// Declare a closure handler.
    pub fn new<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Action<H::Payload>, &StateView<'_, H>, &Unsubscribe, &ModelOps<'_, H>) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self::from_handler(pattern, Arc::new(handler))
    }

    /// Declare an already shared handler.
    pub fn from_handler(pattern: impl Into<String>, handler: SharedHandler<H>) -> Self {
        Self {
            pattern: pattern.into(),
            value: DeclaredValue::Handler(handler),
        }
    }

    /// Declare a value that is not callable.
    pub fn not_callable(pattern: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            value: DeclaredValue::NotCallable {
                found: found.into(),
            },
        }
    }

    /// The raw pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The declared value.
    pub fn value(&self) -> &DeclaredValue<H> {
        &self.value
    }

    /// Split into pattern and value.
    pub fn into_parts(self) -> (String, DeclaredValue<H>) {
        (self.pattern, self.value)
    }
}

impl<H: Host> Clone for SubscriptionDecl<H> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            value: self.value.clone(),
        }
    }
}

impl<H: Host> fmt::Debug for SubscriptionDecl<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionDecl")
            .field("pattern", &self.pattern)
            .field("value", &self.value)
            .finish()
    }
}

/// Everything the host reports when a model is registered.
pub struct ModelDeclaration<H: Host> {
    name: String,
    handlers: Vec<String>,
    subscriptions: Vec<SubscriptionDecl<H>>,
}

impl<H: Host> ModelDeclaration<H> {
    /// Start a declaration for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Add a regular handler name (reducer or effect).
    pub fn handler(mut self, name: impl Into<String>) -> Self {
        self.handlers.push(name.into());
        self
    }

    /// Add several regular handler names.
    pub fn handlers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handlers.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add a closure subscription.
    pub fn subscribe<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Action<H::Payload>, &StateView<'_, H>, &Unsubscribe, &ModelOps<'_, H>) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.declare(SubscriptionDecl::new(pattern, handler))
    }

    /// Add a prepared declaration.
    pub fn declare(mut self, decl: SubscriptionDecl<H>) -> Self {
        self.subscriptions.push(decl);
        self
    }

    /// The model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Split into name, handler names, and subscription declarations.
    pub fn into_parts(self) -> (String, Vec<String>, Vec<SubscriptionDecl<H>>) {
        (self.name, self.handlers, self.subscriptions)
    }
}
