//! # ripple - Cross-Model Action Subscriptions
//!
//! `ripple` lets one model of a state container react to actions
//! dispatched against another. A model declares subscriptions as
//! `pattern => handler` pairs; after the host runs its own reducers for an
//! action, the router invokes every handler whose pattern matches the
//! action name.
//!
//! ## Quick Start
//!
//! ```rust
//! use ripple::testing::{CounterModel, CounterStore};
//!
//! let store = CounterStore::new();
//! store
//!     .model(
//!         CounterModel::new("first")
//!             .reducer("addOne", |s, _| s + 1)
//!             .subscribe("second/*", |_, _, _, ops| ops.dispatch("addOne", 0)),
//!     )
//!     .unwrap();
//! store.model(CounterModel::new("second").reducer("addOne", |s, _| s + 1)).unwrap();
//!
//! store.dispatch("second", "addOne", 0).unwrap();
//! assert_eq!(store.get("first"), Some(1));
//! ```
//!
//! ## Patterns
//!
//! A pattern is `model/handler`. Either segment may be `*` (anything) or
//! contain `*` inside a literal (`add*`, `*One`). A `*` never matches across
//! the `/`.
//!
//! ## Logging
//!
//! With the default `tracing` feature the router emits `tracing` events:
//! `debug` for installs and removals, `warn` for rejected declarations and
//! failing handlers, `trace` for each notification round.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use ripple_core::{
    // Dispatch
    Action,
    // Patterns
    ActionPattern,
    // Error types
    BoxError,
    // Declarations
    DeclaredValue,
    // Host seam
    Host,
    // Message
    Message,
    ModelDeclaration,
    ModelOps,
    PatternError,
    RegistrationError,
    RippleError,
    Segment,
    SharedHandler,
    StateView,
    SubscriptionDecl,
    // Handler
    SubscriptionHandler,
    Unsubscribe,
};

// Routing
pub use ripple_std::{
    Delivery, RouterBuilder, RouterConfig, SubscriptionId, SubscriptionRouter,
};

/// Lower-level registries and validation.
pub mod registry {
    pub use ripple_std::{
        names::NameRegistry,
        notify::Notifier,
        registry::{SharedRegistry, Subscription, SubscriptionRegistry},
        validate::{ValidSubscription, Validator},
    };
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use ripple_std::testing::*;
}

/// Prelude module - common imports for Ripple.
///
/// # Usage
///
/// ```rust
/// use ripple::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Dispatch
        Action,
        // Errors
        BoxError,
        // Host seam
        Host,
        ModelDeclaration,
        ModelOps,
        RegistrationError,
        RippleError,
        StateView,
        SubscriptionDecl,
        // Core traits
        SubscriptionHandler,
        // Routing
        SubscriptionRouter,
        Unsubscribe,
    };
}
