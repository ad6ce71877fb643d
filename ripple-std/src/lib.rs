//! # ripple-std
//!
//! Standard implementations for the Ripple subscription router.
//!
//! This crate provides:
//! - **Routing**: [`SubscriptionRouter`], configured through [`RouterBuilder`]
//! - **Registries**: [`SubscriptionRegistry`] and [`NameRegistry`]
//! - **Validation**: [`Validator`]
//! - **Notification**: [`Notifier`] and its [`Delivery`] report
//! - **Testing**: an in-memory [`testing::CounterStore`] host

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use ripple_core;

// Modules
pub mod config;
pub mod names;
pub mod notify;
pub mod registry;
pub mod router;
pub mod testing;
pub mod validate;

pub use config::{RouterBuilder, RouterConfig};
pub use names::NameRegistry;
pub use notify::{Delivery, Notifier};
pub use registry::{SharedRegistry, Subscription, SubscriptionId, SubscriptionRegistry};
pub use router::SubscriptionRouter;
pub use validate::{ValidSubscription, Validator};
