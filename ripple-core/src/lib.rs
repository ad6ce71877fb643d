//! # ripple-core
//!
//! Core types for the Ripple cross-model subscription router.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! hosts and extensions that don't need the full `ripple-std` implementation.
//!
//! # Vocabulary
//!
//! - [`Action`] - A dispatched `model/handler` name plus payload
//! - [`ActionPattern`] - A compiled two-segment wildcard pattern
//! - [`Host`] - The state container a router is attached to
//! - [`SubscriptionHandler`] - A reaction to matching actions
//! - [`Unsubscribe`] - A single-use handle that removes one subscription
//!
//! # Error Types
//!
//! - [`RippleError`] - Top-level error type
//! - [`PatternError`] - Malformed pattern strings
//! - [`RegistrationError`] - Rejected subscription declarations

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod action;
mod error;
mod handler;
mod host;
mod message;
pub mod pattern;
mod unsubscribe;

// Re-exports
pub use action::Action;
pub use error::{BoxError, PatternError, RegistrationError, RippleError};
pub use handler::{
    DeclaredValue, ModelDeclaration, SharedHandler, SubscriptionDecl, SubscriptionHandler,
};
pub use host::{Host, ModelOps, StateView};
pub use message::Message;
pub use pattern::{ActionPattern, Segment};
pub use unsubscribe::Unsubscribe;
