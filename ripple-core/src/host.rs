//! # Host Seam
//!
//! The router does not store state or run reducers. It borrows those from
//! the host container through the [`Host`] trait and hands two narrow views
//! to every subscription handler:
//!
//! - [`StateView`] reads global state at the moment the handler asks.
//! - [`ModelOps`] lets a handler dispatch its *own* model's handlers.
//!
//! Calls through [`ModelOps`] go back into the host, which may dispatch
//! further actions and re-enter the router on the same thread.

use crate::{error::BoxError, message::Message};

/// The state container a router is attached to.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot host a subscription router",
    label = "missing `Host` implementation",
    note = "Implement `Host` to expose state reads and handler invocation to subscriptions."
)]
pub trait Host: Sized + 'static {
    /// Payload type carried by dispatched actions.
    type Payload: Message;

    /// Snapshot type returned by state reads.
    type State;

    /// Read the current global state.
    fn state(&self) -> Self::State;

    /// Run `handler` on `model` with `payload`, as a regular dispatch.
    fn invoke(&self, model: &str, handler: &str, payload: Self::Payload) -> Result<(), BoxError>;
}

/// Read access to global state, evaluated lazily.
pub struct StateView<'a, H: Host> {
    host: &'a H,
}

impl<'a, H: Host> StateView<'a, H> {
    /// Bind a view to a host.
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Read the current state.
    ///
    /// Each call reads afresh, so a handler sees changes made by earlier
    /// handlers in the same round and by its own dispatches.
    pub fn get(&self) -> H::State {
        self.host.state()
    }
}

/// The handler set of a single model, bound to the host.
pub struct ModelOps<'a, H: Host> {
    host: &'a H,
    model: &'a str,
}

impl<'a, H: Host> ModelOps<'a, H> {
    /// Bind the operations of `model`.
    pub fn new(host: &'a H, model: &'a str) -> Self {
        Self { host, model }
    }

    /// The model these operations belong to.
    pub fn model(&self) -> &str {
        self.model
    }

    /// Dispatch one of this model's handlers.
    pub fn dispatch(&self, handler: &str, payload: H::Payload) -> Result<(), BoxError> {
        self.host.invoke(self.model, handler, payload)
    }
}
