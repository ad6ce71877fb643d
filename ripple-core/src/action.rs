//! The dispatched action descriptor.

use crate::{message::Message, pattern::split_name};

/// A dispatched action: a fully-qualified `model/handler` name plus payload.
///
/// Actions are built by the host for each dispatch and lent to the router
/// for the duration of one notification round.
#[derive(Debug, Clone, PartialEq)]
pub struct Action<P: Message> {
    name: String,
    payload: P,
}

impl<P: Message> Action<P> {
    /// Create an action from a fully-qualified name.
    pub fn new(name: impl Into<String>, payload: P) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Create an action from its model and handler parts.
    pub fn from_parts(model: &str, handler: &str, payload: P) -> Self {
        Self::new(format!("{model}/{handler}"), payload)
    }

    /// The fully-qualified name, e.g. `second/addOne`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The model segment, if the name is well formed.
    pub fn model(&self) -> Option<&str> {
        split_name(&self.name).map(|(model, _)| model)
    }

    /// The handler segment, if the name is well formed.
    pub fn handler(&self) -> Option<&str> {
        split_name(&self.name).map(|(_, handler)| handler)
    }

    /// The payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }
}
