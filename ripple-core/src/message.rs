//! Message trait for action payloads.

/// A marker trait for payloads carried by dispatched actions.
///
/// Payloads must be `Send + Sync + 'static` so a router can be shared
/// between the host and the handlers it invokes.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// struct Transfer { amount: u64 }
///
/// impl Message for Transfer {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "All action payloads in Ripple must be thread-safe and static."
)]
pub trait Message: Send + Sync + 'static {}

// Common Message implementations
impl Message for () {}
impl Message for i64 {}
impl Message for String {}
impl Message for &'static str {}
impl<T: Message> Message for Box<T> {}
impl<T: Message> Message for std::sync::Arc<T> {}
impl<T: Message> Message for Vec<T> {}
impl<T: Message> Message for Option<T> {}
impl<T: Message, E: Message> Message for Result<T, E> {}
