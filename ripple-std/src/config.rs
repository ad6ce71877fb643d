//! Router configuration.

use crate::router::SubscriptionRouter;
use ripple_core::Host;

/// Options controlling how declarations are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Accept patterns whose model segment names a model that has not been
    /// registered yet. Wildcard model segments are always accepted.
    pub allow_forward_references: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            allow_forward_references: true,
        }
    }
}

/// Builder for a [`SubscriptionRouter`].
///
/// # Example
///
/// ```rust,ignore
/// let router = RouterBuilder::new()
///     .allow_forward_references(false)
///     .build::<MyStore>();
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouterBuilder {
    config: RouterConfig,
}

impl RouterBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether patterns may target models that are not registered yet.
    pub fn allow_forward_references(mut self, allow: bool) -> Self {
        self.config.allow_forward_references = allow;
        self
    }

    /// Build the router.
    pub fn build<H: Host>(self) -> SubscriptionRouter<H> {
        SubscriptionRouter::with_config(self.config)
    }
}
