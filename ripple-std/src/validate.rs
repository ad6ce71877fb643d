//! Validation of a model's subscription declarations.
//!
//! Each declaration is checked in order:
//!
//! 1. the key must compile as an [`ActionPattern`],
//! 2. the value must be a handler,
//! 3. the pattern must not match any of the model's own handlers,
//! 4. the pattern must not already be declared for the model,
//! 5. with forward references disabled, a literal model segment must name
//!    a registered model.
//!
//! The whole set is validated before anything is installed, so a failure
//! leaves the registry untouched.

use crate::{config::RouterConfig, names::NameRegistry, registry::SubscriptionRegistry};
use ripple_core::{
    ActionPattern, DeclaredValue, Host, RegistrationError, SharedHandler, SubscriptionDecl,
};
use std::collections::HashSet;

/// A declaration that passed every check and is ready to install.
pub struct ValidSubscription<H: Host> {
    /// The compiled pattern.
    pub pattern: ActionPattern,
    /// The handler to invoke on match.
    pub handler: SharedHandler<H>,
}

/// Checks declarations against naming rules and existing registrations.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: RouterConfig,
}

impl Validator {
    /// Create a validator with the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Validate all of `model`'s declarations.
    ///
    /// `own_handlers` are the regular handler names of `model`; `names`
    /// and `registry` describe what is already registered.
    pub fn validate<H: Host>(
        &self,
        model: &str,
        own_handlers: &[&str],
        declarations: Vec<SubscriptionDecl<H>>,
        names: &NameRegistry,
        registry: &SubscriptionRegistry<H>,
    ) -> Result<Vec<ValidSubscription<H>>, RegistrationError> {
        let mut seen = HashSet::new();
        let mut valid = Vec::with_capacity(declarations.len());

        for decl in declarations {
            let (raw, value) = decl.into_parts();

            let pattern = ActionPattern::parse(&raw).map_err(|source| {
                RegistrationError::MalformedPattern {
                    model: model.to_string(),
                    pattern: raw.clone(),
                    source,
                }
            })?;

            let handler = match value {
                DeclaredValue::Handler(handler) => handler,
                DeclaredValue::NotCallable { found } => {
                    return Err(RegistrationError::InvalidHandlerType {
                        model: model.to_string(),
                        pattern: raw,
                        found,
                    });
                }
            };

            if let Some(shadowed) = own_handlers
                .iter()
                .find(|name| pattern.matches_parts(model, name))
            {
                return Err(RegistrationError::SubscriptionCollision {
                    model: model.to_string(),
                    pattern: raw,
                    handler: shadowed.to_string(),
                });
            }

            if !seen.insert(raw.clone()) || registry.contains_keyed(model, &raw) {
                return Err(RegistrationError::DuplicateSubscription {
                    model: model.to_string(),
                    pattern: raw,
                });
            }

            if !self.config.allow_forward_references {
                if let Some(target) = pattern.model_segment().literal() {
                    if target != model && !names.contains_model(target) {
                        return Err(RegistrationError::UnknownTarget {
                            model: model.to_string(),
                            pattern: raw.clone(),
                            target: target.to_string(),
                        });
                    }
                }
            }

            valid.push(ValidSubscription { pattern, handler });
        }

        Ok(valid)
    }
}
