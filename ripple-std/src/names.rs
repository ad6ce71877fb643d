//! Per-model record of regular handler names.
//!
//! Populated once when a model registers and read by the validator to stop
//! subscriptions from shadowing a model's own reducers and effects. The
//! dispatch path never consults it.

use std::collections::{BTreeSet, HashMap};

/// Handler names claimed by each model's reducers and effects.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    models: HashMap<String, BTreeSet<String>>,
}

impl NameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the handler names of `model`, replacing any previous record.
    pub fn record<I, S>(&mut self, model: impl Into<String>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models
            .insert(model.into(), names.into_iter().map(Into::into).collect());
    }

    /// Whether `model` declared a handler called `name`.
    pub fn has_handler(&self, model: &str, name: &str) -> bool {
        self.models
            .get(model)
            .is_some_and(|names| names.contains(name))
    }

    /// Whether `model` has been recorded at all.
    pub fn contains_model(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// The handler names of `model`, in sorted order.
    pub fn handlers(&self, model: &str) -> impl Iterator<Item = &str> {
        self.models
            .get(model)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// Forget `model`. Returns whether it was recorded.
    pub fn remove(&mut self, model: &str) -> bool {
        self.models.remove(model).is_some()
    }

    /// Number of recorded models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model has been recorded.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
