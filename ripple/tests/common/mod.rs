#![allow(dead_code)]

use ripple::{
    Action, BoxError, ModelOps, StateView, Unsubscribe,
    testing::{CounterModel, CounterStore},
};

// ============================================================================
// Reducers
// ============================================================================

pub fn add_one(state: i64, _: i64) -> i64 {
    state + 1
}

pub fn add(state: i64, payload: i64) -> i64 {
    state + payload
}

// ============================================================================
// Models
// ============================================================================

/// A model at `0` with an `addOne` reducer.
pub fn counter(name: &str) -> CounterModel {
    CounterModel::new(name).reducer("addOne", add_one)
}

/// Register every model, panicking on rejection.
pub fn store_with(models: impl IntoIterator<Item = CounterModel>) -> CounterStore {
    let store = CounterStore::new();
    for model in models {
        store.model(model).expect("model should register");
    }
    store
}

/// Expected state from `(model, value)` pairs.
pub fn state(pairs: &[(&str, i64)]) -> std::collections::BTreeMap<String, i64> {
    pairs
        .iter()
        .map(|(model, value)| (model.to_string(), *value))
        .collect()
}

// ============================================================================
// Subscription Handlers
// ============================================================================

/// Dispatch the subscribing model's own `addOne`.
pub fn add_one_to_self(
    _action: &Action<i64>,
    _state: &StateView<'_, CounterStore>,
    _unsubscribe: &Unsubscribe,
    ops: &ModelOps<'_, CounterStore>,
) -> Result<(), BoxError> {
    ops.dispatch("addOne", 0)
}

/// Like [`add_one_to_self`], then drop the subscription.
pub fn add_one_once(
    _action: &Action<i64>,
    _state: &StateView<'_, CounterStore>,
    unsubscribe: &Unsubscribe,
    ops: &ModelOps<'_, CounterStore>,
) -> Result<(), BoxError> {
    ops.dispatch("addOne", 0)?;
    unsubscribe.call();
    Ok(())
}
