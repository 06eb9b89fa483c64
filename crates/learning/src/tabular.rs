//! Exact action-value table

use qtrader_core::{Action, State};
use qtrader_ports::ValueStore;
use std::collections::BTreeMap;

/// Exact (state, action) -> value table. Unseen pairs are worth 0.
///
/// Ordered by key so that exported training data is reproducible.
#[derive(Debug, Clone, Default)]
pub struct TabularStore {
    values: BTreeMap<(State, Action), f64>,
}

impl TabularStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value, or 0 for a pair that was never set
    pub fn get(&self, state: &State, action: Action) -> f64 {
        self.lookup(state, action).unwrap_or(0.0)
    }

    /// Stored value, if any
    pub fn lookup(&self, state: &State, action: Action) -> Option<f64> {
        self.values.get(&(*state, action)).copied()
    }

    pub fn set(&mut self, state: State, action: Action, value: f64) {
        self.values.insert((state, action), value);
    }

    pub fn contains(&self, state: &State, action: Action) -> bool {
        self.values.contains_key(&(*state, action))
    }

    /// All stored entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&(State, Action), &f64)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueStore for TabularStore {
    fn value(&mut self, state: &State, action: Action) -> f64 {
        self.get(state, action)
    }

    fn set_value(&mut self, state: State, action: Action, value: f64) {
        self.set(state, action, value);
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn name(&self) -> &str {
        "tabular"
    }
}
