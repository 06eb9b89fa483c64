//! Action-value table backed by a periodically refit regression model

use log::{debug, info};
use qtrader_core::{Action, State};
use qtrader_ports::{ConfigResult, Regressor, ValueStore};

use crate::forest::{ForestConfig, RandomForest};
use crate::tabular::TabularStore;

/// Number of stored entries between refits of the estimator
pub const REFIT_CADENCE: usize = 500;

/// Table of exact values that falls back to a regression estimate for
/// pairs it has never stored.
///
/// - Stored pairs always return their exact value.
/// - With fewer than [`REFIT_CADENCE`] stored pairs, unseen pairs are 0.
/// - When the table size has reached a new multiple of [`REFIT_CADENCE`]
///   since the last fit, the next unseen query refits the model on every
///   stored pair (features `[price, holding, action]`, target the value)
///   and is answered by the fresh model. Otherwise the last model answers.
pub struct EstimatedStore<R: Regressor = RandomForest> {
    table: TabularStore,
    model: R,
    /// Table size (a multiple of the cadence) the model was last fit at
    fitted_at: usize,
    refits: usize,
}

impl EstimatedStore<RandomForest> {
    /// Store estimating with a random forest
    pub fn with_forest(config: ForestConfig) -> ConfigResult<Self> {
        Ok(Self::new(RandomForest::new(config)?))
    }
}

impl<R: Regressor> EstimatedStore<R> {
    pub fn new(model: R) -> Self {
        Self {
            table: TabularStore::new(),
            model,
            fitted_at: 0,
            refits: 0,
        }
    }

    /// Feature row for a (state, action) pair
    pub fn features(state: &State, action: Action) -> Vec<f64> {
        let [price, holding] = state.features();
        vec![price, holding, action as f64]
    }

    /// Number of times the model has been refit
    pub fn refit_count(&self) -> usize {
        self.refits
    }

    pub fn table(&self) -> &TabularStore {
        &self.table
    }

    pub fn model(&self) -> &R {
        &self.model
    }

    fn refit(&mut self) {
        let (features, targets): (Vec<Vec<f64>>, Vec<f64>) = self
            .table
            .iter()
            .map(|((state, action), value)| (Self::features(state, *action), *value))
            .unzip();

        self.model.fit(&features, &targets);
        self.refits += 1;

        info!(
            "Refit value estimator on {} entries (refit #{})",
            targets.len(),
            self.refits
        );
    }
}

impl<R: Regressor> ValueStore for EstimatedStore<R> {
    fn value(&mut self, state: &State, action: Action) -> f64 {
        if let Some(value) = self.table.lookup(state, action) {
            return value;
        }

        let stored = self.table.len();
        if stored < REFIT_CADENCE {
            return 0.0;
        }

        let threshold = stored - stored % REFIT_CADENCE;
        if threshold > self.fitted_at {
            self.refit();
            self.fitted_at = threshold;
        }

        let estimate = self.model.predict(&Self::features(state, action));
        debug!("Estimated Q{} action={} -> {:.4}", state, action, estimate);
        estimate
    }

    fn set_value(&mut self, state: State, action: Action, value: f64) {
        self.table.set(state, action, value);
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn name(&self) -> &str {
        "estimated"
    }
}
