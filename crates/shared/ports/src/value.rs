use qtrader_core::{Action, State};

/// Port for action-value storage
///
/// Backends range from an exact table to model-based estimators. Reading
/// takes `&mut self` because estimating backends may refit lazily on a query.
pub trait ValueStore {
    /// Stored or estimated value of taking `action` in `state`
    fn value(&mut self, state: &State, action: Action) -> f64;

    /// Overwrite the stored value of (`state`, `action`)
    fn set_value(&mut self, state: State, action: Action, value: f64);

    /// Number of (state, action) pairs stored exactly
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the backend name for logging
    fn name(&self) -> &str;
}

/// Port for a regression model trained on numeric feature rows
pub trait Regressor {
    /// Fit the model to `features` (one row per sample) and `targets`
    fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]);

    /// Predict the target for one feature row. An unfitted model predicts 0.
    fn predict(&self, features: &[f64]) -> f64;
}
