use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{Holding, Price};

/// Observation a learner keys its action values on: the rounded price
/// and the trader's holding after its last order.
///
/// The price is a `Decimal` so that the state is hashable and equality is
/// exact at tick granularity (`50` and `50.0` are the same state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub price: Price,
    pub holding: Holding,
}

impl State {
    pub fn new(price: Price, holding: Holding) -> Self {
        Self { price, holding }
    }

    /// Numeric components, in order, for function approximators
    pub fn features(&self) -> [f64; 2] {
        [self.price.to_f64().unwrap_or(0.0), self.holding as f64]
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(Decimal::ZERO, 0)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(price={}, holding={})", self.price, self.holding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_equal_prices_with_different_scale_are_one_state() {
        let mut values = HashMap::new();
        values.insert(State::new(dec!(50), 10), 1.5);

        assert_eq!(values.get(&State::new(dec!(50.0), 10)), Some(&1.5));
        assert_eq!(values.get(&State::new(dec!(50.0), -10)), None);
    }

    #[test]
    fn test_features() {
        let state = State::new(dec!(72.5), -30);
        assert_eq!(state.features(), [72.5, -30.0]);
    }
}
