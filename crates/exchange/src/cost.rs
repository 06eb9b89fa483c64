//! Transaction cost model
//!
//! An order of `n = |order| / lot` lots pays half a spread per lot and a
//! market-impact cost that grows with the square of its size:
//!
//! ```text
//! cost = n * tick + n^2 * tick
//! ```

use qtrader_core::TickSize;
use qtrader_ports::{ConfigError, ConfigResult};

/// Convex cost of executing an order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    lot: i64,
    tick: TickSize,
}

impl CostModel {
    pub fn new(lot: i64, tick: TickSize) -> ConfigResult<Self> {
        if lot <= 0 {
            return Err(ConfigError::NotPositive {
                name: "lot",
                value: lot as f64,
            });
        }
        Ok(Self { lot, tick })
    }

    pub fn lot(&self) -> i64 {
        self.lot
    }

    pub fn tick(&self) -> TickSize {
        self.tick
    }

    /// Spread cost: linear in the number of lots
    pub fn spread_cost(&self, order: i64) -> f64 {
        self.lots(order) * self.tick.as_f64()
    }

    /// Market-impact cost: quadratic in the number of lots
    pub fn impact_cost(&self, order: i64) -> f64 {
        self.lots(order).powi(2) * self.tick.as_f64()
    }

    /// Total cost of an order of `order` shares (either sign)
    pub fn cost(&self, order: i64) -> f64 {
        self.spread_cost(order) + self.impact_cost(order)
    }

    fn lots(&self, order: i64) -> f64 {
        order.unsigned_abs() as f64 / self.lot as f64
    }
}
