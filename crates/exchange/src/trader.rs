//! Learning trader
//!
//! Turns learner actions into orders clipped to the exchange's position
//! limit, and keeps the wealth and reward bookkeeping the learner trains on.

use log::{debug, info};
use qtrader_core::{Action, Holding, Price, State};
use qtrader_learning::Learner;
use qtrader_ports::{ConfigError, ConfigResult, PriceObserver};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::exchange::StockExchange;

/// Shared handle: the driver owns traders, the exchange only observes them
pub type SharedTrader = Rc<RefCell<StockTrader>>;

/// Trader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraderConfig {
    pub name: String,
    /// Risk-aversion constant of the reward
    pub utility: f64,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            name: "trader".to_string(),
            utility: 1e-3,
        }
    }
}

/// Outcome of one `place_order` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderFill {
    /// Order the learner asked for
    pub requested: Action,
    /// Order actually sent, after clipping to the position limit
    pub filled: Action,
    /// Transaction cost charged for `filled`
    pub cost: f64,
}

/// Trader holding one stock and learning from risk-adjusted rewards
pub struct StockTrader {
    name: String,
    utility: f64,
    holding: Holding,
    last_cost: f64,
    wealth: f64,
    step_count: u64,
    /// None until the first price update of the episode
    reward: Option<f64>,
    state: State,
    learner: Learner,
}

impl StockTrader {
    /// Create a trader at the exchange's current price and register it
    pub fn new(
        config: TraderConfig,
        learner: Learner,
        exchange: &mut StockExchange,
    ) -> ConfigResult<SharedTrader> {
        let utility = ConfigError::check_positive("utility", config.utility)?;

        let trader = Rc::new(RefCell::new(Self {
            name: config.name,
            utility,
            holding: 0,
            last_cost: 0.0,
            wealth: 0.0,
            step_count: 0,
            reward: None,
            state: State::new(exchange.current_price(), 0),
            learner,
        }));

        exchange.register(&trader);
        info!(
            "Trader {} created with {:?} learner (utility={})",
            trader.borrow().name,
            trader.borrow().learner.rule(),
            utility
        );
        Ok(trader)
    }

    /// Ask the learner for an order, clip it to the position limit, pay the
    /// cost of the clipped order and update the holding.
    pub fn place_order(&mut self, exchange: &StockExchange) -> OrderFill {
        let requested = self
            .learner
            .learn(self.reward.unwrap_or(0.0), self.state);

        let limit = exchange.max_holding();
        let target = self.holding.saturating_add(requested).clamp(-limit, limit);
        let filled = target - self.holding;

        let cost = exchange.execute(filled);
        self.last_cost = cost;
        self.holding = target;

        debug!(
            "{}: requested={} filled={} holding={} cost={:.4}",
            self.name, requested, filled, self.holding, cost
        );

        OrderFill {
            requested,
            filled,
            cost,
        }
    }

    /// Mark the holding to market and compute the reward for the last step
    pub fn get_price_update(&mut self, old_price: Price, new_price: Price) {
        let price_move = new_price - old_price;
        let pnl = Decimal::from(self.holding)
            .checked_mul(price_move)
            .and_then(|pnl| pnl.to_f64())
            .unwrap_or_else(|| self.holding as f64 * price_move.to_f64().unwrap_or_default());
        let delta_wealth = pnl - self.last_cost;

        self.wealth += delta_wealth;
        self.step_count += 1;

        let mean_wealth = self.wealth / self.step_count as f64;
        let reward = delta_wealth - 0.5 * self.utility * (delta_wealth - mean_wealth).powi(2);
        self.reward = Some(reward);
        self.state = State::new(new_price, self.holding);

        debug!(
            "{}: pnl={:.4} delta={:.4} wealth={:.4} reward={:.4}",
            self.name, pnl, delta_wealth, self.wealth, reward
        );
    }

    /// Start a new episode at `price`; the learner keeps its values
    pub fn reset_episode(&mut self, price: Price) {
        self.holding = 0;
        self.last_cost = 0.0;
        self.wealth = 0.0;
        self.step_count = 0;
        self.reward = None;
        self.state = State::new(price, 0);
        self.learner.reset_episode();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn utility(&self) -> f64 {
        self.utility
    }

    pub fn holding(&self) -> Holding {
        self.holding
    }

    pub fn last_cost(&self) -> f64 {
        self.last_cost
    }

    /// Cumulative wealth this episode
    pub fn wealth(&self) -> f64 {
        self.wealth
    }

    pub fn last_reward(&self) -> Option<f64> {
        self.reward
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn learner(&self) -> &Learner {
        &self.learner
    }
}

impl PriceObserver for StockTrader {
    fn on_price_update(&mut self, old_price: Price, new_price: Price) {
        self.get_price_update(old_price, new_price);
    }

    fn on_episode_reset(&mut self, price: Price) {
        self.reset_episode(price);
    }

    fn observer_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for StockTrader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockTrader")
            .field("name", &self.name)
            .field("holding", &self.holding)
            .field("wealth", &self.wealth)
            .field("step_count", &self.step_count)
            .field("reward", &self.reward)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeConfig;
    use crate::stock::{OuLogPrice, StockConfig};
    use approx::assert_relative_eq;
    use qtrader_learning::LearnerConfig;
    use rust_decimal_macros::dec;

    fn exchange(max_holding: i64) -> StockExchange {
        let stock = OuLogPrice::new(StockConfig::constant(50.0)).unwrap();
        let config = ExchangeConfig {
            max_holding,
            ..Default::default()
        };
        StockExchange::new(Box::new(stock), config).unwrap()
    }

    /// Learner that always picks `action`
    fn fixed_learner(action: Action) -> Learner {
        Learner::tabular_q_learning(LearnerConfig {
            actions: vec![action],
            epsilon: 0.0,
            seed: Some(0),
            ..Default::default()
        })
        .unwrap()
    }

    fn trader(exchange: &mut StockExchange, action: Action) -> SharedTrader {
        let config = TraderConfig {
            name: "test".to_string(),
            utility: 1e-3,
        };
        StockTrader::new(config, fixed_learner(action), exchange).unwrap()
    }

    #[test]
    fn test_new_registers_at_current_price() {
        let mut exchange = exchange(100);
        let trader = trader(&mut exchange, 0);

        assert_eq!(exchange.participant_count(), 1);
        let trader = trader.borrow();
        assert_eq!(trader.state(), State::new(dec!(50), 0));
        assert_eq!(trader.wealth(), 0.0);
        assert_eq!(trader.step_count(), 0);
        assert_eq!(trader.last_reward(), None);
    }

    #[test]
    fn test_utility_must_be_positive() {
        let mut exchange = exchange(100);
        for utility in [0.0, -1e-3, f64::NAN] {
            let config = TraderConfig {
                name: "bad".to_string(),
                utility,
            };
            assert!(StockTrader::new(config, fixed_learner(0), &mut exchange).is_err());
        }
        assert_eq!(exchange.participant_count(), 0);
    }

    #[test]
    fn test_order_clipped_at_limit() {
        let mut exchange = exchange(25);
        let trader = trader(&mut exchange, 10);

        let fills: Vec<OrderFill> = (0..4)
            .map(|_| trader.borrow_mut().place_order(&exchange))
            .collect();

        assert_eq!(
            fills.iter().map(|f| f.filled).collect::<Vec<_>>(),
            vec![10, 10, 5, 0]
        );
        assert!(fills.iter().all(|f| f.requested == 10));
        assert_eq!(trader.borrow().holding(), 25);

        // Cost is charged on the clipped order
        assert_relative_eq!(fills[2].cost, exchange.execute(5));
        assert_eq!(fills[3].cost, 0.0);
    }

    #[test]
    fn test_short_side_clipped() {
        let mut exchange = exchange(15);
        let trader = trader(&mut exchange, -10);

        trader.borrow_mut().place_order(&exchange);
        let fill = trader.borrow_mut().place_order(&exchange);

        assert_eq!(fill.filled, -5);
        assert_eq!(trader.borrow().holding(), -15);
    }

    #[test]
    fn test_price_update_reward() {
        let mut exchange = exchange(100);
        let trader = trader(&mut exchange, 10);

        let fill = trader.borrow_mut().place_order(&exchange);
        assert_relative_eq!(fill.cost, 2.0);

        trader.borrow_mut().get_price_update(dec!(50), dec!(53));

        let trader = trader.borrow();
        // pnl = 10 * 3, delta = 30 - 2, mean = delta after one step
        assert_relative_eq!(trader.wealth(), 28.0);
        assert_eq!(trader.step_count(), 1);
        assert_relative_eq!(trader.last_reward().unwrap(), 28.0);
        assert_eq!(trader.state(), State::new(dec!(53), 10));
    }

    #[test]
    fn test_reward_penalizes_deviation_from_mean() {
        let mut exchange = exchange(100);
        let trader = trader(&mut exchange, 10);
        let mut trader = trader.borrow_mut();

        trader.place_order(&exchange);
        trader.get_price_update(dec!(50), dec!(50));
        trader.place_order(&exchange);
        trader.get_price_update(dec!(50), dec!(60));

        // step 1: delta -2; step 2: pnl 20 * 10 minus cost 2
        let delta: f64 = 198.0;
        let wealth = -2.0 + delta;
        let expected = delta - 0.5 * 1e-3 * (delta - wealth / 2.0).powi(2);
        assert_relative_eq!(trader.wealth(), wealth);
        assert_relative_eq!(trader.last_reward().unwrap(), expected);
    }

    #[test]
    fn test_huge_pnl_does_not_overflow() {
        let mut exchange = exchange(100);
        let trader = trader(&mut exchange, 0);
        let mut trader = trader.borrow_mut();
        trader.holding = i64::MAX / 2;

        trader.get_price_update(dec!(500_000_000_000), dec!(1_000_000_000_000));

        let expected = (i64::MAX / 2) as f64 * 5e11;
        assert_relative_eq!(trader.wealth(), expected);
        assert!(trader.last_reward().unwrap().is_finite());
    }

    #[test]
    fn test_fractional_prices() {
        let mut exchange = exchange(100);
        let trader = trader(&mut exchange, -10);
        let mut trader = trader.borrow_mut();

        trader.place_order(&exchange);
        trader.get_price_update(dec!(50.25), dec!(50.10));

        assert_relative_eq!(trader.wealth(), 10.0 * 0.15 - 2.0);
    }

    #[test]
    fn test_reset_episode_clears_accounting() {
        let mut exchange = exchange(100);
        let trader = trader(&mut exchange, 10);

        trader.borrow_mut().place_order(&exchange);
        exchange.advance_price();
        assert_eq!(trader.borrow().step_count(), 1);

        exchange.reset_episode();

        let trader = trader.borrow();
        assert_eq!(trader.holding(), 0);
        assert_eq!(trader.last_cost(), 0.0);
        assert_eq!(trader.wealth(), 0.0);
        assert_eq!(trader.step_count(), 0);
        assert_eq!(trader.last_reward(), None);
        assert_eq!(trader.state(), State::new(dec!(50), 0));
        assert!(!trader.learner().is_warmed());
        // Exploration schedule carries over
        assert_eq!(trader.learner().step_count(), 3);
    }
}
