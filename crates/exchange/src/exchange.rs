//! Single-stock exchange
//!
//! Owns the price process and the cost model, quotes prices rounded to the
//! tick, and notifies registered participants after every price move.

use log::{debug, info, warn};
use qtrader_core::{Price, TickSize};
use qtrader_ports::{ConfigError, ConfigResult, PriceObserver, PriceProcess};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::cost::CostModel;

/// Exchange configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Lot size used to normalize costs
    pub lot: i64,
    /// Tick size: one of 1, 0.1, 0.01
    pub tick: f64,
    /// Largest absolute holding a trader may reach
    pub max_holding: i64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            lot: 10,
            tick: 1.0,
            max_holding: 1000,
        }
    }
}

/// Exchange for one stock
pub struct StockExchange {
    stock: Box<dyn PriceProcess>,
    cost_model: CostModel,
    max_holding: i64,
    /// Non-owning registrations, unique by identity
    participants: Vec<Weak<RefCell<dyn PriceObserver>>>,
    /// Price before the last move; None at the start of an episode
    prev_price: Option<Price>,
    curr_price: Price,
}

impl StockExchange {
    /// Create an exchange quoting `stock`
    pub fn new(stock: Box<dyn PriceProcess>, config: ExchangeConfig) -> ConfigResult<Self> {
        let tick = TickSize::from_f64(config.tick).ok_or(ConfigError::UnsupportedTick(config.tick))?;
        let cost_model = CostModel::new(config.lot, tick)?;
        if config.max_holding <= 0 {
            return Err(ConfigError::NotPositive {
                name: "max_holding",
                value: config.max_holding as f64,
            });
        }

        let curr_price = tick.round(stock.price());
        info!(
            "Exchange created: stock={}, price={}, lot={}, tick={}, max_holding={}",
            stock.name(),
            curr_price,
            config.lot,
            tick,
            config.max_holding
        );

        Ok(Self {
            stock,
            cost_model,
            max_holding: config.max_holding,
            participants: Vec::new(),
            prev_price: None,
            curr_price,
        })
    }

    /// Register a participant for price notifications.
    ///
    /// Returns false if it was already registered. The exchange keeps only a
    /// weak reference: dropping the participant unregisters it.
    pub fn register<P: PriceObserver + 'static>(&mut self, participant: &Rc<RefCell<P>>) -> bool {
        self.prune();

        let shared: Rc<RefCell<dyn PriceObserver>> = participant.clone();
        let addr = Rc::as_ptr(&shared).cast::<()>();
        if self
            .participants
            .iter()
            .any(|existing| existing.as_ptr().cast::<()>() == addr)
        {
            return false;
        }

        info!(
            "Registered participant {}",
            participant.borrow().observer_name()
        );
        self.participants.push(Rc::downgrade(&shared));
        true
    }

    /// Transaction cost of an order. Holdings are not touched.
    pub fn execute(&self, order: i64) -> f64 {
        self.cost_model.cost(order)
    }

    /// Advance the stock one step, quote the rounded price and notify every
    /// participant with (old, new).
    ///
    /// # Panics
    ///
    /// If a participant is mutably borrowed elsewhere while the price moves.
    pub fn advance_price(&mut self) -> Price {
        let old_price = self.curr_price;
        let new_price = self.tick().round(self.stock.simulate());

        self.prev_price = Some(old_price);
        self.curr_price = new_price;
        debug!("Price {} -> {}", old_price, new_price);

        for participant in self.live_participants() {
            participant
                .borrow_mut()
                .on_price_update(old_price, new_price);
        }

        new_price
    }

    /// Start a new episode: forget the previous price and reset every
    /// participant at the current price.
    pub fn reset_episode(&mut self) {
        self.prev_price = None;
        let price = self.curr_price;

        let participants = self.live_participants();
        info!(
            "Resetting episode at price {} for {} participants",
            price,
            participants.len()
        );
        for participant in participants {
            participant.borrow_mut().on_episode_reset(price);
        }
    }

    /// Current quoted price (rounded to the tick)
    pub fn current_price(&self) -> Price {
        self.curr_price
    }

    /// Quoted price before the last move, if any this episode
    pub fn previous_price(&self) -> Option<Price> {
        self.prev_price
    }

    pub fn lot(&self) -> i64 {
        self.cost_model.lot()
    }

    pub fn tick(&self) -> TickSize {
        self.cost_model.tick()
    }

    pub fn max_holding(&self) -> i64 {
        self.max_holding
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Number of registered participants still alive
    pub fn participant_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.strong_count() > 0)
            .count()
    }

    fn live_participants(&mut self) -> Vec<Rc<RefCell<dyn PriceObserver>>> {
        self.prune();
        self.participants.iter().filter_map(Weak::upgrade).collect()
    }

    fn prune(&mut self) {
        let before = self.participants.len();
        self.participants.retain(|p| p.strong_count() > 0);
        let dropped = before - self.participants.len();
        if dropped > 0 {
            warn!("Dropped {} participants that no longer exist", dropped);
        }
    }
}
