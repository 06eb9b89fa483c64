//! Episode driver
//!
//! Each step every trader places its order in registration order, then the
//! exchange advances the price once and notifies all of them.

use log::info;
use qtrader_exchange::{SharedTrader, StockExchange};

use crate::report::EpisodeReport;

/// Progress is logged every this many steps
const PROGRESS_INTERVAL: usize = 1000;

/// An exchange and the traders registered on it
pub struct TradingEnvironment {
    exchange: StockExchange,
    traders: Vec<SharedTrader>,
}

impl TradingEnvironment {
    /// `traders` must already be registered on `exchange`
    pub fn new(exchange: StockExchange, traders: Vec<SharedTrader>) -> Self {
        Self { exchange, traders }
    }

    /// Run one episode of `steps` steps.
    ///
    /// The exchange is reset first, which resets every trader and its
    /// learner. With `report`, the wealth path of each trader (starting at
    /// 0) is recorded.
    pub fn run(&mut self, steps: usize, report: bool) -> EpisodeReport {
        self.exchange.reset_episode();

        let names: Vec<String> = self
            .traders
            .iter()
            .map(|t| t.borrow().name().to_string())
            .collect();
        let mut episode = EpisodeReport::new(&names, report);

        for step in 1..=steps {
            for trader in &self.traders {
                trader.borrow_mut().place_order(&self.exchange);
            }
            self.exchange.advance_price();

            if report {
                for trader in &self.traders {
                    let trader = trader.borrow();
                    episode.record(trader.name(), trader.wealth());
                }
            }
            if step % PROGRESS_INTERVAL == 0 {
                info!("Finished {} steps", step);
            }
        }

        for trader in &self.traders {
            let trader = trader.borrow();
            episode.finish(trader.name(), trader.wealth());
        }
        episode.set_steps(steps);
        episode
    }

    pub fn exchange(&self) -> &StockExchange {
        &self.exchange
    }

    pub fn traders(&self) -> &[SharedTrader] {
        &self.traders
    }

    /// Trader by name
    pub fn trader(&self, name: &str) -> Option<&SharedTrader> {
        self.traders.iter().find(|t| t.borrow().name() == name)
    }
}
