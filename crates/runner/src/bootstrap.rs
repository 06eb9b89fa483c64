//! Bootstrap - Build the exchange and its traders from configuration
//!
//! Handles initial setup of a run:
//! - Creating the price process and the exchange
//! - Creating one learner per trader and registering the trader
//! - Deriving component seeds from the run seed

use log::info;
use qtrader_exchange::{OuLogPrice, StockExchange, StockTrader, TraderConfig};
use qtrader_learning::{EstimatedStore, Learner, TabularStore, ValueStore};
use qtrader_ports::ConfigError;
use std::collections::HashSet;

use crate::config::{SimulationConfig, TraderSpec};
use crate::environment::TradingEnvironment;
use crate::error::RunnerResult;

/// Build a ready-to-run environment. Nothing is created if any component
/// is misconfigured.
pub fn build(config: &SimulationConfig) -> RunnerResult<TradingEnvironment> {
    let mut names = HashSet::new();
    for spec in &config.traders {
        if !names.insert(spec.name.as_str()) {
            return Err(ConfigError::DuplicateTrader(spec.name.clone()).into());
        }
    }

    let mut stock_config = config.stock.clone();
    stock_config.seed = stock_config.seed.or(config.seed);
    let stock = OuLogPrice::new(stock_config)?;
    let mut exchange = StockExchange::new(Box::new(stock), config.exchange.clone())?;

    let mut traders = Vec::with_capacity(config.traders.len());
    for (index, spec) in config.traders.iter().enumerate() {
        let learner = build_learner(spec, derive_seeds(config.seed, index))?;
        let trader_config = TraderConfig {
            name: spec.name.clone(),
            utility: spec.utility,
        };
        traders.push(StockTrader::new(trader_config, learner, &mut exchange)?);
    }

    info!(
        "Bootstrapped {} traders at price {}",
        traders.len(),
        exchange.current_price()
    );
    Ok(TradingEnvironment::new(exchange, traders))
}

/// Learner and forest seeds for the trader at `index`
fn derive_seeds(seed: Option<u64>, index: usize) -> (Option<u64>, Option<u64>) {
    match seed {
        Some(seed) => {
            let base = seed.wrapping_add(1 + 2 * index as u64);
            (Some(base), Some(base.wrapping_add(1)))
        }
        None => (None, None),
    }
}

fn build_learner(
    spec: &TraderSpec,
    (learner_seed, forest_seed): (Option<u64>, Option<u64>),
) -> RunnerResult<Learner> {
    let mut config = spec.learner.config.clone();
    config.seed = config.seed.or(learner_seed);

    let store: Box<dyn ValueStore> = if spec.learner.kind.uses_forest() {
        let mut forest = spec.forest.clone();
        forest.seed = forest.seed.or(forest_seed);
        Box::new(EstimatedStore::with_forest(forest)?)
    } else {
        Box::new(TabularStore::new())
    };

    Ok(Learner::new(spec.learner.kind.rule(), config, store)?)
}
