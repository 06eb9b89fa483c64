//! qtrader Exchange - Single-stock market with learning traders
//!
//! - **Stock**: mean-reverting log-price process ([`OuLogPrice`])
//! - **Exchange**: tick rounding, convex transaction costs, price fan-out
//! - **Trader**: position limits, wealth and risk-adjusted reward accounting
//!
//! ## Step loop
//!
//! ```text
//!   ┌──────────────┐  place_order(&exchange)   ┌────────────────┐
//!   │ StockTrader  │ ────────────────────────► │ StockExchange  │
//!   │  (Learner)   │ ◄──────────────────────── │  execute: cost │
//!   └──────▲───────┘        cost               └───────┬────────┘
//!          │                                           │ advance_price
//!          │      on_price_update(old, new)            ▼
//!          └─────────────────────────────────── OuLogPrice::simulate
//! ```
//!
//! Every trader places its order before the price advances, and every
//! trader is notified before the next round of orders.

pub mod cost;
pub mod exchange;
pub mod stock;
pub mod trader;

// Re-export main types
pub use cost::CostModel;
pub use exchange::{ExchangeConfig, StockExchange};
pub use stock::{OuLogPrice, StockConfig};
pub use trader::{OrderFill, SharedTrader, StockTrader, TraderConfig};

// Re-export ports used in the public API
pub use qtrader_ports::{ConfigError, ConfigResult, PriceObserver, PriceProcess};
