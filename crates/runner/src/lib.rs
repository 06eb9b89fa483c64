//! qtrader Runner - Training and test episodes for learning traders
//!
//! Wires the engines together from a JSON configuration:
//!
//! - **Config**: simulation, stock, exchange and per-trader learner settings
//! - **Bootstrap**: builds the exchange and registers one trader per configured entry
//! - **Environment**: runs episodes of N steps over all traders
//! - **Report**: final wealth and wealth paths per trader
//!
//! ## Architecture
//!
//! ```text
//!   SimulationConfig ──► bootstrap::build ──► TradingEnvironment
//!                                                  │ run(steps, report)
//!                                                  ▼
//!              ┌─────────────────────────────────────────────────┐
//!              │ per step:  trader.place_order(&exchange)  (xN)  │
//!              │            exchange.advance_price()             │
//!              └─────────────────────────────────────────────────┘
//!                                                  │
//!                                                  ▼
//!                                            EpisodeReport
//! ```

pub mod bootstrap;
pub mod config;
pub mod environment;
pub mod error;
pub mod report;

// Re-export main types
pub use bootstrap::build;
pub use config::{LearnerKind, LearnerSpec, SimulationConfig, TraderSpec};
pub use environment::TradingEnvironment;
pub use error::{RunnerError, RunnerResult};
pub use report::EpisodeReport;
