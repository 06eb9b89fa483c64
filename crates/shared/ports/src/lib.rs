//! qtrader Ports
//!
//! Port definitions (traits) for the qtrader market simulation.
//! These define the seams between the exchange, the traders and the
//! learning engine, so each side can be swapped or spied on in tests.

mod error;
mod market;
mod value;

pub use error::{ConfigError, ConfigResult};
pub use market::{PriceObserver, PriceProcess};
pub use value::{Regressor, ValueStore};
