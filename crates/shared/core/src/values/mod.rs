mod state;
mod tick;

use rust_decimal::Decimal;

pub use state::State;
pub use tick::{MAX_PRICE, TickSize};

/// Quoted price, always rounded to the exchange tick
pub type Price = Decimal;

/// Signed number of shares held (positive = long, negative = short)
pub type Holding = i64;

/// Signed order size chosen by a learner (positive = buy, negative = sell)
pub type Action = i64;
