//! qtrader Core Domain
//!
//! Pure domain values shared by the learning engine and the exchange.
//! This crate contains no randomness, no I/O, and is 100% unit testable.

pub mod values;

// Re-export commonly used types at crate root
pub use values::{Action, Holding, MAX_PRICE, Price, State, TickSize};
