use qtrader_core::Price;

/// Port for the stochastic price of the single listed stock
///
/// Implementations own their random source, so a seeded process replays
/// the same path.
pub trait PriceProcess {
    /// Advance one discrete time step and return the new (unrounded) price
    fn simulate(&mut self) -> f64;

    /// Current (unrounded) price
    fn price(&self) -> f64;

    /// Get the process name for logging
    fn name(&self) -> &str {
        "PriceProcess"
    }
}

/// Port for participants the exchange notifies
///
/// The exchange calls these in a single-threaded step loop: every
/// participant receives the notification before the next step starts.
pub trait PriceObserver {
    /// A new price has been quoted. Both prices are rounded to the tick.
    fn on_price_update(&mut self, old_price: Price, new_price: Price);

    /// A new episode starts at the given (rounded) price
    fn on_episode_reset(&mut self, price: Price);

    /// Identifier used in logs
    fn observer_name(&self) -> &str;
}
