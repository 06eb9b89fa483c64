use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::Price;

/// Largest price the simulation quotes. Keeps prices and holding-scaled
/// P&L well inside what a `Decimal` can represent.
pub const MAX_PRICE: f64 = 1e12;

/// Minimum price increment supported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickSize {
    /// 1
    One,
    /// 0.1
    Tenth,
    /// 0.01
    Hundredth,
}

impl TickSize {
    /// Map a configured tick value onto the supported set
    pub fn from_f64(tick: f64) -> Option<Self> {
        [Self::One, Self::Tenth, Self::Hundredth]
            .into_iter()
            .find(|candidate| candidate.as_f64() == tick)
    }

    /// Number of decimal places a price keeps at this tick
    pub fn decimals(&self) -> u32 {
        match self {
            Self::One => 0,
            Self::Tenth => 1,
            Self::Hundredth => 2,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::One => 1.0,
            Self::Tenth => 0.1,
            Self::Hundredth => 0.01,
        }
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(1, self.decimals())
    }

    /// Round a raw simulated price to this tick.
    ///
    /// Midpoints go to the even neighbour. Values a `Decimal` cannot hold
    /// (NaN, infinities) round to zero.
    pub fn round(&self, price: f64) -> Price {
        Decimal::from_f64(price)
            .map(|p| p.round_dp(self.decimals()))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for TickSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_f64_accepts_only_supported_ticks() {
        assert_eq!(TickSize::from_f64(1.0), Some(TickSize::One));
        assert_eq!(TickSize::from_f64(0.1), Some(TickSize::Tenth));
        assert_eq!(TickSize::from_f64(0.01), Some(TickSize::Hundredth));
        assert_eq!(TickSize::from_f64(0.5), None);
        assert_eq!(TickSize::from_f64(0.001), None);
        assert_eq!(TickSize::from_f64(f64::NAN), None);
    }

    #[test]
    fn test_round_to_tick() {
        assert_eq!(TickSize::One.round(50.7), dec!(51));
        assert_eq!(TickSize::Tenth.round(50.76), dec!(50.8));
        assert_eq!(TickSize::Hundredth.round(50.764), dec!(50.76));
    }

    #[test]
    fn test_midpoint_rounds_to_even() {
        assert_eq!(TickSize::One.round(50.5), dec!(50));
        assert_eq!(TickSize::One.round(51.5), dec!(52));
    }

    #[test]
    fn test_rounded_price_is_multiple_of_tick() {
        for tick in [TickSize::One, TickSize::Tenth, TickSize::Hundredth] {
            for raw in [0.004, 1.23456, 49.999, 75.5051, 1049.96] {
                let price = tick.round(raw);
                assert_eq!(price % tick.as_decimal(), Decimal::ZERO);
                // Rounding an already rounded price is a no-op
                assert_eq!(price.round_dp(tick.decimals()), price);
            }
        }
    }

    #[test]
    fn test_binary_midpoints_round_on_decimal_digits() {
        // 2.675 is stored just below the midpoint but converts to 2.675
        assert_eq!(TickSize::Hundredth.round(2.675), dec!(2.68));
        assert_eq!(TickSize::Hundredth.round(0.125), dec!(0.12));
        assert_eq!(TickSize::Tenth.round(0.25), dec!(0.2));
    }

    #[test]
    fn test_largest_price_rounds_exactly() {
        assert_eq!(TickSize::One.round(MAX_PRICE), dec!(1_000_000_000_000));
    }

    #[test]
    fn test_non_finite_rounds_to_zero() {
        assert_eq!(TickSize::One.round(f64::NAN), Decimal::ZERO);
    }
}
