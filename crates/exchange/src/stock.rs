//! Stock price process
//!
//! The log price follows a discretized Ornstein-Uhlenbeck process:
//!
//! ```text
//! dlogS = speed * (mean_log_price - logS) * dt + volatility * sqrt(dt) * N(0, 1)
//! ```
//!
//! and the resulting price is clamped into `[floor, ceiling]`.

use log::trace;
use qtrader_core::MAX_PRICE;
use qtrader_ports::{ConfigError, ConfigResult, PriceProcess};
use rand::prelude::*;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Configuration for the stock price process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    /// Initial price
    pub price: f64,
    /// Highest reachable price
    pub ceiling: f64,
    /// Lowest reachable price (>= 0)
    pub floor: f64,
    /// Mean-reversion speed (kappa)
    pub speed: f64,
    /// Long-run mean of the log price (mu)
    pub mean_log_price: f64,
    /// Volatility of the log price (sigma)
    pub volatility: f64,
    /// Length of one time step
    pub dt: f64,
    /// Random seed (for reproducibility)
    pub seed: Option<u64>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            price: 50.0,
            ceiling: 1050.0,
            floor: 0.0,
            speed: 0.1,
            mean_log_price: 75f64.ln(),
            volatility: 0.1,
            dt: 1.0,
            seed: None,
        }
    }
}

impl StockConfig {
    /// A process whose price never moves
    pub fn constant(price: f64) -> Self {
        Self {
            price,
            ceiling: price * 2.0,
            floor: 0.0,
            speed: 0.0,
            mean_log_price: price.ln(),
            volatility: 0.0,
            dt: 1.0,
            seed: Some(0),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let price = ConfigError::check_finite("price", self.price)?;
        let ceiling = ConfigError::check_finite("ceiling", self.ceiling)?;
        let floor = ConfigError::check_finite("floor", self.floor)?;
        if ceiling > MAX_PRICE {
            return Err(ConfigError::TooLarge {
                name: "ceiling",
                value: ceiling,
                max: MAX_PRICE,
            });
        }
        if !(floor >= 0.0 && floor < price && price < ceiling) {
            return Err(ConfigError::InvalidPriceBounds {
                price,
                floor,
                ceiling,
            });
        }
        ConfigError::check_finite("mean_log_price", self.mean_log_price)?;
        ConfigError::check_non_negative("speed", self.speed)?;
        ConfigError::check_non_negative("volatility", self.volatility)?;
        ConfigError::check_positive("dt", self.dt)?;
        Ok(())
    }
}

/// Stock whose log price is mean reverting
pub struct OuLogPrice {
    config: StockConfig,
    price: f64,
    rng: StdRng,
}

impl OuLogPrice {
    pub fn new(config: StockConfig) -> ConfigResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            price: config.price,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &StockConfig {
        &self.config
    }
}

impl PriceProcess for OuLogPrice {
    fn simulate(&mut self) -> f64 {
        // Zero is absorbing: the log is undefined
        if self.price == 0.0 {
            return 0.0;
        }

        let StockConfig {
            speed,
            mean_log_price,
            volatility,
            dt,
            floor,
            ceiling,
            ..
        } = self.config;

        let shock: f64 = self.rng.sample(StandardNormal);
        let dlog = speed * (mean_log_price - self.price.ln()) * dt + volatility * dt.sqrt() * shock;

        self.price = (self.price * dlog.exp()).clamp(floor, ceiling);
        trace!("Simulated price {:.6} (dlogS={:.6})", self.price, dlog);
        self.price
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn name(&self) -> &str {
        "OuLogPrice"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_validation() {
        let bad_bounds = StockConfig {
            price: 10.0,
            floor: 20.0,
            ..Default::default()
        };
        assert!(matches!(
            OuLogPrice::new(bad_bounds),
            Err(ConfigError::InvalidPriceBounds { .. })
        ));

        let at_ceiling = StockConfig {
            price: 1050.0,
            ..Default::default()
        };
        assert!(OuLogPrice::new(at_ceiling).is_err());

        let negative_floor = StockConfig {
            floor: -1.0,
            ..Default::default()
        };
        assert!(OuLogPrice::new(negative_floor).is_err());

        let negative_speed = StockConfig {
            speed: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            OuLogPrice::new(negative_speed),
            Err(ConfigError::Negative { name: "speed", .. })
        ));

        let negative_vol = StockConfig {
            volatility: -0.1,
            ..Default::default()
        };
        assert!(OuLogPrice::new(negative_vol).is_err());

        let nan_price = StockConfig {
            price: f64::NAN,
            ..Default::default()
        };
        assert!(OuLogPrice::new(nan_price).is_err());
    }

    #[test]
    fn test_ceiling_bounded_by_max_price() {
        let huge = StockConfig {
            price: 1e29,
            ceiling: 1e30,
            ..Default::default()
        };
        assert!(matches!(
            OuLogPrice::new(huge),
            Err(ConfigError::TooLarge { name: "ceiling", .. })
        ));

        let largest = StockConfig {
            price: MAX_PRICE / 2.0,
            ceiling: MAX_PRICE,
            ..Default::default()
        };
        assert!(OuLogPrice::new(largest).is_ok());
    }

    #[test]
    fn test_zero_price_is_absorbing() {
        let config = StockConfig {
            price: 10.0,
            floor: 0.0,
            ceiling: 20.0,
            speed: 1000.0,
            mean_log_price: -1000.0,
            volatility: 0.0,
            seed: Some(5),
            ..Default::default()
        };
        let mut stock = OuLogPrice::new(config).unwrap();

        // exp of a hugely negative step underflows to 0
        assert_eq!(stock.simulate(), 0.0);
        for _ in 0..10 {
            let price = stock.simulate();
            assert!(!price.is_nan());
            assert_eq!(price, 0.0);
        }
        assert_eq!(stock.price(), 0.0);
    }

    #[test]
    fn test_constant_process_never_moves() {
        let mut stock = OuLogPrice::new(StockConfig::constant(50.0)).unwrap();
        for _ in 0..100 {
            assert_eq!(stock.simulate(), 50.0);
        }
    }

    #[test]
    fn test_deterministic_drift_toward_mean() {
        let config = StockConfig {
            volatility: 0.0,
            seed: Some(1),
            ..Default::default()
        };
        let mut stock = OuLogPrice::new(config).unwrap();

        let first = stock.simulate();
        assert_relative_eq!(first, 50.0 * (0.1 * (75f64.ln() - 50f64.ln())).exp());

        let mut previous = first;
        for _ in 0..200 {
            let next = stock.simulate();
            assert!(next >= previous && next <= 75.0);
            previous = next;
        }
        assert_relative_eq!(previous, 75.0, epsilon = 1e-3);
    }

    #[test]
    fn test_price_stays_within_bounds() {
        let config = StockConfig {
            price: 10.0,
            floor: 5.0,
            ceiling: 20.0,
            volatility: 2.0,
            seed: Some(99),
            ..Default::default()
        };
        let mut stock = OuLogPrice::new(config).unwrap();

        let mut hit_floor = false;
        let mut hit_ceiling = false;
        for _ in 0..1000 {
            let price = stock.simulate();
            assert!((5.0..=20.0).contains(&price));
            hit_floor |= price == 5.0;
            hit_ceiling |= price == 20.0;
        }
        assert!(hit_floor && hit_ceiling);
    }

    #[test]
    fn test_seeded_paths_repeat() {
        let config = StockConfig {
            seed: Some(42),
            ..Default::default()
        };
        let mut a = OuLogPrice::new(config.clone()).unwrap();
        let mut b = OuLogPrice::new(config).unwrap();

        for _ in 0..50 {
            assert_eq!(a.simulate(), b.simulate());
        }
    }
}
