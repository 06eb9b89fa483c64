use thiserror::Error;

/// Construction-time configuration errors.
///
/// Raised eagerly by every constructor; an `Err` means the object was never
/// built, so there is no partially configured component to recover.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid price bounds: require {floor} <= floor < price {price} < ceiling {ceiling}")]
    InvalidPriceBounds { price: f64, floor: f64, ceiling: f64 },

    #[error("Parameter {name} must not exceed {max}, got {value}")]
    TooLarge {
        name: &'static str,
        value: f64,
        max: f64,
    },

    #[error("Parameter {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Parameter {name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("Parameter {name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("Parameter {name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("Unsupported tick size {0}: expected one of 1, 0.1, 0.01")]
    UnsupportedTick(f64),

    #[error("Action set must not be empty")]
    EmptyActionSet,

    #[error("Action {0} appears more than once in the action set")]
    DuplicateAction(i64),

    #[error("Invalid estimator configuration: {0}")]
    InvalidEstimator(String),

    #[error("Trader name {0:?} is already in use")]
    DuplicateTrader(String),
}

impl ConfigError {
    /// Reject NaN and infinities
    pub fn check_finite(name: &'static str, value: f64) -> ConfigResult<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { name, value })
        }
    }

    pub fn check_non_negative(name: &'static str, value: f64) -> ConfigResult<f64> {
        let value = Self::check_finite(name, value)?;
        if value < 0.0 {
            return Err(Self::Negative { name, value });
        }
        Ok(value)
    }

    pub fn check_positive(name: &'static str, value: f64) -> ConfigResult<f64> {
        let value = Self::check_finite(name, value)?;
        if value <= 0.0 {
            return Err(Self::NotPositive { name, value });
        }
        Ok(value)
    }

    pub fn check_unit_range(name: &'static str, value: f64) -> ConfigResult<f64> {
        let value = Self::check_finite(name, value)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(Self::OutOfUnitRange { name, value });
        }
        Ok(value)
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
