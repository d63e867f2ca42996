//! Fixed-point gas buffer multiplier.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::GasEstimateError;

/// Number of fixed-point units per `1.0`.
pub const MULTIPLIER_PRECISION: u64 = 10_000;

/// A buffer multiplier strictly greater than `1.0`, stored with four decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Multiplier {
    scaled: u64,
}

impl Multiplier {
    /// The default buffer of `1.5`.
    pub const DEFAULT: Self = Self { scaled: 15_000 };

    /// Creates a multiplier from a decimal value.
    ///
    /// The value is rounded to four decimal places and must remain above `1.0` afterwards.
    pub fn try_new(value: f64) -> Result<Self, GasEstimateError> {
        if !value.is_finite() || value <= 1.0 || value > (u64::MAX / MULTIPLIER_PRECISION) as f64
        {
            return Err(GasEstimateError::InvalidMultiplier(value));
        }
        Self::from_scaled((value * MULTIPLIER_PRECISION as f64).round() as u64)
            .ok_or(GasEstimateError::InvalidMultiplier(value))
    }

    /// Creates a multiplier from its fixed-point representation, e.g. `12_500` for `1.25`.
    pub fn from_scaled(scaled: u64) -> Option<Self> {
        (scaled > MULTIPLIER_PRECISION).then_some(Self { scaled })
    }

    pub fn scaled(&self) -> u64 {
        self.scaled
    }

    pub fn as_f64(&self) -> f64 {
        self.scaled as f64 / MULTIPLIER_PRECISION as f64
    }

    /// Multiplies `value`, rounding up. Returns `None` on overflow.
    pub fn apply(&self, value: U256) -> Option<U256> {
        let product = value.checked_mul(U256::from(self.scaled))?;
        let (quotient, remainder) = product.div_rem(U256::from(MULTIPLIER_PRECISION));
        if remainder.is_zero() {
            Some(quotient)
        } else {
            quotient.checked_add(U256::from(1))
        }
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = GasEstimateError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Multiplier> for f64 {
    fn from(value: Multiplier) -> Self {
        value.as_f64()
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}
