use msig_primitives::GasField;
use thiserror::Error;

/// Errors produced while deriving a gas upper bound.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GasEstimateError {
    /// Multiplier is not a finite value greater than 1.0.
    #[error("invalid gas multiplier {0}: must be finite and greater than 1.0")]
    InvalidMultiplier(f64),

    /// Scaled value does not fit in 256 bits.
    #[error("gas bound for {field} overflows 256 bits")]
    Overflow { field: GasField },
}
