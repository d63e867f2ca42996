//! Upper-bound gas estimation for threshold signing rounds.
//!
//! Signers that sign before the final gas values are known commit to a buffered copy of the
//! operation's current estimates. The on-chain verifier later checks the actual values against
//! this bound.

mod errors;
mod multiplier;

pub use errors::GasEstimateError;
use msig_primitives::{GasField, GasTriple};
pub use multiplier::{Multiplier, MULTIPLIER_PRECISION};
use serde::{Deserialize, Serialize};

/// Per-field buffer multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GasMultipliers {
    #[serde(default)]
    pub pre_verification_gas: Multiplier,
    #[serde(default)]
    pub max_fee_per_gas: Multiplier,
    #[serde(default)]
    pub max_priority_fee_per_gas: Multiplier,
}

impl GasMultipliers {
    /// Applies the same multiplier to every field.
    pub fn uniform(multiplier: Multiplier) -> Self {
        Self {
            pre_verification_gas: multiplier,
            max_fee_per_gas: multiplier,
            max_priority_fee_per_gas: multiplier,
        }
    }

    pub fn get(&self, field: GasField) -> Multiplier {
        match field {
            GasField::PreVerificationGas => self.pre_verification_gas,
            GasField::MaxFeePerGas => self.max_fee_per_gas,
            GasField::MaxPriorityFeePerGas => self.max_priority_fee_per_gas,
        }
    }
}

/// Derives the upper-bound gas triple embedded in proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GasBoundEstimator {
    multipliers: GasMultipliers,
}

impl GasBoundEstimator {
    pub fn new(multipliers: GasMultipliers) -> Self {
        Self { multipliers }
    }

    pub fn uniform(multiplier: Multiplier) -> Self {
        Self::new(GasMultipliers::uniform(multiplier))
    }

    pub fn multipliers(&self) -> &GasMultipliers {
        &self.multipliers
    }

    /// Multiplies each field of `current` by its multiplier, rounding up.
    pub fn estimate(&self, current: &GasTriple) -> Result<GasTriple, GasEstimateError> {
        let scale = |field: GasField| {
            self.multipliers
                .get(field)
                .apply(current.get(field))
                .ok_or(GasEstimateError::Overflow { field })
        };

        Ok(GasTriple::new(
            scale(GasField::PreVerificationGas)?,
            scale(GasField::MaxFeePerGas)?,
            scale(GasField::MaxPriorityFeePerGas)?,
        ))
    }
}
