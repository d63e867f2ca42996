//! Gas triple committed to by upper-limit signers.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Size of one big-endian gas word on the wire.
const WORD_LEN: usize = 32;

/// Identifies one field of a [`GasTriple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GasField {
    PreVerificationGas,
    MaxFeePerGas,
    MaxPriorityFeePerGas,
}

impl fmt::Display for GasField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreVerificationGas => f.write_str("preVerificationGas"),
            Self::MaxFeePerGas => f.write_str("maxFeePerGas"),
            Self::MaxPriorityFeePerGas => f.write_str("maxPriorityFeePerGas"),
        }
    }
}

/// The three gas-related fields of a user operation that may be unknown at signing time.
///
/// Used both for the conservative upper bound embedded in proposals and for the
/// operation's actual final values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasTriple {
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

impl GasTriple {
    /// Encoded length: three 32-byte big-endian words.
    pub const ENCODED_LEN: usize = 3 * WORD_LEN;

    pub fn new(
        pre_verification_gas: U256,
        max_fee_per_gas: U256,
        max_priority_fee_per_gas: U256,
    ) -> Self {
        Self {
            pre_verification_gas,
            max_fee_per_gas,
            max_priority_fee_per_gas,
        }
    }

    /// Returns the fields in wire order.
    pub fn fields(&self) -> [(GasField, U256); 3] {
        [
            (GasField::PreVerificationGas, self.pre_verification_gas),
            (GasField::MaxFeePerGas, self.max_fee_per_gas),
            (GasField::MaxPriorityFeePerGas, self.max_priority_fee_per_gas),
        ]
    }

    /// Encodes as `pvg || maxFeePerGas || maxPriorityFeePerGas`, each a 32-byte word.
    pub fn to_be_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        for (chunk, (_, value)) in out.chunks_exact_mut(WORD_LEN).zip(self.fields()) {
            chunk.copy_from_slice(&value.to_be_bytes::<WORD_LEN>());
        }
        out
    }

    /// Decodes from exactly [`Self::ENCODED_LEN`] bytes, returning `None` on any other length.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return None;
        }
        let word = |i: usize| U256::from_be_slice(&bytes[i * WORD_LEN..(i + 1) * WORD_LEN]);
        Some(Self::new(word(0), word(1), word(2)))
    }

    /// Returns the first field (in wire order) where `self` exceeds `bound`.
    pub fn first_exceeding(&self, bound: &GasTriple) -> Option<GasField> {
        self.fields()
            .into_iter()
            .zip(bound.fields())
            .find(|((_, actual), (_, limit))| actual > limit)
            .map(|((field, _), _)| field)
    }

    /// Checks that every field is less than or equal to the corresponding field of `bound`.
    pub fn is_within(&self, bound: &GasTriple) -> bool {
        self.first_exceeding(bound).is_none()
    }

    /// Returns the value of a single field.
    pub fn get(&self, field: GasField) -> U256 {
        match field {
            GasField::PreVerificationGas => self.pre_verification_gas,
            GasField::MaxFeePerGas => self.max_fee_per_gas,
            GasField::MaxPriorityFeePerGas => self.max_priority_fee_per_gas,
        }
    }
}
