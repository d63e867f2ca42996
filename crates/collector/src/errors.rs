//! Error types for threshold collection.

use alloy_primitives::{Address, U256};
use msig_codec::AggregateCodecError;
use msig_crypto::SignerError;
use msig_primitives::GasField;
use thiserror::Error;

use crate::RoundPhase;

/// Errors raised by the collector, the submission assembler or owner-set validation.
///
/// A failed operation never changes the collector's state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectorError {
    /// Signer is not part of the owner set.
    #[error("signer {0} is not an owner")]
    UnknownSigner(Address),

    /// Signer already contributed to this round.
    #[error("signer {0} already signed")]
    DuplicateSigner(Address),

    /// Round does not hold enough signatures to be finalized.
    #[error("threshold not met: provided {provided}, required {required}")]
    ThresholdNotMet { provided: usize, required: usize },

    /// Operation is not allowed in the current phase.
    #[error("cannot {operation} in phase {phase}")]
    InvalidState {
        phase: RoundPhase,
        operation: &'static str,
    },

    /// Actual gas exceeds the bound an upper-limit signer committed to.
    #[error("{field} {actual} exceeds signed upper bound {bound}")]
    GasBoundExceeded {
        field: GasField,
        actual: U256,
        bound: U256,
    },

    /// An actual-mode EOA signature was received before the final gas values are known.
    #[error("actual gas values are required to recover an actual-mode signer")]
    ActualGasUnknown,

    /// Owner set is empty.
    #[error("owner set is empty")]
    EmptyOwners,

    /// Owner listed more than once.
    #[error("duplicate owner: {0}")]
    DuplicateOwner(Address),

    /// Threshold exceeds the number of owners.
    #[error("invalid threshold: {threshold} exceeds total owners {owners}")]
    InvalidThreshold { threshold: u8, owners: usize },

    #[error("codec: {0}")]
    Codec(#[from] AggregateCodecError),

    #[error("recovery: {0}")]
    Recovery(#[from] SignerError),
}
