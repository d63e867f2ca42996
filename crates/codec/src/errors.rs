//! Error types for aggregate encoding and decoding.

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::AggregateShape;

/// Errors that can occur while encoding or decoding an aggregated signature blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateCodecError {
    /// Blob is shorter than the prefix plus the expected slots.
    #[error("truncated blob: need at least {required} bytes, have {actual}")]
    TruncatedBlob { required: usize, actual: usize },

    /// Contract slot offset points outside the contract-data region.
    #[error(
        "contract signature offset {offset} in slot {slot} outside data region [{region_start}, {region_end})"
    )]
    MalformedContractOffset {
        slot: usize,
        offset: U256,
        region_start: usize,
        region_end: usize,
    },

    /// Contract signature length runs past the end of the blob.
    #[error("contract signature length {length} in slot {slot} exceeds available {available} bytes")]
    MalformedContractLength {
        slot: usize,
        length: U256,
        available: usize,
    },

    /// Trailing slot byte is neither a contract marker nor an EOA recovery byte.
    #[error("invalid marker byte {marker:#04x} in slot {slot}")]
    InvalidSlotMarker { slot: usize, marker: u8 },

    /// Contract slot signer word has non-zero padding.
    #[error("contract signer in slot {slot} has non-zero padding")]
    InvalidSignerPadding { slot: usize },

    /// Wrong number of signatures for the requested blob shape.
    #[error("{shape:?} aggregate for threshold {threshold} cannot hold {provided} signatures")]
    SignatureCountMismatch {
        shape: AggregateShape,
        provided: usize,
        threshold: usize,
    },

    /// Threshold of zero cannot describe any aggregate.
    #[error("threshold must be at least 1")]
    ZeroThreshold,

    /// The same signer appears more than once.
    #[error("duplicate signer: {0}")]
    DuplicateSigner(Address),

    /// EOA signature does not have the `r || s || v` length.
    #[error("EOA signature from {signer} has length {len}, expected 65")]
    InvalidEoaSignatureLength { signer: Address, len: usize },

    /// EOA `v` byte is not a recognized recovery value.
    #[error("EOA signature from {signer} has invalid recovery byte {v}")]
    InvalidRecoveryByte { signer: Address, v: u8 },
}
