//! Aggregated signature blob format.
//!
//! A blob packs a sorted set of EOA and contract signatures into fixed 65-byte slots followed
//! by a trailing region holding the variable-length contract signatures:
//!
//! ```text
//! [pvg(32) || maxFeePerGas(32) || maxPriorityFeePerGas(32)]   proposals only
//! slot_0 || slot_1 || ... || slot_{n-1}                        65 bytes each, sorted by signer
//! [len(32) || bytes] ...                                      contract data, if any
//! ```
//!
//! EOA slots carry `r || s || v`. Contract slots carry the left-padded signer address, the
//! offset of the signer's data block (relative to the start of the slot region) and a marker
//! byte. The trailing byte of every slot doubles as the mode flag: [`SignatureMode::Actual`]
//! adds 32.
//!
//! The byte's residue modulo 32 is the kind discriminant: 0 for contract slots, 27 or 28 for
//! EOA slots. Encoding normalizes raw recovery ids (0/1) to 27/28 and rejects anything else, so
//! the two kinds can never collide on the wire.
//!
//! [`SignatureMode::Actual`]: msig_primitives::SignatureMode::Actual

mod decode;
mod encode;
mod errors;

#[cfg(test)]
mod test_utils;

pub use decode::{decode, decode_final, decode_proposal, DecodedAggregate, DecodedSlot};
pub use encode::{encode, validate_signature, AggregateMode};
pub use errors::AggregateCodecError;
use msig_primitives::GasTriple;

/// Size of one signature slot.
pub const SLOT_LEN: usize = 65;

/// Size of one ABI word.
pub const WORD_LEN: usize = 32;

/// Size of the upper-bound gas prefix carried by proposals.
pub const GAS_PREFIX_LEN: usize = GasTriple::ENCODED_LEN;

/// Offset of the marker byte inside a slot.
const MARKER_OFFSET: usize = SLOT_LEN - 1;

/// Number of padding bytes in front of an address in a 32-byte word.
const ADDRESS_PADDING: usize = WORD_LEN - 20;

/// Shape of a blob, which determines whether a gas prefix is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateShape {
    /// Intermediate blob passed between co-signers, carrying the gas upper bound.
    Proposal,
    /// Submission-ready blob with exactly `threshold` slots and no prefix.
    Final,
}

impl AggregateShape {
    /// Length of the fixed header preceding the slot region.
    pub fn prefix_len(self) -> usize {
        match self {
            Self::Proposal => GAS_PREFIX_LEN,
            Self::Final => 0,
        }
    }

    /// Minimum blob length for `slot_count` slots, or `None` if it does not fit in a `usize`.
    pub fn min_len(self, slot_count: usize) -> Option<usize> {
        SLOT_LEN
            .checked_mul(slot_count)?
            .checked_add(self.prefix_len())
    }
}
