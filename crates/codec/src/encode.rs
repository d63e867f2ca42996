//! Aggregate encoding.

use alloy_primitives::{bytes::BufMut, U256};
use msig_primitives::{GasTriple, Signature, SignerKind, EOA_SIGNATURE_LEN};

use crate::{AggregateCodecError, AggregateShape, SLOT_LEN, WORD_LEN};

/// Selects which aggregate [`encode`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMode {
    /// Intermediate blob carrying the upper-bound gas triple and at most `threshold - 1`
    /// signatures.
    Proposal(GasTriple),
    /// Submission blob with exactly `threshold` signatures.
    Final,
}

impl AggregateMode {
    /// Blob shape this mode encodes to.
    pub fn shape(&self) -> AggregateShape {
        match self {
            Self::Proposal(_) => AggregateShape::Proposal,
            Self::Final => AggregateShape::Final,
        }
    }
}

/// Encodes a set of signatures into an aggregated blob.
///
/// Signatures are sorted by signer address (as an unsigned big-endian integer) before
/// encoding, so the output only depends on the set of signatures and never on their input
/// order. The verifier replays the same ordering.
///
/// # Errors
///
/// - `ZeroThreshold` / `SignatureCountMismatch`: the number of signatures does not fit the shape
/// - `DuplicateSigner`: two signatures share a signer
/// - `InvalidEoaSignatureLength` / `InvalidRecoveryByte`: an EOA signature is malformed
pub fn encode(
    signatures: &[Signature],
    mode: &AggregateMode,
    threshold: usize,
) -> Result<Vec<u8>, AggregateCodecError> {
    check_signature_count(signatures.len(), mode.shape(), threshold)?;
    for sig in signatures {
        validate_signature(sig)?;
    }

    let mut sorted: Vec<&Signature> = signatures.iter().collect();
    sorted.sort_unstable_by_key(|sig| sig.signer());
    if let Some(pair) = sorted.windows(2).find(|w| w[0].signer() == w[1].signer()) {
        return Err(AggregateCodecError::DuplicateSigner(pair[0].signer()));
    }

    let slot_region_len = SLOT_LEN * sorted.len();
    let mut slots = Vec::with_capacity(slot_region_len);
    let mut contract_data = Vec::new();

    for sig in sorted {
        match sig.kind() {
            SignerKind::Eoa => put_eoa_slot(&mut slots, sig)?,
            SignerKind::Contract => {
                // Offsets are relative to the start of the slot region.
                let cursor = slot_region_len + contract_data.len();
                put_contract_slot(&mut slots, sig, cursor);
                put_contract_block(&mut contract_data, sig);
            }
        }
    }

    let prefix_len = mode.shape().prefix_len();
    let mut out = Vec::with_capacity(prefix_len + slots.len() + contract_data.len());
    if let AggregateMode::Proposal(gas_bound) = mode {
        out.put_slice(&gas_bound.to_be_bytes());
    }
    out.put_slice(&slots);
    out.put_slice(&contract_data);

    Ok(out)
}

/// Checks that a signature can be placed in a slot.
///
/// Contract signatures are always accepted. EOA signatures must be exactly 65 bytes with a `v`
/// byte of 0, 1, 27 or 28.
pub fn validate_signature(sig: &Signature) -> Result<(), AggregateCodecError> {
    if !sig.is_eoa() {
        return Ok(());
    }

    let bytes = sig.bytes();
    if bytes.len() != EOA_SIGNATURE_LEN {
        return Err(AggregateCodecError::InvalidEoaSignatureLength {
            signer: sig.signer(),
            len: bytes.len(),
        });
    }

    let v = bytes[EOA_SIGNATURE_LEN - 1];
    normalize_recovery_byte(v).ok_or(AggregateCodecError::InvalidRecoveryByte {
        signer: sig.signer(),
        v,
    })?;

    Ok(())
}

fn check_signature_count(
    provided: usize,
    shape: AggregateShape,
    threshold: usize,
) -> Result<(), AggregateCodecError> {
    if threshold == 0 {
        return Err(AggregateCodecError::ZeroThreshold);
    }

    let fits = match shape {
        AggregateShape::Proposal => provided < threshold,
        AggregateShape::Final => provided == threshold,
    };

    if !fits {
        return Err(AggregateCodecError::SignatureCountMismatch {
            shape,
            provided,
            threshold,
        });
    }

    Ok(())
}

/// Maps a raw recovery id onto the `27/28` range, leaving `27/28` untouched.
fn normalize_recovery_byte(v: u8) -> Option<u8> {
    match v {
        0 | 1 => Some(v + 27),
        27 | 28 => Some(v),
        _ => None,
    }
}

fn put_eoa_slot(out: &mut Vec<u8>, sig: &Signature) -> Result<(), AggregateCodecError> {
    let bytes = sig.bytes();
    let v = normalize_recovery_byte(bytes[EOA_SIGNATURE_LEN - 1]).ok_or(
        AggregateCodecError::InvalidRecoveryByte {
            signer: sig.signer(),
            v: bytes[EOA_SIGNATURE_LEN - 1],
        },
    )?;

    out.put_slice(&bytes[..EOA_SIGNATURE_LEN - 1]);
    out.put_u8(v + sig.mode().flag());
    Ok(())
}

fn put_contract_slot(out: &mut Vec<u8>, sig: &Signature, cursor: usize) {
    out.put_slice(sig.signer().into_word().as_slice());
    out.put_slice(&U256::from(cursor).to_be_bytes::<WORD_LEN>());
    out.put_u8(sig.mode().flag());
}

fn put_contract_block(out: &mut Vec<u8>, sig: &Signature) {
    let data = sig.bytes();
    out.put_slice(&U256::from(data.len()).to_be_bytes::<WORD_LEN>());
    out.put_slice(data);
}
