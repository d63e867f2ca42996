//! Aggregate decoding.

use alloy_primitives::{Address, Bytes, U256};
use msig_primitives::{
    EoaSignatureBytes, GasTriple, Signature, SignatureMode, SignerKind, EOA_SIGNATURE_LEN,
};
use serde::Serialize;

use crate::{
    AggregateCodecError, AggregateShape, ADDRESS_PADDING, GAS_PREFIX_LEN, MARKER_OFFSET, SLOT_LEN,
    WORD_LEN,
};

/// One slot recovered from a blob.
///
/// EOA slots do not carry the signer's address; it has to be recovered from the signature
/// against the digest matching the slot's mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecodedSlot {
    /// Externally owned account slot.
    Eoa {
        /// Gas values the signature was made over.
        mode: SignatureMode,
        /// `r || s || v` with the mode flag stripped from `v`.
        signature: EoaSignatureBytes,
    },
    /// Smart contract signer slot pointing into the contract-data region.
    Contract {
        /// Gas values the signature was made over.
        mode: SignatureMode,
        /// Signer address read from the padded slot word.
        signer: Address,
        /// Signature bytes read from the referenced block.
        signature: Bytes,
    },
}

impl DecodedSlot {
    /// Signature mode encoded in the slot marker.
    pub fn mode(&self) -> SignatureMode {
        match self {
            Self::Eoa { mode, .. } | Self::Contract { mode, .. } => *mode,
        }
    }

    /// Kind of signer the slot was written for.
    pub fn kind(&self) -> SignerKind {
        match self {
            Self::Eoa { .. } => SignerKind::Eoa,
            Self::Contract { .. } => SignerKind::Contract,
        }
    }

    /// Signer address if it is stored on the wire (contract slots only).
    pub fn known_signer(&self) -> Option<Address> {
        match self {
            Self::Eoa { .. } => None,
            Self::Contract { signer, .. } => Some(*signer),
        }
    }

    /// Converts into a [`Signature`], resolving EOA signers with `recover`.
    pub fn into_signature<E>(
        self,
        recover: impl FnOnce(&EoaSignatureBytes, SignatureMode) -> Result<Address, E>,
    ) -> Result<Signature, E> {
        match self {
            Self::Eoa { mode, signature } => {
                let signer = recover(&signature, mode)?;
                Ok(Signature::eoa(signer, mode, signature))
            }
            Self::Contract {
                mode,
                signer,
                signature,
            } => Ok(Signature::contract(signer, mode, signature)),
        }
    }
}

/// Contents of a decoded blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedAggregate {
    gas_bound: Option<GasTriple>,
    slots: Vec<DecodedSlot>,
}

impl DecodedAggregate {
    /// Upper-bound gas triple, present for proposals only.
    pub fn gas_bound(&self) -> Option<&GasTriple> {
        self.gas_bound.as_ref()
    }

    /// Slots in wire order, which is ascending signer order.
    pub fn slots(&self) -> &[DecodedSlot] {
        &self.slots
    }

    /// Number of decoded slots.
    pub fn signature_count(&self) -> usize {
        self.slots.len()
    }

    /// Splits into the optional gas bound and the slots.
    pub fn into_parts(self) -> (Option<GasTriple>, Vec<DecodedSlot>) {
        (self.gas_bound, self.slots)
    }
}

/// Decodes a blob of the given shape holding `expected_slot_count` slots.
///
/// Any bytes after the last referenced contract block are ignored.
pub fn decode(
    blob: &[u8],
    shape: AggregateShape,
    expected_slot_count: usize,
) -> Result<DecodedAggregate, AggregateCodecError> {
    match shape {
        AggregateShape::Proposal => {
            decode_proposal(blob, expected_slot_count).map(|(gas_bound, slots)| DecodedAggregate {
                gas_bound: Some(gas_bound),
                slots,
            })
        }
        AggregateShape::Final => {
            decode_final(blob, expected_slot_count).map(|slots| DecodedAggregate {
                gas_bound: None,
                slots,
            })
        }
    }
}

/// Decodes a proposal blob into its upper-bound gas triple and slots.
pub fn decode_proposal(
    blob: &[u8],
    slot_count: usize,
) -> Result<(GasTriple, Vec<DecodedSlot>), AggregateCodecError> {
    let required = ensure_len(blob, AggregateShape::Proposal, slot_count)?;
    let (prefix, body) = blob.split_at(GAS_PREFIX_LEN);
    let gas_bound =
        GasTriple::from_be_slice(prefix).ok_or(AggregateCodecError::TruncatedBlob {
            required,
            actual: blob.len(),
        })?;
    Ok((gas_bound, decode_slots(body, slot_count)?))
}

/// Decodes a final (prefix-less) blob into its slots.
pub fn decode_final(
    blob: &[u8],
    slot_count: usize,
) -> Result<Vec<DecodedSlot>, AggregateCodecError> {
    ensure_len(blob, AggregateShape::Final, slot_count)?;
    decode_slots(blob, slot_count)
}

fn ensure_len(
    blob: &[u8],
    shape: AggregateShape,
    slot_count: usize,
) -> Result<usize, AggregateCodecError> {
    // A count too large to address can never be satisfied by a real blob.
    let required = shape.min_len(slot_count).unwrap_or(usize::MAX);
    if blob.len() < required {
        return Err(AggregateCodecError::TruncatedBlob {
            required,
            actual: blob.len(),
        });
    }
    Ok(required)
}

/// Decodes `slot_count` slots from `body`, which starts at the slot region.
///
/// Callers check the blob length first.
fn decode_slots(body: &[u8], slot_count: usize) -> Result<Vec<DecodedSlot>, AggregateCodecError> {
    let slot_region_len = SLOT_LEN * slot_count;
    body[..slot_region_len]
        .chunks_exact(SLOT_LEN)
        .enumerate()
        .map(|(index, slot)| decode_slot(index, slot, body, slot_region_len))
        .collect()
}

fn decode_slot(
    index: usize,
    slot: &[u8],
    body: &[u8],
    slot_region_len: usize,
) -> Result<DecodedSlot, AggregateCodecError> {
    let marker = slot[MARKER_OFFSET];
    let invalid_marker = AggregateCodecError::InvalidSlotMarker {
        slot: index,
        marker,
    };

    if marker >= 2 * SignatureMode::ACTUAL_FLAG {
        return Err(invalid_marker);
    }
    let mode = if marker >= SignatureMode::ACTUAL_FLAG {
        SignatureMode::Actual
    } else {
        SignatureMode::UpperLimit
    };

    match marker % SignatureMode::ACTUAL_FLAG {
        0 => decode_contract_slot(index, slot, body, slot_region_len, mode),
        v @ (27 | 28) => {
            let mut signature = [0u8; EOA_SIGNATURE_LEN];
            signature[..MARKER_OFFSET].copy_from_slice(&slot[..MARKER_OFFSET]);
            signature[MARKER_OFFSET] = v;
            Ok(DecodedSlot::Eoa {
                mode,
                signature: signature.into(),
            })
        }
        _ => Err(invalid_marker),
    }
}

fn decode_contract_slot(
    index: usize,
    slot: &[u8],
    body: &[u8],
    slot_region_len: usize,
    mode: SignatureMode,
) -> Result<DecodedSlot, AggregateCodecError> {
    let (signer_word, rest) = slot.split_at(WORD_LEN);
    if signer_word[..ADDRESS_PADDING].iter().any(|b| *b != 0) {
        return Err(AggregateCodecError::InvalidSignerPadding { slot: index });
    }
    let signer = Address::from_slice(&signer_word[ADDRESS_PADDING..]);

    // The offset must address a length word inside the contract-data region.
    let offset_word = &rest[..WORD_LEN];
    let offset = word_to_usize(offset_word)
        .filter(|offset| *offset >= slot_region_len)
        .filter(|offset| {
            offset
                .checked_add(WORD_LEN)
                .is_some_and(|end| end <= body.len())
        })
        .ok_or_else(|| AggregateCodecError::MalformedContractOffset {
            slot: index,
            offset: U256::from_be_slice(offset_word),
            region_start: slot_region_len,
            region_end: body.len(),
        })?;

    let data_start = offset + WORD_LEN;
    let length_word = &body[offset..data_start];
    let available = body.len() - data_start;
    let length = word_to_usize(length_word)
        .filter(|length| *length <= available)
        .ok_or_else(|| AggregateCodecError::MalformedContractLength {
            slot: index,
            length: U256::from_be_slice(length_word),
            available,
        })?;

    Ok(DecodedSlot::Contract {
        mode,
        signer,
        signature: Bytes::copy_from_slice(&body[data_start..data_start + length]),
    })
}

/// Reads a 32-byte big-endian word as a `usize`, failing if it does not fit.
fn word_to_usize(word: &[u8]) -> Option<usize> {
    let (high, low) = word.split_at(WORD_LEN - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(buf)).ok()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{encode, test_utils::*, AggregateMode};

    #[test]
    fn test_decode_single_eoa_proposal() {
        let b = addr(0xb);
        let sig = eoa_sig(b, SignatureMode::UpperLimit, 27);
        let blob = encode(&[sig.clone()], &AggregateMode::Proposal(gas_bound()), 2).unwrap();

        let decoded = decode(&blob, AggregateShape::Proposal, 1).unwrap();

        assert_eq!(decoded.gas_bound(), Some(&gas_bound()));
        assert_eq!(decoded.signature_count(), 1);
        let slot = &decoded.slots()[0];
        assert_eq!(slot.kind(), SignerKind::Eoa);
        assert_eq!(slot.mode(), SignatureMode::UpperLimit);

        let resolved = slot
            .clone()
            .into_signature(|_, _| Ok::<_, ()>(b))
            .unwrap();
        assert_eq!(resolved, sig);
    }

    #[test]
    fn test_decode_reports_actual_mode() {
        let sigs = vec![
            eoa_sig(addr(0xa), SignatureMode::Actual, 27),
            eoa_sig(addr(0xc), SignatureMode::UpperLimit, 28),
        ];
        let blob = encode(&sigs, &AggregateMode::Final, 2).unwrap();

        let slots = decode_final(&blob, 2).unwrap();

        assert_eq!(slots[0].mode(), SignatureMode::Actual);
        assert_eq!(slots[1].mode(), SignatureMode::UpperLimit);
        match &slots[0] {
            DecodedSlot::Eoa { signature, .. } => assert_eq!(signature[64], 27),
            other => panic!("expected EOA slot, got {other:?}"),
        }
    }

    #[test]
    fn test_actual_contract_slot_not_mistaken_for_eoa() {
        let signer = addr(0x33);
        let sig = contract_sig(signer, SignatureMode::Actual, &[9, 8, 7]);
        let blob = encode(&[sig], &AggregateMode::Final, 1).unwrap();

        let slots = decode_final(&blob, 1).unwrap();

        assert_eq!(
            slots[0],
            DecodedSlot::Contract {
                mode: SignatureMode::Actual,
                signer,
                signature: Bytes::from_static(&[9, 8, 7]),
            }
        );
    }

    #[test]
    fn test_decode_mixed_proposal_with_contract_data() {
        let sigs = vec![
            contract_sig(addr(5), SignatureMode::UpperLimit, &[0x55; 40]),
            eoa_sig(addr(3), SignatureMode::Actual, 28),
            contract_sig(addr(1), SignatureMode::Actual, &[0x11; 7]),
        ];
        let blob = encode(&sigs, &AggregateMode::Proposal(gas_bound()), 4).unwrap();

        let (bound, slots) = decode_proposal(&blob, 3).unwrap();

        assert_eq!(bound, gas_bound());
        assert_eq!(slots[0].known_signer(), Some(addr(1)));
        assert_eq!(slots[1].known_signer(), None);
        assert_eq!(slots[2].known_signer(), Some(addr(5)));
        match &slots[2] {
            DecodedSlot::Contract { signature, .. } => {
                assert_eq!(signature.as_ref(), &[0x55; 40])
            }
            other => panic!("expected contract slot, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_blob() {
        let blob = vec![0u8; 96 + 64];
        assert_eq!(
            decode(&blob, AggregateShape::Proposal, 1),
            Err(AggregateCodecError::TruncatedBlob {
                required: 161,
                actual: 160
            })
        );
        assert_eq!(
            decode(&[0u8; 129], AggregateShape::Final, 2),
            Err(AggregateCodecError::TruncatedBlob {
                required: 130,
                actual: 129
            })
        );
    }

    #[test]
    fn test_oversized_slot_count_is_truncated() {
        let count = usize::MAX / SLOT_LEN + 2;
        for shape in [AggregateShape::Final, AggregateShape::Proposal] {
            assert_eq!(shape.min_len(count), None);
            assert_eq!(
                decode(&[0u8; 200], shape, count),
                Err(AggregateCodecError::TruncatedBlob {
                    required: usize::MAX,
                    actual: 200
                })
            );
        }

        // Fits in a usize only without the gas prefix.
        let count = usize::MAX / SLOT_LEN;
        assert!(AggregateShape::Final.min_len(count).is_some());
        assert_eq!(AggregateShape::Proposal.min_len(count), None);
        assert!(decode_final(&[0u8; 200], count).is_err());
    }

    #[test]
    fn test_offset_into_slot_region_rejected() {
        let sig = contract_sig(addr(1), SignatureMode::UpperLimit, &[1, 2, 3]);
        let mut blob = encode(&[sig], &AggregateMode::Final, 1).unwrap();
        // Point the offset at the slot itself.
        blob[32..64].copy_from_slice(&U256::ZERO.to_be_bytes::<32>());

        assert!(matches!(
            decode_final(&blob, 1),
            Err(AggregateCodecError::MalformedContractOffset { slot: 0, .. })
        ));
    }

    #[test]
    fn test_offset_past_end_rejected() {
        let sig = contract_sig(addr(1), SignatureMode::UpperLimit, &[1, 2, 3]);
        let mut blob = encode(&[sig], &AggregateMode::Final, 1).unwrap();
        blob[32..64].copy_from_slice(&U256::from(10_000).to_be_bytes::<32>());

        assert!(matches!(
            decode_final(&blob, 1),
            Err(AggregateCodecError::MalformedContractOffset { region_start: 65, .. })
        ));
    }

    #[test]
    fn test_length_past_end_rejected() {
        let sig = contract_sig(addr(1), SignatureMode::UpperLimit, &[1, 2, 3]);
        let mut blob = encode(&[sig], &AggregateMode::Final, 1).unwrap();
        blob.truncate(blob.len() - 1);

        assert_eq!(
            decode_final(&blob, 1),
            Err(AggregateCodecError::MalformedContractLength {
                slot: 0,
                length: U256::from(3),
                available: 2,
            })
        );
    }

    #[test]
    fn test_invalid_marker_rejected() {
        let sig = eoa_sig(addr(1), SignatureMode::UpperLimit, 27);
        let mut blob = encode(&[sig], &AggregateMode::Final, 1).unwrap();

        for marker in [5u8, 26, 29, 37, 64, 0xff] {
            blob[64] = marker;
            assert_eq!(
                decode_final(&blob, 1),
                Err(AggregateCodecError::InvalidSlotMarker { slot: 0, marker })
            );
        }
    }

    #[test]
    fn test_dirty_signer_padding_rejected() {
        let sig = contract_sig(addr(1), SignatureMode::UpperLimit, &[]);
        let mut blob = encode(&[sig], &AggregateMode::Final, 1).unwrap();
        blob[0] = 1;

        assert_eq!(
            decode_final(&blob, 1),
            Err(AggregateCodecError::InvalidSignerPadding { slot: 0 })
        );
    }

    #[test]
    fn test_decoded_json_shape() {
        let sig = contract_sig(addr(1), SignatureMode::Actual, &[0xab]);
        let blob = encode(&[sig], &AggregateMode::Proposal(gas_bound()), 2).unwrap();
        let decoded = decode(&blob, AggregateShape::Proposal, 1).unwrap();

        let json = serde_json::to_value(&decoded).unwrap();
        assert_eq!(json["slots"][0]["kind"], "CONTRACT");
        assert_eq!(json["slots"][0]["mode"], "ACTUAL");
        assert_eq!(json["slots"][0]["signature"], "0xab");
        assert!(json["gasBound"]["preVerificationGas"].is_string());
    }

    proptest! {
        #[test]
        fn test_roundtrip_preserves_entries(sigs in arb_signature_set(6)) {
            let threshold = sigs.len() + 1;
            let blob = encode(&sigs, &AggregateMode::Proposal(gas_bound()), threshold).unwrap();

            let (bound, slots) = decode_proposal(&blob, sigs.len()).unwrap();
            prop_assert_eq!(bound, gas_bound());

            let mut expected = sigs.clone();
            expected.sort_by_key(|s| s.signer());

            // EOA signers are not on the wire; resolve them from the expected order.
            for (slot, sig) in slots.into_iter().zip(expected) {
                let resolved = slot
                    .into_signature(|_, _| Ok::<_, ()>(sig.signer()))
                    .unwrap();
                prop_assert_eq!(resolved, sig);
            }
        }
    }
}
