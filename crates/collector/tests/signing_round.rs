//! End-to-end signing rounds across several co-signers exchanging proposal blobs.

use std::{collections::BTreeSet, num::NonZero};

use alloy_primitives::{address, Address, Bytes, U256};
use msig_codec::{decode, decode_final, AggregateShape, DecodedSlot};
use msig_collector::{CollectorError, OwnerConfig, RoundPhase, ThresholdCollector};
use msig_crypto::{
    recover_eoa_signer, sign_user_operation, test_utils::deterministic_signer, DigestSigner,
    EntryPointContext, LocalEoaSigner, PendingUserOperation, UserOperationDigest, UserOperationV06,
};
use msig_primitives::{GasField, GasTriple, Signature, SignatureMode, SignerKind};
use proptest::prelude::*;

fn contract_owner() -> Address {
    Address::repeat_byte(0xc0)
}

fn pending_op() -> PendingUserOperation {
    let op = UserOperationV06 {
        sender: address!("00000000000000000000000000000000000000aa"),
        nonce: U256::from(1),
        call_data: Bytes::from_static(&[0xde, 0xad]),
        call_gas_limit: U256::from(0x2_1000),
        verification_gas_limit: U256::from(0x1_0000),
        pre_verification_gas: U256::from(0xb968),
        max_fee_per_gas: U256::from(0x3b9a_ca00),
        max_priority_fee_per_gas: U256::from(0x3b9a_ca00),
        ..Default::default()
    };
    let ctx = EntryPointContext::new(address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789"), 1);
    PendingUserOperation::new(op, ctx)
}

fn bound() -> GasTriple {
    GasTriple::new(
        U256::from(0xb968 * 2),
        U256::from(0x5968_2f00),
        U256::from(0x5968_2f00),
    )
}

fn owners(signers: &[&LocalEoaSigner], extra: &[Address], threshold: u8) -> OwnerConfig {
    let mut owners: Vec<Address> = signers.iter().map(|s| s.address()).collect();
    owners.extend_from_slice(extra);
    OwnerConfig::try_new(owners, NonZero::new(threshold).unwrap()).unwrap()
}

fn eoa_bytes(slot: &DecodedSlot) -> [u8; 65] {
    match slot {
        DecodedSlot::Eoa { signature, .. } => signature.0,
        other => panic!("expected EOA slot, got {other:?}"),
    }
}

#[test]
fn test_two_of_three_mixed_modes() {
    let a = deterministic_signer(1);
    let b = deterministic_signer(2);
    let c = deterministic_signer(3);
    let config = owners(&[&a, &b, &c], &[], 2);
    let op = pending_op();
    let actual = op.op().gas();

    // B proposes without knowing the final gas.
    let mut initiator = ThresholdCollector::new(config.clone(), bound());
    assert_eq!(
        initiator.contribute(&b, &op, SignatureMode::UpperLimit, None),
        Ok(RoundPhase::Collecting)
    );
    let proposal = initiator.proposal_blob().unwrap();
    assert_eq!(proposal.len(), 96 + 65);

    let decoded = decode(&proposal, AggregateShape::Proposal, 1).unwrap();
    assert_eq!(decoded.gas_bound(), Some(&bound()));

    // A rebuilds the round, recovering B, and completes it with the actual values.
    let mut cosigner = ThresholdCollector::from_proposal(config, &proposal, 1, &op, None).unwrap();
    assert!(cosigner.has_signed(&b.address()));
    assert_eq!(cosigner.gas_bound(), &bound());

    assert_eq!(
        cosigner.contribute(&a, &op, SignatureMode::Actual, Some(&actual)),
        Ok(RoundPhase::Quorate)
    );
    let final_blob = cosigner.finalize(&actual).unwrap();
    assert_eq!(final_blob.len(), 130);
    assert_eq!(cosigner.phase(), RoundPhase::Submitted);

    // B's address sorts before A's.
    assert!(b.address() < a.address());
    let slots = decode_final(&final_blob, 2).unwrap();
    assert_eq!(slots[0].mode(), SignatureMode::UpperLimit);
    assert_eq!(slots[1].mode(), SignatureMode::Actual);
    assert_eq!(final_blob[64], eoa_bytes(&slots[0])[64]);
    assert_eq!(final_blob[129], eoa_bytes(&slots[1])[64] + 32);

    let upper_digest = op.user_operation_digest(&bound());
    let actual_digest = op.user_operation_digest(&actual);
    assert_eq!(
        recover_eoa_signer(&eoa_bytes(&slots[0]), &upper_digest).unwrap(),
        b.address()
    );
    assert_eq!(
        recover_eoa_signer(&eoa_bytes(&slots[1]), &actual_digest).unwrap(),
        a.address()
    );
}

#[test]
fn test_contract_signer_passes_through() {
    let a = deterministic_signer(1);
    let b = deterministic_signer(2);
    let config = owners(&[&a, &b], &[contract_owner()], 3);
    let op = pending_op();
    let contract_sig =
        Signature::contract(contract_owner(), SignatureMode::UpperLimit, vec![0x1c; 70]);

    let mut round = ThresholdCollector::new(config.clone(), bound());
    round.add_signature(contract_sig.clone()).unwrap();
    round
        .contribute(&a, &op, SignatureMode::UpperLimit, None)
        .unwrap();
    let proposal = round.proposal_blob().unwrap();

    let mut next = ThresholdCollector::from_proposal(config, &proposal, 2, &op, None).unwrap();
    let carried: Vec<&Signature> = next.signatures().collect();
    assert!(carried.contains(&&contract_sig));

    next.contribute(&b, &op, SignatureMode::UpperLimit, None)
        .unwrap();
    let final_blob = next.finalize(&op.op().gas()).unwrap();
    assert_eq!(final_blob.len(), 3 * 65 + 32 + 70);

    let slots = decode_final(&final_blob, 3).unwrap();
    let contract_slots: Vec<&DecodedSlot> = slots
        .iter()
        .filter(|s| s.kind() == SignerKind::Contract)
        .collect();
    assert_eq!(contract_slots.len(), 1);
    assert_eq!(contract_slots[0].known_signer(), Some(contract_owner()));
}

#[test]
fn test_actual_slot_requires_actual_gas() {
    let a = deterministic_signer(1);
    let b = deterministic_signer(2);
    let c = deterministic_signer(3);
    let config = owners(&[&a, &b, &c], &[], 3);
    let op = pending_op();
    let actual = op.op().gas();

    let mut round = ThresholdCollector::new(config.clone(), bound());
    round
        .contribute(&c, &op, SignatureMode::Actual, Some(&actual))
        .unwrap();
    let proposal = round.proposal_blob().unwrap();

    assert_eq!(
        ThresholdCollector::from_proposal(config.clone(), &proposal, 1, &op, None).unwrap_err(),
        CollectorError::ActualGasUnknown
    );
    let rebuilt =
        ThresholdCollector::from_proposal(config, &proposal, 1, &op, Some(&actual)).unwrap();
    assert!(rebuilt.has_signed(&c.address()));
}

#[test]
fn test_foreign_signature_in_proposal_rejected() {
    let a = deterministic_signer(1);
    let b = deterministic_signer(2);
    let outsider = deterministic_signer(9);
    let config = owners(&[&a, &b], &[], 2);
    let op = pending_op();

    // The outsider crafts a proposal under a permissive owner set.
    let permissive = owners(&[&a, &outsider], &[], 2);
    let mut forged = ThresholdCollector::new(permissive, bound());
    forged
        .contribute(&outsider, &op, SignatureMode::UpperLimit, None)
        .unwrap();
    let blob = forged.proposal_blob().unwrap();

    assert_eq!(
        ThresholdCollector::from_proposal(config, &blob, 1, &op, None).unwrap_err(),
        CollectorError::UnknownSigner(outsider.address())
    );
}

#[test]
fn test_signature_over_wrong_gas_does_not_recover_owner() {
    let a = deterministic_signer(1);
    let b = deterministic_signer(2);
    let config = owners(&[&a, &b], &[], 2);
    let op = pending_op();

    // Signed over the operation's own gas but tagged as upper-limit.
    let mislabeled =
        sign_user_operation(&a, &op, SignatureMode::UpperLimit, &op.op().gas()).unwrap();
    let mut round = ThresholdCollector::new(config.clone(), bound());
    round.add_signature(mislabeled).unwrap();
    let blob = round.proposal_blob().unwrap();

    assert!(matches!(
        ThresholdCollector::from_proposal(config, &blob, 1, &op, None),
        Err(CollectorError::UnknownSigner(_))
    ));
}

#[test]
fn test_upper_limit_round_rejects_gas_above_bound() {
    let a = deterministic_signer(1);
    let config = owners(&[&a], &[], 1);
    let op = pending_op();

    let mut round = ThresholdCollector::new(config, bound());
    round
        .contribute(&a, &op, SignatureMode::UpperLimit, None)
        .unwrap();

    let mut actual = bound();
    actual.max_priority_fee_per_gas += U256::from(1);
    assert_eq!(
        round.finalize(&actual),
        Err(CollectorError::GasBoundExceeded {
            field: GasField::MaxPriorityFeePerGas,
            actual: actual.max_priority_fee_per_gas,
            bound: bound().max_priority_fee_per_gas,
        })
    );
    assert_eq!(round.phase(), RoundPhase::Quorate);
}

#[test]
fn test_contribute_checks_membership_before_signing() {
    let a = deterministic_signer(1);
    let outsider = deterministic_signer(5);
    let mut round = ThresholdCollector::new(owners(&[&a], &[], 1), bound());

    assert_eq!(
        round.contribute(&outsider, &pending_op(), SignatureMode::Actual, None),
        Err(CollectorError::UnknownSigner(outsider.address()))
    );
    assert_eq!(round.phase(), RoundPhase::Proposed);
}

proptest! {
    #[test]
    fn test_duplicates_never_change_count(attempts in prop::collection::vec(0usize..4, 1..12)) {
        let owner_set: Vec<Address> = (1..=4).map(Address::with_last_byte).collect();
        let config = OwnerConfig::try_new(owner_set.clone(), NonZero::new(4).unwrap()).unwrap();
        let mut round = ThresholdCollector::new(config, bound());
        let mut seen = BTreeSet::new();

        for index in attempts {
            let signer = owner_set[index];
            let sig = Signature::contract(signer, SignatureMode::UpperLimit, vec![index as u8]);
            let before = round.signature_count();
            let result = round.add_signature(sig);

            if seen.insert(signer) {
                prop_assert!(result.is_ok());
                prop_assert_eq!(round.signature_count(), before + 1);
            } else {
                prop_assert_eq!(result, Err(CollectorError::DuplicateSigner(signer)));
                prop_assert_eq!(round.signature_count(), before);
            }
        }
        prop_assert_eq!(round.signature_count(), seen.len());
    }
}
