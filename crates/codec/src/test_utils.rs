//! Signature fixtures shared by the encode and decode tests.

use alloy_primitives::{Address, U256};
use msig_primitives::{GasTriple, Signature, SignatureMode, EOA_SIGNATURE_LEN};
use proptest::prelude::*;

pub(crate) fn addr(n: u8) -> Address {
    Address::with_last_byte(n)
}

pub(crate) fn gas_bound() -> GasTriple {
    GasTriple::new(
        U256::from(0xb968),
        U256::from(0x5968_2f00),
        U256::from(0x5968_2f00),
    )
}

/// EOA signature whose `r` starts with the signer address, for easy identification.
pub(crate) fn eoa_sig(signer: Address, mode: SignatureMode, v: u8) -> Signature {
    let mut raw = [0u8; EOA_SIGNATURE_LEN];
    raw[..20].copy_from_slice(signer.as_slice());
    raw[32..64].fill(0xbb);
    raw[64] = v;
    Signature::eoa(signer, mode, raw.into())
}

pub(crate) fn contract_sig(signer: Address, mode: SignatureMode, data: &[u8]) -> Signature {
    Signature::contract(signer, mode, data.to_vec())
}

fn arb_mode() -> impl Strategy<Value = SignatureMode> {
    prop_oneof![Just(SignatureMode::UpperLimit), Just(SignatureMode::Actual)]
}

fn arb_signature(signer: Address) -> impl Strategy<Value = Signature> {
    let eoa = (
        prop::collection::vec(any::<u8>(), 64),
        prop_oneof![Just(27u8), Just(28u8)],
        arb_mode(),
    )
        .prop_map(move |(rs, v, mode)| {
            let mut raw = [0u8; EOA_SIGNATURE_LEN];
            raw[..64].copy_from_slice(&rs);
            raw[64] = v;
            Signature::eoa(signer, mode, raw.into())
        });
    let contract = (prop::collection::vec(any::<u8>(), 0..96), arb_mode())
        .prop_map(move |(data, mode)| Signature::contract(signer, mode, data));

    prop_oneof![eoa, contract]
}

/// Between 1 and `max` signatures with distinct signers, in arbitrary order.
pub(crate) fn arb_signature_set(max: usize) -> impl Strategy<Value = Vec<Signature>> {
    prop::collection::btree_set(prop::array::uniform20(any::<u8>()), 1..=max).prop_flat_map(
        |signers| {
            signers
                .into_iter()
                .map(|s| arb_signature(Address::from(s)))
                .collect::<Vec<_>>()
        },
    )
}
