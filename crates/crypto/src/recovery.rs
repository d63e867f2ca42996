//! EOA signer recovery.

use alloy_primitives::{eip191_hash_message, Address, B256};
use msig_primitives::EOA_SIGNATURE_LEN;
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, SECP256K1,
};

use crate::{address_from_public_key, SignerError};

/// Returns the EIP-191 `personal_sign` digest of a user-operation hash.
///
/// EOA owners sign this rather than the raw hash; the on-chain verifier applies the same prefix.
pub fn eth_signed_digest(digest: &B256) -> B256 {
    eip191_hash_message(digest)
}

/// Recovers the address that produced `signature` over the user-operation hash `digest`.
///
/// Accepts `v` as either a raw recovery id (0/1) or the Ethereum form (27/28).
pub fn recover_eoa_signer(
    signature: &[u8; EOA_SIGNATURE_LEN],
    digest: &B256,
) -> Result<Address, SignerError> {
    let v = signature[EOA_SIGNATURE_LEN - 1];
    let recovery_id = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => {
            return Err(SignerError::InvalidSignature(format!(
                "recovery byte {v} out of range"
            )));
        }
    };
    let recovery_id = RecoveryId::from_i32(recovery_id as i32)
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
    let signature =
        RecoverableSignature::from_compact(&signature[..EOA_SIGNATURE_LEN - 1], recovery_id)
            .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;

    let message = Message::from_digest(eth_signed_digest(digest).0);
    let public_key = SECP256K1
        .recover_ecdsa(&message, &signature)
        .map_err(|e| SignerError::Recovery(e.to_string()))?;

    Ok(address_from_public_key(&public_key))
}
