//! Signing capabilities.

use std::fmt;

use alloy_primitives::{hex, keccak256, Address, Bytes, B256};
use msig_primitives::{GasTriple, Signature, SignatureMode, SignerKind, EOA_SIGNATURE_LEN};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};

use crate::{eth_signed_digest, SignerError, UserOperationDigest};

/// Something that can produce a signature over a user-operation hash on behalf of an owner.
pub trait DigestSigner {
    /// Owner address the signature is attributed to.
    fn address(&self) -> Address;

    fn kind(&self) -> SignerKind;

    /// Signs the user-operation hash `digest`.
    fn sign_digest(&self, digest: &B256) -> Result<Bytes, SignerError>;
}

/// Signs `op` with its gas fields set to `gas` and tags the result with `mode`.
///
/// The caller is responsible for passing the gas triple matching `mode`: the proposal's upper
/// bound for [`SignatureMode::UpperLimit`], the final values for [`SignatureMode::Actual`].
pub fn sign_user_operation<S, D>(
    signer: &S,
    op: &D,
    mode: SignatureMode,
    gas: &GasTriple,
) -> Result<Signature, SignerError>
where
    S: DigestSigner + ?Sized,
    D: UserOperationDigest + ?Sized,
{
    let digest = op.user_operation_digest(gas);
    let bytes = signer.sign_digest(&digest)?;
    Ok(Signature::new(signer.address(), signer.kind(), mode, bytes))
}

/// Derives the Ethereum address of a secp256k1 public key.
pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    let hash = keccak256(&public_key.serialize_uncompressed()[1..]);
    Address::from_slice(&hash[12..])
}

/// EOA signer backed by an in-memory secp256k1 secret key.
#[derive(Clone)]
pub struct LocalEoaSigner {
    secret_key: SecretKey,
    address: Address,
}

impl LocalEoaSigner {
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(SECP256K1, &secret_key);
        Self {
            secret_key,
            address: address_from_public_key(&public_key),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignerError> {
        let secret_key =
            SecretKey::from_slice(bytes).map_err(|e| SignerError::InvalidSecretKey(e.to_string()))?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Parses a hex-encoded key, with or without `0x` prefix and surrounding whitespace.
    pub fn from_hex(encoded: &str) -> Result<Self, SignerError> {
        let bytes =
            hex::decode(encoded.trim()).map_err(|e| SignerError::InvalidSecretKey(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for LocalEoaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEoaSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl DigestSigner for LocalEoaSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn kind(&self) -> SignerKind {
        SignerKind::Eoa
    }

    fn sign_digest(&self, digest: &B256) -> Result<Bytes, SignerError> {
        let message = Message::from_digest(eth_signed_digest(digest).0);
        let (recovery_id, compact) = SECP256K1
            .sign_ecdsa_recoverable(&message, &self.secret_key)
            .serialize_compact();

        let mut out = [0u8; EOA_SIGNATURE_LEN];
        out[..EOA_SIGNATURE_LEN - 1].copy_from_slice(&compact);
        out[EOA_SIGNATURE_LEN - 1] = 27 + recovery_id.to_i32() as u8;
        Ok(Bytes::copy_from_slice(&out))
    }
}
