//! Deterministic signers for tests.

use crate::LocalEoaSigner;

/// Signer whose secret key is the 32-byte big-endian encoding of `seed`.
///
/// # Panics
///
/// If `seed` is zero.
pub fn deterministic_signer(seed: u8) -> LocalEoaSigner {
    let mut key = [0u8; 32];
    key[31] = seed;
    LocalEoaSigner::from_slice(&key).expect("seed must be non-zero")
}

/// Signers for seeds `1..=count`.
pub fn deterministic_signers(count: u8) -> Vec<LocalEoaSigner> {
    (1..=count).map(deterministic_signer).collect()
}
