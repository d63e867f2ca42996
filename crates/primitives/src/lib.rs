//! Shared types for threshold user-operation signature aggregation.
//!
//! Everything in here is plain data: signer identities, per-signature metadata
//! and the gas triple that upper-limit signers commit to. Wire encoding lives in
//! `msig-codec`, state handling in `msig-collector`.

mod gas;
mod signature;

pub use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
pub use gas::{GasField, GasTriple};
pub use signature::{EoaSignatureBytes, Signature, SignatureMode, SignerKind, EOA_SIGNATURE_LEN};
