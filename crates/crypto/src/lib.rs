//! Digest and signing collaborators for threshold user-operation signing.
//!
//! The aggregation core never hashes or signs by itself. It asks a [`UserOperationDigest`] for
//! the digest of the operation under a given gas triple and a [`DigestSigner`] for a signature
//! over that digest.

mod digest;
mod errors;
mod recovery;
mod signer;
mod user_op;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use digest::UserOperationDigest;
pub use errors::SignerError;
pub use recovery::{eth_signed_digest, recover_eoa_signer};
pub use signer::{address_from_public_key, sign_user_operation, DigestSigner, LocalEoaSigner};
pub use user_op::{EntryPointContext, PendingUserOperation, UserOperationV06};
