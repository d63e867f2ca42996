use thiserror::Error;

/// Errors raised while producing or checking EOA signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// Signature bytes are not a valid recoverable ECDSA signature.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Secret key material could not be parsed.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    /// Public key recovery failed.
    #[error("failed to recover signer: {0}")]
    Recovery(String),
}
