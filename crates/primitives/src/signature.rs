//! Signature types for threshold signing.

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, Bytes, FixedBytes};
use serde::{Deserialize, Serialize};

/// Length of an EOA signature in `r || s || v` form.
pub const EOA_SIGNATURE_LEN: usize = 65;

/// A raw 65-byte EOA signature (`r || s || v`).
pub type EoaSignatureBytes = FixedBytes<EOA_SIGNATURE_LEN>;

/// The kind of account that produced a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignerKind {
    /// Externally-owned account, verified by ECDSA recovery.
    Eoa,
    /// Smart-contract account, verified on-chain by the signer contract itself.
    Contract,
}

impl fmt::Display for SignerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eoa => f.write_str("EOA"),
            Self::Contract => f.write_str("CONTRACT"),
        }
    }
}

/// Which digest a signature was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureMode {
    /// Signed over the upper-bound gas triple carried in the proposal.
    UpperLimit,
    /// Signed over the operation's final gas values.
    Actual,
}

impl SignatureMode {
    /// Value added to the trailing slot byte for [`SignatureMode::Actual`] signatures.
    pub const ACTUAL_FLAG: u8 = 32;

    /// Returns the wire flag for this mode.
    pub fn flag(self) -> u8 {
        match self {
            Self::UpperLimit => 0,
            Self::Actual => Self::ACTUAL_FLAG,
        }
    }
}

impl fmt::Display for SignatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpperLimit => f.write_str("UPPER_LIMIT"),
            Self::Actual => f.write_str("ACTUAL"),
        }
    }
}

impl FromStr for SignatureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upper" | "upper_limit" | "upperlimit" => Ok(Self::UpperLimit),
            "actual" => Ok(Self::Actual),
            other => Err(format!("unknown signature mode: {other}")),
        }
    }
}

/// A single participant's signature over a user operation.
///
/// EOA signatures are expected to be exactly [`EOA_SIGNATURE_LEN`] bytes. Contract signatures
/// are opaque and of arbitrary length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    signer: Address,
    kind: SignerKind,
    mode: SignatureMode,
    bytes: Bytes,
}

impl Signature {
    /// Creates a new signature without validating its shape.
    ///
    /// The codec rejects malformed EOA signatures at encode time.
    pub fn new(signer: Address, kind: SignerKind, mode: SignatureMode, bytes: Bytes) -> Self {
        Self {
            signer,
            kind,
            mode,
            bytes,
        }
    }

    /// Creates an EOA signature from its fixed-size representation.
    pub fn eoa(signer: Address, mode: SignatureMode, bytes: EoaSignatureBytes) -> Self {
        Self::new(
            signer,
            SignerKind::Eoa,
            mode,
            Bytes::copy_from_slice(bytes.as_slice()),
        )
    }

    /// Creates a contract signature.
    pub fn contract(signer: Address, mode: SignatureMode, bytes: impl Into<Bytes>) -> Self {
        Self::new(signer, SignerKind::Contract, mode, bytes.into())
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn kind(&self) -> SignerKind {
        self.kind
    }

    pub fn mode(&self) -> SignatureMode {
        self.mode
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn is_eoa(&self) -> bool {
        self.kind == SignerKind::Eoa
    }
}
