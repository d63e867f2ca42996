//! Signature collection state machine.

use std::{collections::BTreeMap, fmt};

use alloy_primitives::Address;
use msig_codec::{
    decode_proposal, encode, validate_signature, AggregateCodecError, AggregateMode, AggregateShape,
};
use msig_crypto::{recover_eoa_signer, sign_user_operation, DigestSigner, UserOperationDigest};
use msig_primitives::{GasTriple, Signature, SignatureMode};
use tracing::{debug, info, warn};

use crate::{CollectorError, OwnerConfig, SubmissionAssembler};

/// Lifecycle of a signing round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// Gas bound fixed, no signatures yet.
    Proposed,
    /// Between 1 and `threshold - 1` signatures.
    Collecting,
    /// Exactly `threshold` signatures; ready to finalize.
    Quorate,
    /// Final aggregate produced.
    Submitted,
    /// Round given up.
    Abandoned,
}

impl RoundPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Submitted | Self::Abandoned)
    }

    fn accepts_signatures(self) -> bool {
        matches!(self, Self::Proposed | Self::Collecting)
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Proposed => "proposed",
            Self::Collecting => "collecting",
            Self::Quorate => "quorate",
            Self::Submitted => "submitted",
            Self::Abandoned => "abandoned",
        };
        f.write_str(name)
    }
}

/// Collects owner signatures for one user operation until the threshold is reached.
///
/// Every transition validates first and mutates only on success, so a rejected call leaves the
/// collector exactly as it was. Signatures are keyed by signer, which keeps them in the order the
/// aggregate encodes them.
#[derive(Debug, Clone)]
pub struct ThresholdCollector {
    config: OwnerConfig,
    gas_bound: GasTriple,
    signatures: BTreeMap<Address, Signature>,
    phase: RoundPhase,
}

impl ThresholdCollector {
    /// Starts a round for an operation whose upper-limit signers commit to `gas_bound`.
    pub fn new(config: OwnerConfig, gas_bound: GasTriple) -> Self {
        Self {
            config,
            gas_bound,
            signatures: BTreeMap::new(),
            phase: RoundPhase::Proposed,
        }
    }

    /// Rebuilds a round from a received proposal blob holding `signature_count` signatures.
    ///
    /// EOA signers are recovered against the digest matching each slot's mode, so actual-mode
    /// slots need `actual_gas`. Contract signatures are taken at face value; only the on-chain
    /// verifier can check them.
    pub fn from_proposal<D>(
        config: OwnerConfig,
        blob: &[u8],
        signature_count: usize,
        op: &D,
        actual_gas: Option<&GasTriple>,
    ) -> Result<Self, CollectorError>
    where
        D: UserOperationDigest + ?Sized,
    {
        let threshold = config.threshold() as usize;
        if signature_count >= threshold {
            return Err(AggregateCodecError::SignatureCountMismatch {
                shape: AggregateShape::Proposal,
                provided: signature_count,
                threshold,
            }
            .into());
        }

        let (gas_bound, slots) = decode_proposal(blob, signature_count)?;
        let mut collector = Self::new(config, gas_bound);

        for slot in slots {
            let signature = slot.into_signature(|bytes, mode| -> Result<Address, CollectorError> {
                let gas = collector.signing_gas(mode, actual_gas)?;
                let digest = op.user_operation_digest(gas);
                Ok(recover_eoa_signer(&bytes.0, &digest)?)
            })?;
            collector.add_signature(signature)?;
        }

        debug!(
            signatures = collector.signature_count(),
            threshold, "rebuilt round from proposal"
        );
        Ok(collector)
    }

    /// Returns the gas triple a signature of the given mode is computed over.
    pub fn signing_gas<'a>(
        &'a self,
        mode: SignatureMode,
        actual_gas: Option<&'a GasTriple>,
    ) -> Result<&'a GasTriple, CollectorError> {
        match mode {
            SignatureMode::UpperLimit => Ok(&self.gas_bound),
            SignatureMode::Actual => actual_gas.ok_or(CollectorError::ActualGasUnknown),
        }
    }

    /// Adds an owner's signature.
    ///
    /// # Errors
    ///
    /// - `UnknownSigner`: the signer is not an owner
    /// - `DuplicateSigner`: the signer already signed, whatever the phase
    /// - `InvalidState`: the round is quorate or terminal
    /// - `Codec`: the signature cannot be encoded
    pub fn add_signature(&mut self, signature: Signature) -> Result<RoundPhase, CollectorError> {
        let signer = signature.signer();
        self.check_admissible(&signer)?;
        validate_signature(&signature)?;

        let mode = signature.mode();
        self.signatures.insert(signer, signature);
        self.phase = if self.signatures.len() == self.threshold() {
            RoundPhase::Quorate
        } else {
            RoundPhase::Collecting
        };

        debug!(
            %signer,
            %mode,
            signatures = self.signatures.len(),
            threshold = self.threshold(),
            phase = %self.phase,
            "added signature"
        );
        Ok(self.phase)
    }

    /// Signs the operation with `signer` and adds the result.
    ///
    /// Membership and duplicates are checked before anything is signed.
    pub fn contribute<S, D>(
        &mut self,
        signer: &S,
        op: &D,
        mode: SignatureMode,
        actual_gas: Option<&GasTriple>,
    ) -> Result<RoundPhase, CollectorError>
    where
        S: DigestSigner + ?Sized,
        D: UserOperationDigest + ?Sized,
    {
        self.check_admissible(&signer.address())?;

        let gas = self.signing_gas(mode, actual_gas)?;
        let signature = sign_user_operation(signer, op, mode, gas)?;
        self.add_signature(signature)
    }

    /// Signer checks come first so a repeated signer is reported as a duplicate in every phase.
    fn check_admissible(&self, signer: &Address) -> Result<(), CollectorError> {
        if !self.config.is_owner(signer) {
            warn!(%signer, "rejected signature from non-owner");
            return Err(CollectorError::UnknownSigner(*signer));
        }
        if self.signatures.contains_key(signer) {
            warn!(%signer, "rejected duplicate signature");
            return Err(CollectorError::DuplicateSigner(*signer));
        }
        if !self.phase.accepts_signatures() {
            return Err(CollectorError::InvalidState {
                phase: self.phase,
                operation: "add signature",
            });
        }
        Ok(())
    }

    /// Encodes the signatures collected so far as a proposal for the next co-signer.
    pub fn proposal_blob(&self) -> Result<Vec<u8>, CollectorError> {
        if !self.phase.accepts_signatures() {
            return Err(CollectorError::InvalidState {
                phase: self.phase,
                operation: "encode proposal",
            });
        }

        let signatures: Vec<Signature> = self.signatures.values().cloned().collect();
        Ok(encode(
            &signatures,
            &AggregateMode::Proposal(self.gas_bound),
            self.threshold(),
        )?)
    }

    /// Produces the final aggregate for submission with the operation's actual gas values.
    ///
    /// # Errors
    ///
    /// - `ThresholdNotMet`: fewer than `threshold` signatures were collected
    /// - `InvalidState`: the round is already terminal
    /// - `GasBoundExceeded`: an upper-limit signature would not cover `actual_gas`
    pub fn finalize(&mut self, actual_gas: &GasTriple) -> Result<Vec<u8>, CollectorError> {
        match self.phase {
            RoundPhase::Quorate => {}
            RoundPhase::Proposed | RoundPhase::Collecting => {
                return Err(CollectorError::ThresholdNotMet {
                    provided: self.signatures.len(),
                    required: self.threshold(),
                });
            }
            RoundPhase::Submitted | RoundPhase::Abandoned => {
                return Err(CollectorError::InvalidState {
                    phase: self.phase,
                    operation: "finalize",
                });
            }
        }

        let signatures: Vec<Signature> = self.signatures.values().cloned().collect();
        let blob = SubmissionAssembler::new(self.gas_bound).assemble(
            &signatures,
            actual_gas,
            self.threshold(),
        )?;

        self.phase = RoundPhase::Submitted;
        info!(
            signatures = signatures.len(),
            len = blob.len(),
            "round finalized"
        );
        Ok(blob)
    }

    /// Gives up on the round.
    pub fn abandon(&mut self) -> Result<(), CollectorError> {
        if self.phase.is_terminal() {
            return Err(CollectorError::InvalidState {
                phase: self.phase,
                operation: "abandon",
            });
        }

        info!(
            phase = %self.phase,
            signatures = self.signatures.len(),
            "round abandoned"
        );
        self.phase = RoundPhase::Abandoned;
        Ok(())
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn config(&self) -> &OwnerConfig {
        &self.config
    }

    pub fn gas_bound(&self) -> &GasTriple {
        &self.gas_bound
    }

    pub fn threshold(&self) -> usize {
        self.config.threshold() as usize
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Signatures in signer order.
    pub fn signatures(&self) -> impl Iterator<Item = &Signature> + '_ {
        self.signatures.values()
    }

    pub fn has_signed(&self, signer: &Address) -> bool {
        self.signatures.contains_key(signer)
    }
}
