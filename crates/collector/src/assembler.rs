//! Final aggregate assembly.

use msig_codec::{encode, AggregateMode};
use msig_primitives::{GasTriple, Signature, SignatureMode};
use tracing::debug;

use crate::CollectorError;

/// Builds the submission-ready aggregate once a round is quorate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionAssembler {
    gas_bound: GasTriple,
}

impl SubmissionAssembler {
    /// Creates an assembler for a round whose upper-limit signers committed to `gas_bound`.
    pub fn new(gas_bound: GasTriple) -> Self {
        Self { gas_bound }
    }

    pub fn gas_bound(&self) -> &GasTriple {
        &self.gas_bound
    }

    /// Whether the submission uses the upper-bound values themselves as its gas fields.
    pub fn is_at_bound(&self, actual_gas: &GasTriple) -> bool {
        *actual_gas == self.gas_bound
    }

    /// Encodes exactly `threshold` signatures into a final aggregate.
    ///
    /// If any signature was made over the upper bound, every field of `actual_gas` must be
    /// within it, otherwise the on-chain verifier would reject the submission.
    pub fn assemble(
        &self,
        signatures: &[Signature],
        actual_gas: &GasTriple,
        threshold: usize,
    ) -> Result<Vec<u8>, CollectorError> {
        let has_upper_limit = signatures
            .iter()
            .any(|sig| sig.mode() == SignatureMode::UpperLimit);

        let exceeded = if has_upper_limit {
            actual_gas.first_exceeding(&self.gas_bound)
        } else {
            None
        };
        if let Some(field) = exceeded {
            return Err(CollectorError::GasBoundExceeded {
                field,
                actual: actual_gas.get(field),
                bound: self.gas_bound.get(field),
            });
        }

        let blob = encode(signatures, &AggregateMode::Final, threshold)?;
        debug!(
            signatures = signatures.len(),
            len = blob.len(),
            at_bound = self.is_at_bound(actual_gas),
            "assembled final aggregate"
        );
        Ok(blob)
    }
}
