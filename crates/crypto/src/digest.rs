use alloy_primitives::B256;
use msig_primitives::GasTriple;

/// Computes the digest of a pending user operation with its gas fields replaced by `gas`.
///
/// Upper-limit signers use the proposal's gas bound, actual signers use the final values.
pub trait UserOperationDigest {
    fn user_operation_digest(&self, gas: &GasTriple) -> B256;
}

impl<F> UserOperationDigest for F
where
    F: Fn(&GasTriple) -> B256,
{
    fn user_operation_digest(&self, gas: &GasTriple) -> B256 {
        self(gas)
    }
}
