//! ERC-4337 EntryPoint v0.6 user operations.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use msig_primitives::GasTriple;
use serde::{Deserialize, Serialize};

use crate::UserOperationDigest;

/// A v0.6 user operation as accepted by bundlers over JSON-RPC.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationV06 {
    pub sender: Address,
    pub nonce: U256,
    #[serde(default)]
    pub init_code: Bytes,
    #[serde(default)]
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    #[serde(default)]
    pub paymaster_and_data: Bytes,
    #[serde(default)]
    pub signature: Bytes,
}

impl UserOperationV06 {
    /// Returns the operation's current gas triple.
    pub fn gas(&self) -> GasTriple {
        GasTriple::new(
            self.pre_verification_gas,
            self.max_fee_per_gas,
            self.max_priority_fee_per_gas,
        )
    }

    /// Returns a copy with the gas triple replaced.
    pub fn with_gas(&self, gas: &GasTriple) -> Self {
        Self {
            pre_verification_gas: gas.pre_verification_gas,
            max_fee_per_gas: gas.max_fee_per_gas,
            max_priority_fee_per_gas: gas.max_priority_fee_per_gas,
            ..self.clone()
        }
    }

    /// Computes the EntryPoint v0.6 user-operation hash.
    ///
    /// The `signature` field is not part of the hash.
    pub fn hash(&self, context: &EntryPointContext) -> B256 {
        let packed = (
            self.sender,
            self.nonce,
            keccak256(&self.init_code),
            keccak256(&self.call_data),
            self.call_gas_limit,
            self.verification_gas_limit,
            self.pre_verification_gas,
            self.max_fee_per_gas,
            self.max_priority_fee_per_gas,
            keccak256(&self.paymaster_and_data),
        )
            .abi_encode();

        let outer = (
            keccak256(packed),
            context.entry_point,
            U256::from(context.chain_id),
        )
            .abi_encode();

        keccak256(outer)
    }
}

/// Deployment an operation is hashed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPointContext {
    pub entry_point: Address,
    pub chain_id: u64,
}

impl EntryPointContext {
    pub fn new(entry_point: Address, chain_id: u64) -> Self {
        Self {
            entry_point,
            chain_id,
        }
    }
}

/// A user operation bound to the deployment it will be submitted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUserOperation {
    op: UserOperationV06,
    context: EntryPointContext,
}

impl PendingUserOperation {
    pub fn new(op: UserOperationV06, context: EntryPointContext) -> Self {
        Self { op, context }
    }

    pub fn op(&self) -> &UserOperationV06 {
        &self.op
    }

    pub fn context(&self) -> &EntryPointContext {
        &self.context
    }

    /// Hash of the operation with its own gas fields.
    pub fn hash(&self) -> B256 {
        self.op.hash(&self.context)
    }
}

impl UserOperationDigest for PendingUserOperation {
    fn user_operation_digest(&self, gas: &GasTriple) -> B256 {
        self.op.with_gas(gas).hash(&self.context)
    }
}
