use msig_collector::ThresholdCollector;
use msig_crypto::PendingUserOperation;

use super::RoundOutput;
use crate::{
    args::SubcCosign,
    context::CmdContext,
    util::{read_user_operation, resolve_signer},
};

/// Rebuilds the round from a proposal, verifies prior signers and adds the local signature.
pub(super) fn run(subc: SubcCosign, ctx: &CmdContext) -> anyhow::Result<RoundOutput> {
    let config = ctx.require_config()?;
    let owners = config.owner_config()?;
    let signer = resolve_signer(subc.key_file.as_deref(), subc.key_from_env)?;
    let op = read_user_operation(&subc.op)?;

    let pending = PendingUserOperation::new(op, config.entry_point_context());
    let actual_gas = pending.op().gas();

    let mut collector = ThresholdCollector::from_proposal(
        owners,
        &subc.blob,
        subc.count,
        &pending,
        Some(&actual_gas),
    )?;
    collector.contribute(&signer, &pending, subc.mode, Some(&actual_gas))?;

    RoundOutput::advance(&mut collector, &actual_gas)
}
