use msig_collector::ThresholdCollector;
use msig_crypto::PendingUserOperation;

use super::RoundOutput;
use crate::{
    args::SubcPropose,
    context::CmdContext,
    util::{read_user_operation, resolve_signer},
};

/// Starts a round: derives the gas bound from the operation's current values and signs first.
pub(super) fn run(subc: SubcPropose, ctx: &CmdContext) -> anyhow::Result<RoundOutput> {
    let config = ctx.require_config()?;
    let owners = config.owner_config()?;
    let signer = resolve_signer(subc.key_file.as_deref(), subc.key_from_env)?;
    let op = read_user_operation(&subc.op)?;

    let pending = PendingUserOperation::new(op, config.entry_point_context());
    let actual_gas = pending.op().gas();
    let gas_bound = config.gas_estimator().estimate(&actual_gas)?;

    let mut collector = ThresholdCollector::new(owners, gas_bound);
    collector.contribute(&signer, &pending, subc.mode, Some(&actual_gas))?;

    RoundOutput::advance(&mut collector, &actual_gas)
}
