use msig_gas::{GasBoundEstimator, Multiplier};
use msig_primitives::GasTriple;

use crate::{args::SubcEstimate, context::CmdContext};

pub(super) fn run(subc: SubcEstimate, ctx: &CmdContext) -> anyhow::Result<GasTriple> {
    let estimator = match (subc.multiplier, ctx.config()) {
        (Some(multiplier), _) => GasBoundEstimator::uniform(Multiplier::try_new(multiplier)?),
        (None, Some(config)) => config.gas_estimator(),
        (None, None) => GasBoundEstimator::default(),
    };

    let current = GasTriple::new(subc.pvg, subc.max_fee, subc.max_priority_fee);
    Ok(estimator.estimate(&current)?)
}
