//! Subcommand implementations.

mod cosign;
mod estimate;
mod inspect;
mod propose;

use alloy_primitives::Bytes;
use msig_collector::{RoundPhase, ThresholdCollector};
use msig_primitives::GasTriple;
use serde::Serialize;
use tracing::info;

use crate::{args::Subcommand, context::CmdContext};

pub(crate) fn exec_subc(cmd: Subcommand, ctx: &CmdContext) -> anyhow::Result<()> {
    match cmd {
        Subcommand::Estimate(subc) => print_json(&estimate::run(subc, ctx)?),
        Subcommand::Propose(subc) => print_json(&propose::run(subc, ctx)?),
        Subcommand::Cosign(subc) => print_json(&cosign::run(subc, ctx)?),
        Subcommand::Inspect(subc) => print_json(&inspect::run(subc)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Outcome of a signing step, handed to the next co-signer or to the bundler.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoundOutput {
    phase: String,
    signature_count: usize,
    threshold: usize,
    gas_bound: GasTriple,
    /// True if `blob` is the submission-ready aggregate.
    is_final: bool,
    blob: Bytes,
}

impl RoundOutput {
    /// Emits the next proposal, or finalizes the round if it just became quorate.
    fn advance(
        collector: &mut ThresholdCollector,
        actual_gas: &GasTriple,
    ) -> anyhow::Result<Self> {
        let (is_final, blob) = if collector.phase() == RoundPhase::Quorate {
            (true, collector.finalize(actual_gas)?)
        } else {
            (false, collector.proposal_blob()?)
        };

        info!(
            phase = %collector.phase(),
            signatures = collector.signature_count(),
            threshold = collector.threshold(),
            is_final,
            "signing step complete"
        );

        Ok(Self {
            phase: collector.phase().to_string(),
            signature_count: collector.signature_count(),
            threshold: collector.threshold(),
            gas_bound: *collector.gas_bound(),
            is_final,
            blob: blob.into(),
        })
    }
}
