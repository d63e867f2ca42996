//! Command line arguments for the `msig-cli` binary.

use std::path::PathBuf;

use alloy_primitives::{Bytes, U256};
use argh::FromArgs;
use msig_primitives::SignatureMode;

use crate::context::CmdContext;

/// Threshold signing for ERC-4337 user operations.
#[derive(FromArgs)]
pub(crate) struct Args {
    #[argh(option, description = "path to the TOML config file", short = 'c')]
    pub(crate) config: Option<PathBuf>,

    #[argh(subcommand)]
    pub(crate) subc: Subcommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub(crate) enum Subcommand {
    Estimate(SubcEstimate),
    Propose(SubcPropose),
    Cosign(SubcCosign),
    Inspect(SubcInspect),
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "estimate",
    description = "derives the upper-bound gas triple from current estimates"
)]
pub(crate) struct SubcEstimate {
    #[argh(option, description = "current preVerificationGas")]
    pub(crate) pvg: U256,

    #[argh(option, description = "current maxFeePerGas")]
    pub(crate) max_fee: U256,

    #[argh(option, description = "current maxPriorityFeePerGas")]
    pub(crate) max_priority_fee: U256,

    #[argh(
        option,
        description = "multiplier applied to every field, overriding the config"
    )]
    pub(crate) multiplier: Option<f64>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "propose",
    description = "starts a signing round and prints the proposal blob"
)]
pub(crate) struct SubcPropose {
    #[argh(option, description = "user operation JSON file")]
    pub(crate) op: PathBuf,

    #[argh(option, description = "reads signing key from specified file", short = 'f')]
    pub(crate) key_file: Option<PathBuf>,

    #[argh(
        switch,
        description = "reads signing key from envvar MSIG_SIGNER_KEY",
        short = 'E'
    )]
    pub(crate) key_from_env: bool,

    #[argh(
        option,
        description = "signature mode [upper, actual] (default upper)",
        default = "SignatureMode::UpperLimit"
    )]
    pub(crate) mode: SignatureMode,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "cosign",
    description = "adds a signature to a received proposal blob"
)]
pub(crate) struct SubcCosign {
    #[argh(option, description = "user operation JSON file")]
    pub(crate) op: PathBuf,

    #[argh(option, description = "reads signing key from specified file", short = 'f')]
    pub(crate) key_file: Option<PathBuf>,

    #[argh(
        switch,
        description = "reads signing key from envvar MSIG_SIGNER_KEY",
        short = 'E'
    )]
    pub(crate) key_from_env: bool,

    #[argh(option, description = "hex-encoded proposal blob")]
    pub(crate) blob: Bytes,

    #[argh(option, description = "number of signatures in the proposal blob")]
    pub(crate) count: usize,

    #[argh(
        option,
        description = "signature mode [upper, actual] (default upper)",
        default = "SignatureMode::UpperLimit"
    )]
    pub(crate) mode: SignatureMode,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "inspect",
    description = "decodes an aggregated signature blob as JSON"
)]
pub(crate) struct SubcInspect {
    #[argh(option, description = "hex-encoded blob")]
    pub(crate) blob: Bytes,

    #[argh(option, description = "number of signature slots in the blob")]
    pub(crate) count: usize,

    #[argh(
        switch,
        long = "final",
        description = "blob is a final aggregate without gas prefix"
    )]
    pub(crate) final_blob: bool,
}

pub(crate) fn resolve_context_and_subcommand(
    args: Args,
) -> anyhow::Result<(CmdContext, Subcommand)> {
    let ctx = CmdContext::load(args.config.as_deref())?;
    Ok((ctx, args.subc))
}
