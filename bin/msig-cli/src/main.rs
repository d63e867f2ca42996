//! Command line tool for running threshold signing rounds on ERC-4337 user operations.
//!
//! Each participant runs one command per round step and forwards the printed blob to the next
//! co-signer out of band.

mod args;
mod cmd;
mod context;
mod util;

use std::process;

use args::resolve_context_and_subcommand;
use cmd::exec_subc;
use msig_common::logging;

fn main() {
    let args: args::Args = argh::from_env();
    let inner = || -> anyhow::Result<()> {
        let (ctx, subc) = resolve_context_and_subcommand(args)?;
        logging::init(ctx.logger_config())?;
        exec_subc(subc, &ctx)?;
        Ok(())
    };
    if let Err(e) = inner() {
        eprintln!("ERROR\n{e:?}");
        process::exit(1);
    }
}
