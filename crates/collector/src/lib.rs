//! Threshold signature collection for a single user operation.
//!
//! A [`ThresholdCollector`] tracks one signing round from the initial proposal until the
//! operation is submitted or the round is abandoned. Co-signers exchange proposal blobs; the
//! last one to sign turns the round into a final aggregate through the
//! [`SubmissionAssembler`].

mod assembler;
mod collector;
mod config;
mod errors;

pub use assembler::SubmissionAssembler;
pub use collector::{RoundPhase, ThresholdCollector};
pub use config::OwnerConfig;
pub use errors::CollectorError;
