//! Ambient utilities shared by the msig binaries.

pub mod logging;
