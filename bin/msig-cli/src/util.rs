use std::{env, fs, path::Path};

use anyhow::Context;
use msig_crypto::{LocalEoaSigner, UserOperationV06};

/// Signing key environment variable.
const SIGNER_KEY_ENVVAR: &str = "MSIG_SIGNER_KEY";

/// Resolves the signing key from the file path (if provided) or environment variable (if
/// `--key-from-env` set). Exactly one source must be specified.
pub(crate) fn resolve_signer(
    key_file: Option<&Path>,
    key_from_env: bool,
) -> anyhow::Result<LocalEoaSigner> {
    match (key_file, key_from_env) {
        (Some(path), false) => read_signer(path),
        (None, true) => parse_signer_from_env(SIGNER_KEY_ENVVAR),
        (None, false) => anyhow::bail!("specify either --key-file or --key-from-env"),
        (Some(_), true) => anyhow::bail!("--key-file and --key-from-env are mutually exclusive"),
    }
}

fn read_signer(path: &Path) -> anyhow::Result<LocalEoaSigner> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading key file {}", path.display()))?;
    Ok(LocalEoaSigner::from_hex(&raw)?)
}

fn parse_signer_from_env(env: &'static str) -> anyhow::Result<LocalEoaSigner> {
    let Ok(env_val) = env::var(env) else {
        anyhow::bail!("got --key-from-env but {env} not set or invalid");
    };
    LocalEoaSigner::from_hex(&env_val).context("got --key-from-env but invalid key")
}

/// Reads a user operation in bundler JSON form.
pub(crate) fn read_user_operation(path: &Path) -> anyhow::Result<UserOperationV06> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading user operation {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing user operation {}", path.display()))
}
