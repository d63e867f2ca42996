use std::path::Path;

use anyhow::Context;
use msig_common::logging::LoggerConfig;
use msig_config::Config;

/// Service name reported by the logger.
const SERVICE_NAME: &str = "msig-cli";

/// State shared by all subcommands.
#[derive(Debug)]
pub(crate) struct CmdContext {
    config: Option<Config>,
}

impl CmdContext {
    pub(crate) fn new(config: Option<Config>) -> Self {
        Self { config }
    }

    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = path
            .map(|path| {
                Config::load(path).with_context(|| format!("loading {}", path.display()))
            })
            .transpose()?;
        Ok(Self::new(config))
    }

    /// Returns the loaded config, failing for commands that cannot run without one.
    pub(crate) fn require_config(&self) -> anyhow::Result<&Config> {
        self.config
            .as_ref()
            .context("this command requires --config")
    }

    pub(crate) fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    pub(crate) fn logger_config(&self) -> LoggerConfig {
        match &self.config {
            Some(config) => config.logger_config(SERVICE_NAME),
            None => LoggerConfig::new(SERVICE_NAME.to_string()),
        }
    }
}
