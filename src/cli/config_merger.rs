//! Applies CLI overrides on top of file and environment configuration.
//!
//! Precedence, lowest to highest: TOML files, `RESTO_*` variables, flags.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the unvalidated base configuration the CLI points at: the
    /// `--config` file when given, the layered `config/` directory otherwise.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match &cli.config {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(environment) => loader.with_environment(environment),
            None => loader,
        };

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Returns the settings with flag overrides applied, validated.
    pub fn merge_cli_args(self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut settings = self.base_config;

        if cli.verbose {
            settings.logger.level = "debug".to_string();
        } else if cli.quiet {
            settings.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve { host, port, .. }) = &cli.command {
            if let Some(host) = host {
                settings.server.host = host.clone();
            }
            if let Some(port) = port {
                settings.server.port = *port;
            }
        }

        settings.validate()?;
        Ok(settings)
    }
}
