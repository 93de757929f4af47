//! Command-line interface: argument parsing, configuration overrides and
//! the `serve` / `migrate` command handlers.

pub mod config_merger;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use parser::{Cli, Commands};

use anyhow::Context;

use crate::config::Settings;
use crate::logger::init_logger;
use handlers::{MigrateAction, MigrateCommandHandler, ServeCommandHandler};

/// Loads configuration with CLI overrides applied.
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let settings = ConfigurationMerger::from_cli(cli)
        .context("Failed to load configuration")?
        .merge_cli_args(cli)
        .context("Invalid configuration")?;
    Ok(settings)
}

/// Installs the global logger described by `settings.logger`.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Invalid logger configuration")?;
    init_logger(logger_config)
}

/// Runs the parsed command; no subcommand means `serve`.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    match cli.command.unwrap_or_default() {
        Commands::Serve { dry_run, .. } => {
            ServeCommandHandler::new(settings).execute(dry_run).await
        }
        Commands::Migrate { dry_run, rollback } => {
            MigrateCommandHandler::new(settings)
                .execute(MigrateAction::from_flags(dry_run, rollback))
                .await?;
            Ok(())
        }
    }
}
