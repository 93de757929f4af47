//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Environment;

/// Restaurant back-office API server
#[derive(Parser, Debug)]
#[command(name = "resto-admin")]
#[command(version = crate::clap_long_version())]
#[command(long_about = "
Restaurant back-office API: menu category administration with image uploads.

EXAMPLES:
    resto-admin serve
    resto-admin serve --host 0.0.0.0 --port 8080
    resto-admin --config /etc/resto/app.toml serve --dry-run
    resto-admin --env production migrate
    resto-admin migrate --rollback 1
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Load exactly this TOML file instead of the layered `config/` directory
    #[arg(
        short,
        long,
        value_name = "FILE",
        value_parser = super::validation::validate_config_file_path
    )]
    pub config: Option<PathBuf>,

    /// Environment used to pick `config/{env}.toml` (development, test, production)
    #[arg(short, long, value_name = "ENV", value_parser = super::validation::parse_environment)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind, overrides `server.host`
        #[arg(
            long,
            value_name = "ADDRESS",
            value_parser = super::validation::validate_host_address
        )]
        host: Option<String>,

        /// Port to listen on, overrides `server.port`
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply, list or roll back database migrations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert this many of the most recent migrations (1-100)
        #[arg(
            long,
            value_name = "STEPS",
            value_parser = super::validation::validate_rollback_steps
        )]
        rollback: Option<u32>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve {
            host: None,
            port: None,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["resto-admin"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose && !cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "resto-admin", "serve", "--host", "0.0.0.0", "--port", "8080", "--dry-run",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::Serve {
                host: Some("0.0.0.0".to_string()),
                port: Some(8080),
                dry_run: true,
            })
        );
    }

    #[test]
    fn test_migrate_command() {
        let cli = Cli::try_parse_from(["resto-admin", "migrate", "--rollback", "2"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Migrate {
                dry_run: false,
                rollback: Some(2),
            })
        );
    }

    #[test]
    fn test_env_alias() {
        let cli = Cli::try_parse_from(["resto-admin", "--env", "prod"]).unwrap();
        assert_eq!(cli.env, Some(Environment::Production));
    }

    #[test]
    fn test_conflicting_flags() {
        let err = Cli::try_parse_from(["resto-admin", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let err = Cli::try_parse_from(["resto-admin", "migrate", "--dry-run", "--rollback", "1"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_invalid_port() {
        assert!(Cli::try_parse_from(["resto-admin", "serve", "--port", "0"]).is_err());
    }
}
