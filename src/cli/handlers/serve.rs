//! `serve`: start the HTTP server, or just report what it would do.

use crate::config::Settings;
use crate::server::Server;
use crate::storage::CATEGORY_ASSET_DIR;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            for line in self.summary() {
                println!("{}", line);
            }
            println!("Dry run completed: configuration is valid");
            return Ok(());
        }

        Server::new(self.config).run().await
    }

    /// What the server would do with the loaded configuration.
    pub fn summary(&self) -> Vec<String> {
        let settings = &self.config;
        vec![
            format!("Server would bind to: {}", settings.server.address()),
            format!("Request timeout: {}s", settings.server.request_timeout),
            format!(
                "Database pool: {}..{} connections, auto-migrate {}",
                settings.database.min_connections,
                settings.database.max_connections,
                if settings.database.auto_migrate { "on" } else { "off" }
            ),
            format!(
                "Category images: {} (max {} KiB)",
                settings.storage.public_dir.join(CATEGORY_ASSET_DIR).display(),
                settings.storage.max_image_kib
            ),
            format!("Log level: {}", settings.logger.level),
        ]
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
