//! `migrate`: apply, list or roll back the embedded migrations.

use crate::config::Settings;
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    List,
    Apply,
    Rollback(u32),
}

impl MigrateAction {
    pub fn from_flags(dry_run: bool, rollback: Option<u32>) -> Self {
        match (dry_run, rollback) {
            (true, _) => MigrateAction::List,
            (false, Some(steps)) => MigrateAction::Rollback(steps),
            (false, None) => MigrateAction::Apply,
        }
    }
}

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, action: MigrateAction) -> AppResult<()> {
        self.config.database.validate()?;
        let url = &self.config.database.url;

        match action {
            MigrateAction::List => {
                let pending = pending_migrations(url).await?;
                report("pending", &pending);
            }
            MigrateAction::Apply => {
                let applied = run_pending_migrations(url).await?;
                tracing::info!(count = applied.len(), "Migrations applied");
                report("applied", &applied);
            }
            MigrateAction::Rollback(steps) => {
                let reverted = revert_migrations(url, steps).await?;
                tracing::info!(count = reverted.len(), "Migrations reverted");
                report("reverted", &reverted);
            }
        }

        Ok(())
    }
}

fn report(verb: &str, versions: &[String]) {
    if versions.is_empty() {
        println!("No migrations {}", verb);
        return;
    }
    println!("{} migration(s) {}:", versions.len(), verb);
    for version in versions {
        println!("  - {}", version);
    }
}
