//! Application state shared by all request handlers.

use crate::config::StorageConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Axum application state. Cloning is cheap: services and the pool are
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Used directly by readiness checks
    pub db_pool: AsyncDbPool,
    /// Public root and upload limit, needed when building routes
    pub storage: StorageConfig,
}

impl AppState {
    /// Builds repositories and services on top of the pool.
    pub fn new(pool: AsyncDbPool, storage: StorageConfig) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, &storage);
        Self::from_parts(services, pool, storage)
    }

    /// Assembles state from already wired services.
    pub fn from_parts(services: Services, db_pool: AsyncDbPool, storage: StorageConfig) -> Self {
        Self {
            services,
            db_pool,
            storage,
        }
    }
}
