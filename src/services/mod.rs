//! Service layer for business logic operations.

mod category_service;

pub use category_service::{CategoryInput, CategoryService};

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::repositories::Repositories;
use crate::storage::{AlphanumericTokenGenerator, ImageRules, LocalFileStore};

/// Aggregates all services. Cloning is cheap since collaborators are shared.
#[derive(Clone)]
pub struct Services {
    pub categories: CategoryService,
}

impl Services {
    /// Wires the production collaborators: database repositories and the
    /// local public directory.
    pub fn new(repos: Repositories, storage: &StorageConfig) -> Self {
        Self {
            categories: CategoryService::new(
                Arc::new(repos.categories),
                Arc::new(LocalFileStore::new(storage.public_dir.clone())),
                Arc::new(AlphanumericTokenGenerator),
                ImageRules::new(storage.max_image_bytes()),
            ),
        }
    }
}
