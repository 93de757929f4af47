//! Repository layer for data access operations.

mod category_repo;

pub use category_repo::{CategoryRepository, CategoryStore};

use crate::db::AsyncDbPool;

/// Aggregates all repositories. Cloning is cheap since the pool is shared.
#[derive(Clone)]
pub struct Repositories {
    pub categories: CategoryRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
        }
    }
}
