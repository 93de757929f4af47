//! PostgreSQL connection pooling (diesel-async over bb8) and embedded migrations.

mod migrate;
mod pool;

pub use migrate::{pending_migrations, revert_migrations, run_pending_migrations};
pub use pool::{AsyncDbPool, MIGRATIONS, establish_async_connection_pool, lazy_connection_pool};
