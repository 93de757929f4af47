//! One handler per subcommand.

pub mod migrate;
pub mod serve;

pub use migrate::{MigrateAction, MigrateCommandHandler};
pub use serve::ServeCommandHandler;
