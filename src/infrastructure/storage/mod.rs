//! Storage infrastructure - Entity store backends

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::StorageType;
pub use in_memory::InMemoryStore;
pub use migrations::{run_schema_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::PostgresConfig;
pub(crate) use postgres::{bounded, ping_pool};
