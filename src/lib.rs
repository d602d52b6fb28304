//! Gradebook API
//!
//! An HTTP service over users, courses and enrollments with:
//! - CRUD for users and courses
//! - Enrollment of users in courses with a grade
//! - Per-user course listings and weighted grade averages
//! - PostgreSQL or in-memory storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    course::PostgresCourseRepository,
    enrollment::PostgresEnrollmentRepository,
    storage::{run_schema_migrations, InMemoryStore, PostgresConfig, StorageType},
    user::PostgresUserRepository,
};
use tracing::info;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_backend = StorageType::parse(&config.storage.backend)?;
    let duplicate_policy = config.enrollment.duplicate_policy;

    info!(
        backend = ?storage_backend,
        duplicate_policy = %duplicate_policy,
        "Initializing application state"
    );

    let state = match storage_backend {
        StorageType::InMemory => {
            info!("Using in-memory storage for entities");
            let store = Arc::new(InMemoryStore::new());
            AppState::new(store.clone(), store.clone(), store, duplicate_policy)
        }
        StorageType::Postgres => {
            let pg_config = PostgresConfig::from(&config.database);

            info!("Connecting to PostgreSQL...");
            let pool = pg_config.connect().await?;
            info!("PostgreSQL connection established");

            if config.database.run_migrations {
                run_schema_migrations(&pool).await?;
            }

            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone(), &pg_config)),
                Arc::new(PostgresCourseRepository::new(pool.clone(), &pg_config)),
                Arc::new(PostgresEnrollmentRepository::new(pool, &pg_config)),
                duplicate_policy,
            )
        }
    };

    Ok(state)
}
