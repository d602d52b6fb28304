//! PostgreSQL connection pooling and query helpers

use std::future::Future;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
    /// Per-query timeout in seconds
    pub query_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from(&DatabaseConfig::default())
    }
}

impl From<&DatabaseConfig> for PostgresConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
            query_timeout_secs: config.query_timeout_secs,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Open a connection pool
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// Run one store round trip under `limit`.
///
/// `action` names the operation in error messages.
pub(crate) async fn bounded<T, F>(limit: Duration, action: &str, query: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result.map_err(|e| map_sqlx_error(action, e)),
        Err(_) => Err(DomainError::timeout(format!(
            "Failed to {}: no response within {}ms",
            action,
            limit.as_millis()
        ))),
    }
}

/// `SELECT 1` under the query timeout
pub(crate) async fn ping_pool(pool: &PgPool, limit: Duration) -> Result<(), DomainError> {
    bounded(limit, "ping store", sqlx::query("SELECT 1").execute(pool)).await?;
    Ok(())
}

/// Translate a driver error into the domain's storage error family
pub(crate) fn map_sqlx_error(action: &str, err: sqlx::Error) -> DomainError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return DomainError::invalid_reference(format!("Failed to {}: {}", action, db_err));
        }
    }

    match err {
        sqlx::Error::PoolTimedOut => {
            DomainError::timeout(format!("Failed to {}: connection pool timed out", action))
        }
        other => DomainError::storage(format!("Failed to {}: {}", action, other)),
    }
}
