//! PostgreSQL user repository implementation

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::{bounded, ping_pool, PostgresConfig};

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool, config: &PostgresConfig) -> Self {
        Self {
            pool,
            query_timeout: config.query_timeout(),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = bounded(
            self.query_timeout,
            "get user",
            sqlx::query("SELECT id, username, email FROM users WHERE id = $1")
                .bind(id.value())
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = bounded(
            self.query_timeout,
            "list users",
            sqlx::query("SELECT id, username, email FROM users ORDER BY id").fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(row_to_user).collect()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let id: i32 = bounded(
            self.query_timeout,
            "create user",
            sqlx::query_scalar("INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id")
                .bind(&user.username)
                .bind(&user.email)
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(user.with_id(UserId::new(id)))
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = bounded(
            self.query_timeout,
            "update user",
            sqlx::query("UPDATE users SET username = $2, email = $3 WHERE id = $1")
                .bind(user.id().value())
                .bind(user.username())
                .bind(user.email())
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = bounded(
            self.query_timeout,
            "delete user",
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id.value())
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        ping_pool(&self.pool, self.query_timeout).await
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode user row: {}", e));

    let id: i32 = row.try_get("id").map_err(decode)?;
    let username: String = row.try_get("username").map_err(decode)?;
    let email: String = row.try_get("email").map_err(decode)?;

    Ok(User::new(UserId::new(id), username, email))
}
