//! PostgreSQL course repository implementation

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::course::{Course, CourseId, CourseRepository, NewCourse};
use crate::domain::DomainError;
use crate::infrastructure::storage::{bounded, ping_pool, PostgresConfig};

/// PostgreSQL implementation of CourseRepository
#[derive(Debug, Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool, config: &PostgresConfig) -> Self {
        Self {
            pool,
            query_timeout: config.query_timeout(),
        }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn get(&self, id: CourseId) -> Result<Option<Course>, DomainError> {
        let row = bounded(
            self.query_timeout,
            "get course",
            sqlx::query("SELECT id, name, weight FROM courses WHERE id = $1")
                .bind(id.value())
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(row_to_course).transpose()
    }

    async fn list(&self) -> Result<Vec<Course>, DomainError> {
        let rows = bounded(
            self.query_timeout,
            "list courses",
            sqlx::query("SELECT id, name, weight FROM courses ORDER BY id").fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(row_to_course).collect()
    }

    async fn create(&self, course: NewCourse) -> Result<Course, DomainError> {
        let id: i32 = bounded(
            self.query_timeout,
            "create course",
            sqlx::query_scalar("INSERT INTO courses (name, weight) VALUES ($1, $2) RETURNING id")
                .bind(&course.name)
                .bind(course.weight)
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(course.with_id(CourseId::new(id)))
    }

    async fn update(&self, course: &Course) -> Result<Course, DomainError> {
        let result = bounded(
            self.query_timeout,
            "update course",
            sqlx::query("UPDATE courses SET name = $2, weight = $3 WHERE id = $1")
                .bind(course.id().value())
                .bind(course.name())
                .bind(course.weight())
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Course '{}' not found",
                course.id()
            )));
        }

        Ok(course.clone())
    }

    async fn delete(&self, id: CourseId) -> Result<bool, DomainError> {
        let result = bounded(
            self.query_timeout,
            "delete course",
            sqlx::query("DELETE FROM courses WHERE id = $1")
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

fn row_to_course(row: &sqlx::postgres::PgRow) -> Result<Course, DomainError> {
    let decode =
        |e: sqlx::Error| DomainError::storage(format!("Failed to decode course row: {}", e));

    let id: i32 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let weight: i32 = row.try_get("weight").map_err(decode)?;

    Ok(Course::new(CourseId::new(id), name, weight))
}
