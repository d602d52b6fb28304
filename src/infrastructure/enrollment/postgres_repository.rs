//! PostgreSQL enrollment repository implementation

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::course::CourseId;
use crate::domain::enrollment::{
    CourseWithGrade, DuplicatePolicy, Enrollment, EnrollmentRepository, GradeTotals,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{bounded, PostgresConfig};

const APPEND_SQL: &str = r#"
    INSERT INTO user_courses (user_id, course_id, grade)
    VALUES ($1, $2, $3)
"#;

// Single statement: update any existing row, insert only if none matched.
const REPLACE_SQL: &str = r#"
    WITH updated AS (
        UPDATE user_courses SET grade = $3
        WHERE user_id = $1 AND course_id = $2
        RETURNING 1
    )
    INSERT INTO user_courses (user_id, course_id, grade)
    SELECT $1, $2, $3
    WHERE NOT EXISTS (SELECT 1 FROM updated)
"#;

const REJECT_SQL: &str = r#"
    INSERT INTO user_courses (user_id, course_id, grade)
    SELECT $1, $2, $3
    WHERE NOT EXISTS (
        SELECT 1 FROM user_courses WHERE user_id = $1 AND course_id = $2
    )
"#;

/// PostgreSQL implementation of EnrollmentRepository
#[derive(Debug, Clone)]
pub struct PostgresEnrollmentRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresEnrollmentRepository {
    pub fn new(pool: PgPool, config: &PostgresConfig) -> Self {
        Self {
            pool,
            query_timeout: config.query_timeout(),
        }
    }
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn courses_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CourseWithGrade>, DomainError> {
        let rows = bounded(
            self.query_timeout,
            "get user courses",
            sqlx::query(
                r#"
                SELECT c.id, c.name, c.weight, uc.grade
                FROM courses c
                INNER JOIN user_courses uc ON c.id = uc.course_id
                WHERE uc.user_id = $1
                "#,
            )
            .bind(user_id.value())
            .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(row_to_course_with_grade).collect()
    }

    async fn grade_totals(&self, user_id: UserId) -> Result<GradeTotals, DomainError> {
        let row = bounded(
            self.query_timeout,
            "compute grade totals",
            sqlx::query(
                r#"
                SELECT
                    COALESCE(SUM(c.weight * uc.grade), 0)::DOUBLE PRECISION AS weighted_sum,
                    COALESCE(SUM(c.weight), 0)::DOUBLE PRECISION AS weight_sum,
                    COUNT(*) AS enrollments
                FROM courses c
                INNER JOIN user_courses uc ON c.id = uc.course_id
                WHERE uc.user_id = $1
                "#,
            )
            .bind(user_id.value())
            .fetch_one(&self.pool),
        )
        .await?;

        let decode =
            |e: sqlx::Error| DomainError::storage(format!("Failed to decode grade totals: {}", e));

        let weighted_sum: f64 = row.try_get("weighted_sum").map_err(decode)?;
        let weight_sum: f64 = row.try_get("weight_sum").map_err(decode)?;
        let enrollments: i64 = row.try_get("enrollments").map_err(decode)?;
        let enrollments = usize::try_from(enrollments)
            .map_err(|_| DomainError::storage(format!("Invalid enrollment count {}", enrollments)))?;

        Ok(GradeTotals::new(weighted_sum, weight_sum, enrollments))
    }

    async fn create(
        &self,
        enrollment: Enrollment,
        policy: DuplicatePolicy,
    ) -> Result<Enrollment, DomainError> {
        let sql = match policy {
            DuplicatePolicy::Append => APPEND_SQL,
            DuplicatePolicy::Replace => REPLACE_SQL,
            DuplicatePolicy::Reject => REJECT_SQL,
        };

        let result = bounded(
            self.query_timeout,
            "create enrollment",
            sqlx::query(sql)
                .bind(enrollment.user_id.value())
                .bind(enrollment.course_id.value())
                .bind(enrollment.grade)
                .execute(&self.pool),
        )
        .await?;

        if policy == DuplicatePolicy::Reject && result.rows_affected() == 0 {
            return Err(DomainError::conflict(format!(
                "User '{}' is already enrolled in course '{}'",
                enrollment.user_id, enrollment.course_id
            )));
        }

        Ok(enrollment)
    }
}

fn row_to_course_with_grade(row: &sqlx::postgres::PgRow) -> Result<CourseWithGrade, DomainError> {
    let decode =
        |e: sqlx::Error| DomainError::storage(format!("Failed to decode enrollment row: {}", e));

    let id: i32 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let weight: i32 = row.try_get("weight").map_err(decode)?;
    let grade: f64 = row.try_get("grade").map_err(decode)?;

    Ok(CourseWithGrade::new(CourseId::new(id), name, weight, grade))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_target_join_table() {
        for sql in [APPEND_SQL, REPLACE_SQL, REJECT_SQL] {
            assert!(sql.contains("INSERT INTO user_courses (user_id, course_id, grade)"));
        }
    }

    #[test]
    fn test_guarded_statements_check_existing_pair() {
        assert!(REPLACE_SQL.contains("WHERE user_id = $1 AND course_id = $2"));
        assert!(REJECT_SQL.contains("WHERE user_id = $1 AND course_id = $2"));
        assert!(!APPEND_SQL.contains("NOT EXISTS"));
    }

    mod database {
        use tokio::sync::OnceCell;

        use super::*;
        use crate::domain::{CourseRepository, GradeAverage, NewCourse, NewUser, UserRepository};
        use crate::infrastructure::course::PostgresCourseRepository;
        use crate::infrastructure::storage::run_schema_migrations;
        use crate::infrastructure::user::PostgresUserRepository;

        // Run with: DATABASE_URL=postgres://... cargo test -- --ignored
        static SCHEMA: OnceCell<()> = OnceCell::const_new();

        struct Store {
            users: PostgresUserRepository,
            courses: PostgresCourseRepository,
            enrollments: PostgresEnrollmentRepository,
        }

        impl Store {
            async fn connect() -> Self {
                let url = std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must point at a disposable database");
                let config = PostgresConfig::new(url);
                let pool = config.connect().await.unwrap();
                SCHEMA
                    .get_or_try_init(|| run_schema_migrations(&pool))
                    .await
                    .unwrap();

                Self {
                    users: PostgresUserRepository::new(pool.clone(), &config),
                    courses: PostgresCourseRepository::new(pool.clone(), &config),
                    enrollments: PostgresEnrollmentRepository::new(pool, &config),
                }
            }

            async fn user(&self) -> UserId {
                self.users
                    .create(NewUser::new("ada", "ada@example.com"))
                    .await
                    .unwrap()
                    .id()
            }

            async fn course(&self, name: &str, weight: i32) -> CourseId {
                self.courses
                    .create(NewCourse::new(name, weight))
                    .await
                    .unwrap()
                    .id()
            }

            async fn deleted_user(&self) -> UserId {
                let id = self.user().await;
                assert!(self.users.delete(id).await.unwrap());
                id
            }

            async fn deleted_course(&self) -> CourseId {
                let id = self.course("gone", 1).await;
                assert!(self.courses.delete(id).await.unwrap());
                id
            }

            async fn enroll(
                &self,
                user: UserId,
                course: CourseId,
                grade: f64,
                policy: DuplicatePolicy,
            ) -> Result<Enrollment, DomainError> {
                self.enrollments
                    .create(Enrollment::new(user, course, grade), policy)
                    .await
            }

            async fn rows(&self, user: UserId) -> Vec<CourseWithGrade> {
                self.enrollments.courses_for_user(user).await.unwrap()
            }

            /// SQL aggregate, checked against the fold over the join
            async fn totals(&self, user: UserId) -> GradeTotals {
                let totals = self.enrollments.grade_totals(user).await.unwrap();
                assert_eq!(totals, GradeTotals::from_rows(&self.rows(user).await));
                totals
            }
        }

        #[tokio::test]
        #[ignore = "Requires running PostgreSQL (DATABASE_URL)"]
        async fn test_user_without_enrollments_has_no_data() {
            let store = Store::connect().await;
            let user = store.user().await;

            assert!(store.rows(user).await.is_empty());
            let totals = store.totals(user).await;
            assert_eq!(totals.enrollments, 0);
            assert_eq!(totals.average(), GradeAverage::NoData);
        }

        #[tokio::test]
        #[ignore = "Requires running PostgreSQL (DATABASE_URL)"]
        async fn test_weighted_average_over_join() {
            let store = Store::connect().await;
            let user = store.user().await;
            let a = store.course("A", 2).await;
            let b = store.course("B", 3).await;
            store.enroll(user, a, 80.0, DuplicatePolicy::Append).await.unwrap();
            store.enroll(user, b, 90.0, DuplicatePolicy::Append).await.unwrap();

            let rows = store.rows(user).await;
            assert_eq!(rows.len(), 2);
            assert!(rows.contains(&CourseWithGrade::new(a, "A", 2, 80.0)));
            assert!(rows.contains(&CourseWithGrade::new(b, "B", 3, 90.0)));

            let totals = store.totals(user).await;
            assert_eq!(totals, GradeTotals::new(430.0, 5.0, 2));
            assert_eq!(totals.average(), GradeAverage::Grade(86.0));
        }

        #[tokio::test]
        #[ignore = "Requires running PostgreSQL (DATABASE_URL)"]
        async fn test_unknown_references_persist_nothing() {
            let store = Store::connect().await;
            let user = store.user().await;
            let course = store.course("A", 1).await;
            let missing_user = store.deleted_user().await;
            let missing_course = store.deleted_course().await;

            for policy in [
                DuplicatePolicy::Append,
                DuplicatePolicy::Replace,
                DuplicatePolicy::Reject,
            ] {
                let err = store.enroll(user, missing_course, 50.0, policy).await.unwrap_err();
                assert!(matches!(err, DomainError::InvalidReference { .. }), "{policy}: {err}");
                assert!(err.is_storage());

                let err = store.enroll(missing_user, course, 50.0, policy).await.unwrap_err();
                assert!(matches!(err, DomainError::InvalidReference { .. }), "{policy}: {err}");
            }

            assert!(store.rows(user).await.is_empty());
            assert!(store.rows(missing_user).await.is_empty());
        }

        #[tokio::test]
        #[ignore = "Requires running PostgreSQL (DATABASE_URL)"]
        async fn test_append_counts_duplicates() {
            let store = Store::connect().await;
            let user = store.user().await;
            let a = store.course("A", 4).await;
            let b = store.course("B", 3).await;
            store.enroll(user, a, 60.0, DuplicatePolicy::Append).await.unwrap();
            store.enroll(user, a, 90.0, DuplicatePolicy::Append).await.unwrap();
            store.enroll(user, b, 70.0, DuplicatePolicy::Append).await.unwrap();

            assert_eq!(store.rows(user).await.len(), 3);
            let totals = store.totals(user).await;
            assert_eq!(totals, GradeTotals::new(810.0, 11.0, 3));
        }

        #[tokio::test]
        #[ignore = "Requires running PostgreSQL (DATABASE_URL)"]
        async fn test_replace_keeps_one_row_with_last_grade() {
            let store = Store::connect().await;
            let user = store.user().await;
            let a = store.course("A", 2).await;
            store.enroll(user, a, 60.0, DuplicatePolicy::Replace).await.unwrap();
            store.enroll(user, a, 90.0, DuplicatePolicy::Replace).await.unwrap();

            assert_eq!(store.rows(user).await, vec![CourseWithGrade::new(a, "A", 2, 90.0)]);
            assert_eq!(store.totals(user).await.average(), GradeAverage::Grade(90.0));
        }

        #[tokio::test]
        #[ignore = "Requires running PostgreSQL (DATABASE_URL)"]
        async fn test_replace_updates_every_appended_duplicate() {
            let store = Store::connect().await;
            let user = store.user().await;
            let a = store.course("A", 1).await;
            store.enroll(user, a, 60.0, DuplicatePolicy::Append).await.unwrap();
            store.enroll(user, a, 70.0, DuplicatePolicy::Append).await.unwrap();
            store.enroll(user, a, 90.0, DuplicatePolicy::Replace).await.unwrap();

            let rows = store.rows(user).await;
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|row| row.grade == 90.0));
            assert_eq!(store.totals(user).await.enrollments, 2);
        }

        #[tokio::test]
        #[ignore = "Requires running PostgreSQL (DATABASE_URL)"]
        async fn test_reject_keeps_first_grade() {
            let store = Store::connect().await;
            let user = store.user().await;
            let a = store.course("A", 1).await;
            store.enroll(user, a, 60.0, DuplicatePolicy::Reject).await.unwrap();

            let err = store
                .enroll(user, a, 90.0, DuplicatePolicy::Reject)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Conflict { .. }));
            assert_eq!(store.rows(user).await, vec![CourseWithGrade::new(a, "A", 1, 60.0)]);
        }

        #[tokio::test]
        #[ignore = "Requires running PostgreSQL (DATABASE_URL)"]
        async fn test_course_delete_cascades_to_join() {
            let store = Store::connect().await;
            let user = store.user().await;
            let a = store.course("A", 2).await;
            let b = store.course("B", 3).await;
            store.enroll(user, a, 80.0, DuplicatePolicy::Append).await.unwrap();
            store.enroll(user, b, 90.0, DuplicatePolicy::Append).await.unwrap();

            assert!(store.courses.delete(b).await.unwrap());

            assert_eq!(store.rows(user).await.len(), 1);
            assert_eq!(store.totals(user).await.average(), GradeAverage::Grade(80.0));
        }
    }
}
