//! In-memory entity store
//!
//! Keeps users, courses and enrollments in one lock-guarded set of tables
//! so enrollment writes can check both parents and deletes can cascade,
//! matching the relational schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    Course, CourseId, CourseRepository, CourseWithGrade, DomainError, DuplicatePolicy, Enrollment,
    EnrollmentRepository, NewCourse, NewUser, User, UserId, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    courses: BTreeMap<CourseId, Course>,
    enrollments: Vec<Enrollment>,
    last_user_id: i32,
    last_course_id: i32,
}

/// In-memory implementation of the user, course and enrollment repositories
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored enrollment rows
    pub async fn enrollment_count(&self) -> usize {
        self.tables.read().await.enrollments.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        tables.last_user_id += 1;
        let user = user.with_id(UserId::new(tables.last_user_id));
        tables.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        match tables.users.get_mut(&user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user.clone())
            }
            None => Err(DomainError::not_found(format!("User '{}' not found", user.id()))),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        tables.enrollments.retain(|e| e.user_id != id);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let _tables = self.tables.read().await;
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn get(&self, id: CourseId) -> Result<Option<Course>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.courses.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Course>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.courses.values().cloned().collect())
    }

    async fn create(&self, course: NewCourse) -> Result<Course, DomainError> {
        let mut tables = self.tables.write().await;

        tables.last_course_id += 1;
        let course = course.with_id(CourseId::new(tables.last_course_id));
        tables.courses.insert(course.id(), course.clone());

        Ok(course)
    }

    async fn update(&self, course: &Course) -> Result<Course, DomainError> {
        let mut tables = self.tables.write().await;

        match tables.courses.get_mut(&course.id()) {
            Some(stored) => {
                *stored = course.clone();
                Ok(course.clone())
            }
            None => Err(DomainError::not_found(format!(
                "Course '{}' not found",
                course.id()
            ))),
        }
    }

    async fn delete(&self, id: CourseId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.courses.remove(&id).is_none() {
            return Ok(false);
        }

        tables.enrollments.retain(|e| e.course_id != id);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let _tables = self.tables.read().await;
        Ok(())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn courses_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CourseWithGrade>, DomainError> {
        let tables = self.tables.read().await;

        let rows = tables
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter_map(|e| {
                tables.courses.get(&e.course_id).map(|course| {
                    CourseWithGrade::new(course.id(), course.name(), course.weight(), e.grade)
                })
            })
            .collect();

        Ok(rows)
    }

    async fn create(
        &self,
        enrollment: Enrollment,
        policy: DuplicatePolicy,
    ) -> Result<Enrollment, DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&enrollment.user_id) {
            return Err(DomainError::invalid_reference(format!(
                "User '{}' does not exist",
                enrollment.user_id
            )));
        }

        if !tables.courses.contains_key(&enrollment.course_id) {
            return Err(DomainError::invalid_reference(format!(
                "Course '{}' does not exist",
                enrollment.course_id
            )));
        }

        let same_pair =
            |e: &Enrollment| e.user_id == enrollment.user_id && e.course_id == enrollment.course_id;
        let enrolled = tables.enrollments.iter().any(same_pair);

        match (policy, enrolled) {
            // Every matching row, as rows appended earlier may repeat the pair
            (DuplicatePolicy::Replace, true) => {
                for row in tables.enrollments.iter_mut().filter(|e| same_pair(&**e)) {
                    row.grade = enrollment.grade;
                }
            }
            (DuplicatePolicy::Reject, true) => {
                return Err(DomainError::conflict(format!(
                    "User '{}' is already enrolled in course '{}'",
                    enrollment.user_id, enrollment.course_id
                )));
            }
            _ => tables.enrollments.push(enrollment),
        }

        Ok(enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GradeAverage, GradeTotals};

    async fn seed(store: &InMemoryStore) -> (User, Course, Course) {
        let user = UserRepository::create(store, NewUser::new("ada", "ada@example.com"))
            .await
            .unwrap();
        let algebra = CourseRepository::create(store, NewCourse::new("Algebra", 2))
            .await
            .unwrap();
        let physics = CourseRepository::create(store, NewCourse::new("Physics", 3))
            .await
            .unwrap();

        (user, algebra, physics)
    }

    async fn enroll(
        store: &InMemoryStore,
        user: &User,
        course: &Course,
        grade: f64,
        policy: DuplicatePolicy,
    ) -> Result<Enrollment, DomainError> {
        EnrollmentRepository::create(store, Enrollment::new(user.id(), course.id(), grade), policy)
            .await
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let store = InMemoryStore::new();
        let (user, algebra, physics) = seed(&store).await;

        assert_eq!(user.id().value(), 1);
        assert_eq!(algebra.id().value(), 1);
        assert_eq!(physics.id().value(), 2);
    }

    #[tokio::test]
    async fn test_courses_for_unknown_user_is_empty() {
        let store = InMemoryStore::new();
        seed(&store).await;

        let rows = store.courses_for_user(UserId::new(42)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_enrollment_requires_existing_course() {
        let store = InMemoryStore::new();
        let (user, _, _) = seed(&store).await;

        let result = EnrollmentRepository::create(
            &store,
            Enrollment::new(user.id(), CourseId::new(99), 80.0),
            DuplicatePolicy::Append,
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference { .. }));
        assert!(err.is_storage());
        assert_eq!(store.enrollment_count().await, 0);
    }

    #[tokio::test]
    async fn test_enrollment_requires_existing_user() {
        let store = InMemoryStore::new();
        let (_, algebra, _) = seed(&store).await;

        let result = EnrollmentRepository::create(
            &store,
            Enrollment::new(UserId::new(7), algebra.id(), 80.0),
            DuplicatePolicy::Append,
        )
        .await;

        assert!(matches!(result, Err(DomainError::InvalidReference { .. })));
        assert_eq!(store.enrollment_count().await, 0);
    }

    #[tokio::test]
    async fn test_join_reflects_latest_course_values() {
        let store = InMemoryStore::new();
        let (user, mut algebra, physics) = seed(&store).await;

        enroll(&store, &user, &algebra, 80.0, DuplicatePolicy::Append).await.unwrap();
        enroll(&store, &user, &physics, 90.0, DuplicatePolicy::Append).await.unwrap();

        algebra.set_name("Linear Algebra");
        algebra.set_weight(5);
        CourseRepository::update(&store, &algebra).await.unwrap();

        let rows = store.courses_for_user(user.id()).await.unwrap();
        let updated = rows.iter().find(|r| r.id == algebra.id()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(updated.name, "Linear Algebra");
        assert_eq!(updated.weight, 5);
    }

    #[tokio::test]
    async fn test_append_keeps_duplicates() {
        let store = InMemoryStore::new();
        let (user, algebra, _) = seed(&store).await;

        enroll(&store, &user, &algebra, 60.0, DuplicatePolicy::Append).await.unwrap();
        enroll(&store, &user, &algebra, 80.0, DuplicatePolicy::Append).await.unwrap();

        let totals = store.grade_totals(user.id()).await.unwrap();

        assert_eq!(totals.enrollments, 2);
        // (2*60 + 2*80) / (2 + 2)
        assert_eq!(totals.average(), GradeAverage::Grade(70.0));
    }

    #[tokio::test]
    async fn test_replace_overwrites_grade() {
        let store = InMemoryStore::new();
        let (user, algebra, _) = seed(&store).await;

        enroll(&store, &user, &algebra, 60.0, DuplicatePolicy::Replace).await.unwrap();
        enroll(&store, &user, &algebra, 95.0, DuplicatePolicy::Replace).await.unwrap();

        let rows = store.courses_for_user(user.id()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].grade, 95.0);
    }

    #[tokio::test]
    async fn test_replace_updates_every_appended_duplicate() {
        let store = InMemoryStore::new();
        let (user, algebra, _) = seed(&store).await;

        enroll(&store, &user, &algebra, 60.0, DuplicatePolicy::Append).await.unwrap();
        enroll(&store, &user, &algebra, 70.0, DuplicatePolicy::Append).await.unwrap();
        enroll(&store, &user, &algebra, 90.0, DuplicatePolicy::Replace).await.unwrap();

        let rows = store.courses_for_user(user.id()).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.grade == 90.0));
        assert_eq!(store.enrollment_count().await, 2);
    }

    #[tokio::test]
    async fn test_reject_refuses_duplicate() {
        let store = InMemoryStore::new();
        let (user, algebra, _) = seed(&store).await;

        enroll(&store, &user, &algebra, 60.0, DuplicatePolicy::Reject).await.unwrap();
        let second = enroll(&store, &user, &algebra, 95.0, DuplicatePolicy::Reject).await;

        assert!(matches!(second, Err(DomainError::Conflict { .. })));
        assert_eq!(store.enrollment_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = InMemoryStore::new();
        let (user, algebra, physics) = seed(&store).await;

        enroll(&store, &user, &algebra, 60.0, DuplicatePolicy::Append).await.unwrap();
        enroll(&store, &user, &physics, 70.0, DuplicatePolicy::Append).await.unwrap();

        assert!(UserRepository::delete(&store, user.id()).await.unwrap());
        assert_eq!(store.enrollment_count().await, 0);
        assert!(!UserRepository::delete(&store, user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_course_cascades() {
        let store = InMemoryStore::new();
        let (user, algebra, physics) = seed(&store).await;

        enroll(&store, &user, &algebra, 60.0, DuplicatePolicy::Append).await.unwrap();
        enroll(&store, &user, &physics, 70.0, DuplicatePolicy::Append).await.unwrap();

        assert!(CourseRepository::delete(&store, algebra.id()).await.unwrap());

        let rows = store.courses_for_user(user.id()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, physics.id());
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let store = InMemoryStore::new();
        let ghost = User::new(UserId::new(5), "ghost", "ghost@example.com");

        let result = UserRepository::update(&store, &ghost).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_default_totals_match_fold() {
        let store = InMemoryStore::new();
        let (user, algebra, physics) = seed(&store).await;

        enroll(&store, &user, &algebra, 80.0, DuplicatePolicy::Append).await.unwrap();
        enroll(&store, &user, &physics, 90.0, DuplicatePolicy::Append).await.unwrap();

        let rows = store.courses_for_user(user.id()).await.unwrap();
        let totals = store.grade_totals(user.id()).await.unwrap();

        assert_eq!(totals, GradeTotals::from_rows(&rows));
        assert_eq!(totals.average(), GradeAverage::Grade(86.0));
    }
}
