//! Gradebook service: enrollments, the user/course join and grade averages

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::course::CourseId;
use crate::domain::enrollment::{
    CourseWithGrade, DuplicatePolicy, Enrollment, EnrollmentRepository, GradeAverage,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request for enrolling a user in a course
#[derive(Debug, Clone, Copy)]
pub struct EnrollRequest {
    pub course_id: CourseId,
    pub grade: f64,
}

/// Gradebook service
///
/// Stateless apart from the repository handle; every call reads or writes
/// the store exactly once.
pub struct GradebookService<R: EnrollmentRepository> {
    repository: Arc<R>,
    duplicate_policy: DuplicatePolicy,
}

impl<R: EnrollmentRepository> GradebookService<R> {
    pub fn new(repository: Arc<R>, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            repository,
            duplicate_policy,
        }
    }

    /// Every course the user is enrolled in, with the grade earned
    pub async fn courses_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CourseWithGrade>, DomainError> {
        debug!(user_id = %user_id, "Getting user courses");
        self.repository.courses_for_user(user_id).await
    }

    /// The user's grade average weighted by course weight
    pub async fn grade_average(&self, user_id: UserId) -> Result<GradeAverage, DomainError> {
        let totals = self.repository.grade_totals(user_id).await?;
        let average = totals.average();

        debug!(
            user_id = %user_id,
            enrollments = totals.enrollments,
            average = ?average.value(),
            "Computed grade average"
        );

        Ok(average)
    }

    /// Enroll the user in a course under the configured duplicate policy
    pub async fn enroll(
        &self,
        user_id: UserId,
        request: EnrollRequest,
    ) -> Result<Enrollment, DomainError> {
        info!(
            user_id = %user_id,
            course_id = %request.course_id,
            policy = %self.duplicate_policy,
            "Creating enrollment"
        );

        let enrollment = Enrollment::new(user_id, request.course_id, request.grade);
        self.repository
            .create(enrollment, self.duplicate_policy)
            .await
    }
}
