//! Enrollment repository trait

use async_trait::async_trait;

use super::average::GradeTotals;
use super::entity::{CourseWithGrade, Enrollment};
use super::policy::DuplicatePolicy;
use crate::domain::error::DomainError;
use crate::domain::user::UserId;

#[cfg(test)]
use mockall::automock;

/// Repository for enrollments and the enrollment/course join
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Every enrollment of the user joined with its course, in no particular order.
    ///
    /// Unknown users and users without enrollments yield an empty list.
    async fn courses_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CourseWithGrade>, DomainError>;

    /// Weighted-average sums over the user's enrollments
    async fn grade_totals(&self, user_id: UserId) -> Result<GradeTotals, DomainError> {
        let rows = self.courses_for_user(user_id).await?;
        Ok(GradeTotals::from_rows(&rows))
    }

    /// Store an enrollment.
    ///
    /// Fails with `InvalidReference` when the user or course does not exist,
    /// and with `Conflict` when `policy` is `Reject` and the pair is already
    /// enrolled.
    async fn create(
        &self,
        enrollment: Enrollment,
        policy: DuplicatePolicy,
    ) -> Result<Enrollment, DomainError>;
}
