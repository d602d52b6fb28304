//! Enrollment domain
//!
//! Enrollments link a user to a course and carry the grade earned. This
//! module holds the join row returned when reading a user's courses, the
//! weighted-average accumulator, and the policy applied when a user is
//! enrolled in the same course twice.

mod average;
mod entity;
mod policy;
mod repository;

pub use average::{GradeAverage, GradeTotals};
pub use entity::{CourseWithGrade, Enrollment};
pub use policy::DuplicatePolicy;
pub use repository::EnrollmentRepository;

#[cfg(test)]
pub use repository::MockEnrollmentRepository;
