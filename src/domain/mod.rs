//! Domain layer - Core business logic and entities

pub mod course;
pub mod enrollment;
pub mod error;
pub mod user;

pub use course::{Course, CourseId, CourseRepository, NewCourse};
pub use enrollment::{
    CourseWithGrade, DuplicatePolicy, Enrollment, EnrollmentRepository, GradeAverage,
    GradeTotals,
};
pub use error::DomainError;
pub use user::{NewUser, User, UserId, UserRepository};
