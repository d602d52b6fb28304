//! Course repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Course, CourseId, NewCourse};
use crate::domain::DomainError;

/// Repository trait for course storage
#[async_trait]
pub trait CourseRepository: Send + Sync + Debug {
    /// Get a course by its ID
    async fn get(&self, id: CourseId) -> Result<Option<Course>, DomainError>;

    /// List all courses
    async fn list(&self) -> Result<Vec<Course>, DomainError>;

    /// Store a new course; the store assigns the ID
    async fn create(&self, course: NewCourse) -> Result<Course, DomainError>;

    /// Update an existing course
    async fn update(&self, course: &Course) -> Result<Course, DomainError>;

    /// Delete a course along with every enrollment in it
    async fn delete(&self, id: CourseId) -> Result<bool, DomainError>;

    /// Cheap round trip proving the store answers
    async fn ping(&self) -> Result<(), DomainError>;
}
