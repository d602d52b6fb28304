//! Course service for course management

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::course::{Course, CourseId, CourseRepository, NewCourse};
use crate::domain::DomainError;

/// Request for creating a new course
#[derive(Debug, Clone)]
pub struct CreateCourseRequest {
    pub name: String,
    pub weight: i32,
}

/// Request for updating a course; absent fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub weight: Option<i32>,
}

/// Course service
#[derive(Debug)]
pub struct CourseService<R: CourseRepository> {
    repository: Arc<R>,
}

impl<R: CourseRepository> CourseService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateCourseRequest) -> Result<Course, DomainError> {
        info!(name = %request.name, weight = request.weight, "Creating course");

        self.repository
            .create(NewCourse::new(request.name, request.weight))
            .await
    }

    pub async fn get(&self, id: CourseId) -> Result<Option<Course>, DomainError> {
        debug!(id = %id, "Getting course");
        self.repository.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Course>, DomainError> {
        self.repository.list().await
    }

    /// Update a course. New weights apply to every later average.
    pub async fn update(
        &self,
        id: CourseId,
        request: UpdateCourseRequest,
    ) -> Result<Course, DomainError> {
        info!(id = %id, "Updating course");

        let mut course = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Course '{}' not found", id)))?;

        if let Some(name) = request.name {
            course.set_name(name);
        }

        if let Some(weight) = request.weight {
            course.set_weight(weight);
        }

        self.repository.update(&course).await
    }

    /// Delete a course and every enrollment in it
    pub async fn delete(&self, id: CourseId) -> Result<bool, DomainError> {
        info!(id = %id, "Deleting course");
        self.repository.delete(id).await
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repository.ping().await
    }
}
