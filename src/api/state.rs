//! Application state for shared services

use std::sync::Arc;

use crate::domain::{
    Course, CourseId, CourseRepository, CourseWithGrade, DomainError, DuplicatePolicy, Enrollment,
    EnrollmentRepository, GradeAverage, User, UserId, UserRepository,
};
use crate::infrastructure::course::{CourseService, CreateCourseRequest, UpdateCourseRequest};
use crate::infrastructure::enrollment::{EnrollRequest, GradebookService};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub course_service: Arc<dyn CourseServiceTrait>,
    pub gradebook_service: Arc<dyn GradebookServiceTrait>,
}

impl AppState {
    /// Wire the services over the given repositories
    pub fn new<U, C, E>(
        users: Arc<U>,
        courses: Arc<C>,
        enrollments: Arc<E>,
        duplicate_policy: DuplicatePolicy,
    ) -> Self
    where
        U: UserRepository + 'static,
        C: CourseRepository + 'static,
        E: EnrollmentRepository + 'static,
    {
        Self {
            user_service: Arc::new(UserService::new(users)),
            course_service: Arc::new(CourseService::new(courses)),
            gradebook_service: Arc::new(GradebookService::new(enrollments, duplicate_policy)),
        }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, DomainError>;
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Trait for course service operations
#[async_trait::async_trait]
pub trait CourseServiceTrait: Send + Sync {
    async fn get(&self, id: CourseId) -> Result<Option<Course>, DomainError>;
    async fn list(&self) -> Result<Vec<Course>, DomainError>;
    async fn create(&self, request: CreateCourseRequest) -> Result<Course, DomainError>;
    async fn update(&self, id: CourseId, request: UpdateCourseRequest)
    -> Result<Course, DomainError>;
    async fn delete(&self, id: CourseId) -> Result<bool, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Trait for enrollment, join and average operations
#[async_trait::async_trait]
pub trait GradebookServiceTrait: Send + Sync {
    async fn courses_for_user(&self, user_id: UserId)
    -> Result<Vec<CourseWithGrade>, DomainError>;
    async fn grade_average(&self, user_id: UserId) -> Result<GradeAverage, DomainError>;
    async fn enroll(
        &self,
        user_id: UserId,
        request: EnrollRequest,
    ) -> Result<Enrollment, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        UserService::delete(self, id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        UserService::ping(self).await
    }
}

#[async_trait::async_trait]
impl<R: CourseRepository + 'static> CourseServiceTrait for CourseService<R> {
    async fn get(&self, id: CourseId) -> Result<Option<Course>, DomainError> {
        CourseService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<Course>, DomainError> {
        CourseService::list(self).await
    }

    async fn create(&self, request: CreateCourseRequest) -> Result<Course, DomainError> {
        CourseService::create(self, request).await
    }

    async fn update(
        &self,
        id: CourseId,
        request: UpdateCourseRequest,
    ) -> Result<Course, DomainError> {
        CourseService::update(self, id, request).await
    }

    async fn delete(&self, id: CourseId) -> Result<bool, DomainError> {
        CourseService::delete(self, id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        CourseService::ping(self).await
    }
}

#[async_trait::async_trait]
impl<R: EnrollmentRepository + 'static> GradebookServiceTrait for GradebookService<R> {
    async fn courses_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CourseWithGrade>, DomainError> {
        GradebookService::courses_for_user(self, user_id).await
    }

    async fn grade_average(&self, user_id: UserId) -> Result<GradeAverage, DomainError> {
        GradebookService::grade_average(self, user_id).await
    }

    async fn enroll(
        &self,
        user_id: UserId,
        request: EnrollRequest,
    ) -> Result<Enrollment, DomainError> {
        GradebookService::enroll(self, user_id, request).await
    }
}
