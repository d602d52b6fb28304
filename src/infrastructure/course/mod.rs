//! Course infrastructure module

mod postgres_repository;
mod service;

pub use postgres_repository::PostgresCourseRepository;
pub use service::{CourseService, CreateCourseRequest, UpdateCourseRequest};
