//! Enrollment infrastructure module
//!
//! PostgreSQL join/aggregate queries and the gradebook service.

mod postgres_repository;
mod service;

pub use postgres_repository::PostgresEnrollmentRepository;
pub use service::{EnrollRequest, GradebookService};
