//! User infrastructure module
//!
//! PostgreSQL persistence and the user service.

mod postgres_repository;
mod service;

pub use postgres_repository::PostgresUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
