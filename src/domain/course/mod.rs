//! Course domain

mod entity;
mod repository;

pub use entity::{Course, CourseId, NewCourse};
pub use repository::CourseRepository;
