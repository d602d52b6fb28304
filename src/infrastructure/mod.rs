//! Infrastructure layer - Storage backends and services

pub mod course;
pub mod enrollment;
pub mod logging;
pub mod storage;
pub mod user;
