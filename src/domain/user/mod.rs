//! User domain
//!
//! Domain types and the repository trait for users.

mod entity;
mod repository;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
