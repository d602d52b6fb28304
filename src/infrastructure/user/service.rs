//! User service for user management

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

/// Request for updating a user; absent fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// User service
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        info!(username = %request.username, "Creating user");

        self.repository
            .create(NewUser::new(request.username, request.email))
            .await
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        debug!(id = %id, "Getting user");
        self.repository.get(id).await
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    /// Update a user
    pub async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, DomainError> {
        info!(id = %id, "Updating user");

        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if let Some(username) = request.username {
            user.set_username(username);
        }

        if let Some(email) = request.email {
            user.set_email(email);
        }

        self.repository.update(&user).await
    }

    /// Delete a user and their enrollments
    pub async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        info!(id = %id, "Deleting user");
        self.repository.delete(id).await
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repository.ping().await
    }
}
