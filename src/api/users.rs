//! User endpoints, including enrollment, the course join and grade averages

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path};
use crate::domain::{CourseId, CourseWithGrade, Enrollment, GradeAverage, User, UserId};
use crate::infrastructure::enrollment::EnrollRequest;
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Request to create a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserApiRequest {
    pub username: String,
    pub email: String,
}

/// Request to update a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserApiRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Request to enroll a user in a course
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollApiRequest {
    pub course_id: i32,
    pub grade: f64,
}

/// User response
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().value(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    debug!("Listing users");

    let users = state.user_service.list().await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(username = %request.username, "Creating user");

    let user = state
        .user_service
        .create(CreateUserRequest {
            username: request.username,
            email: request.email,
        })
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /users/{id}
///
/// Returns the courses the user is enrolled in, with grades.
pub async fn get_user_courses(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<CourseWithGrade>>, ApiError> {
    debug!(user_id = id, "Getting user courses");

    let courses = state
        .gradebook_service
        .courses_for_user(UserId::new(id))
        .await?;

    Ok(Json(courses))
}

/// GET /users/{id}/profile
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = id, "Getting user");

    let user = state
        .user_service
        .get(UserId::new(id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = id, "Updating user");

    let user = state
        .user_service
        .update(
            UserId::new(id),
            UpdateUserRequest {
                username: request.username,
                email: request.email,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    debug!(user_id = id, "Deleting user");

    let deleted = state.user_service.delete(UserId::new(id)).await?;

    if !deleted {
        return Err(ApiError::not_found(format!("User '{}' not found", id)));
    }

    Ok(Json(json!({
        "deleted": true,
        "id": id
    })))
}

/// POST /users/{id}/courses
pub async fn enroll_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<EnrollApiRequest>,
) -> Result<Json<Enrollment>, ApiError> {
    debug!(user_id = id, course_id = request.course_id, "Enrolling user");

    let enrollment = state
        .gradebook_service
        .enroll(
            UserId::new(id),
            EnrollRequest {
                course_id: CourseId::new(request.course_id),
                grade: request.grade,
            },
        )
        .await?;

    Ok(Json(enrollment))
}

/// GET /users/{id}/gradeaverage
///
/// Responds with a JSON number, or `null` when the user has nothing to
/// average.
pub async fn get_grade_average(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<GradeAverage>, ApiError> {
    debug!(user_id = id, "Getting grade average");

    let average = state
        .gradebook_service
        .grade_average(UserId::new(id))
        .await?;

    Ok(Json(average))
}
