//! Course endpoints

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path};
use crate::domain::{Course, CourseId};
use crate::infrastructure::course::{CreateCourseRequest, UpdateCourseRequest};

/// Request to create a new course
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseApiRequest {
    pub name: String,
    pub weight: i32,
}

/// Request to update a course
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseApiRequest {
    pub name: Option<String>,
    pub weight: Option<i32>,
}

/// Course response
#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: i32,
    pub name: String,
    pub weight: i32,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id().value(),
            name: course.name().to_string(),
            weight: course.weight(),
        }
    }
}

/// GET /courses
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    debug!("Listing courses");

    let courses = state.course_service.list().await?;

    Ok(Json(courses.iter().map(CourseResponse::from).collect()))
}

/// POST /courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(request): Json<CreateCourseApiRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    debug!(name = %request.name, weight = request.weight, "Creating course");

    let course = state
        .course_service
        .create(CreateCourseRequest {
            name: request.name,
            weight: request.weight,
        })
        .await?;

    Ok(Json(CourseResponse::from(&course)))
}

/// GET /courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CourseResponse>, ApiError> {
    debug!(course_id = id, "Getting course");

    let course = state
        .course_service
        .get(CourseId::new(id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Course '{}' not found", id)))?;

    Ok(Json(CourseResponse::from(&course)))
}

/// PUT /courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCourseApiRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    debug!(course_id = id, "Updating course");

    let course = state
        .course_service
        .update(
            CourseId::new(id),
            UpdateCourseRequest {
                name: request.name,
                weight: request.weight,
            },
        )
        .await?;

    Ok(Json(CourseResponse::from(&course)))
}

/// DELETE /courses/{id}
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    debug!(course_id = id, "Deleting course");

    let deleted = state.course_service.delete(CourseId::new(id)).await?;

    if !deleted {
        return Err(ApiError::not_found(format!("Course '{}' not found", id)));
    }

    Ok(Json(json!({
        "deleted": true,
        "id": id
    })))
}
