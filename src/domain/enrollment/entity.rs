//! Enrollment entity and the course/grade join row

use serde::{Deserialize, Serialize};

use crate::domain::course::CourseId;
use crate::domain::user::UserId;

/// A user's enrollment in a course
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub grade: f64,
}

impl Enrollment {
    pub fn new(user_id: UserId, course_id: CourseId, grade: f64) -> Self {
        Self {
            user_id,
            course_id,
            grade,
        }
    }
}

/// One enrollment of a user joined with its course
///
/// `name` and `weight` are the course's values at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseWithGrade {
    pub id: CourseId,
    pub name: String,
    pub weight: i32,
    pub grade: f64,
}

impl CourseWithGrade {
    pub fn new(id: CourseId, name: impl Into<String>, weight: i32, grade: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            grade,
        }
    }
}
