//! Course entity

use serde::{Deserialize, Serialize};

/// Course identifier, assigned by the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(i32);

impl CourseId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for CourseId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Course entity
///
/// `weight` is the course's relative importance in a grade average. It is
/// not range-checked: zero and negative weights are stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    name: String,
    weight: i32,
}

impl Course {
    pub fn new(id: CourseId, name: impl Into<String>, weight: i32) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
        }
    }

    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_weight(&mut self, weight: i32) {
        self.weight = weight;
    }
}

/// A course that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub weight: i32,
}

impl NewCourse {
    pub fn new(name: impl Into<String>, weight: i32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    pub fn with_id(self, id: CourseId) -> Course {
        Course::new(id, self.name, self.weight)
    }
}
