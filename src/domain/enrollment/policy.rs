//! Duplicate enrollment policy

use serde::{Deserialize, Serialize};

/// What to do when a user is enrolled in a course they already have a row for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Insert another row; the course then counts once per row in averages
    Append,
    /// Overwrite the grade of the existing row
    #[default]
    Replace,
    /// Refuse the enrollment with a conflict
    Reject,
}

impl DuplicatePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "append" | "allow" => Some(Self::Append),
            "replace" | "upsert" => Some(Self::Replace),
            "reject" | "deny" => Some(Self::Reject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Replace => "replace",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
