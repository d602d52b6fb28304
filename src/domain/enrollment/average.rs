//! Weighted grade average
//!
//! The average of a user's grades weighted by course weight:
//!
//! ```text
//! average = Σ(weight × grade) / Σ(weight)
//! ```
//!
//! Weights are widened to `f64` before multiplying and summing. They are
//! not validated, so zero or negative weights flow straight into the sums
//! and may yield averages outside the grade range.

use serde::{Deserialize, Serialize};

use super::entity::CourseWithGrade;

/// Result of averaging a user's grades
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum GradeAverage {
    /// The weighted average
    Grade(f64),
    /// No enrollments, or weights summing to exactly zero
    NoData,
}

impl GradeAverage {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Grade(value) => Some(*value),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl From<GradeAverage> for Option<f64> {
    fn from(average: GradeAverage) -> Self {
        average.value()
    }
}

impl From<Option<f64>> for GradeAverage {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::NoData, Self::Grade)
    }
}

/// Running sums for a weighted average
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GradeTotals {
    /// Σ(weight × grade)
    pub weighted_sum: f64,
    /// Σ(weight)
    pub weight_sum: f64,
    /// Number of enrollment rows folded in
    pub enrollments: usize,
}

impl GradeTotals {
    pub fn new(weighted_sum: f64, weight_sum: f64, enrollments: usize) -> Self {
        Self {
            weighted_sum,
            weight_sum,
            enrollments,
        }
    }

    /// Fold one enrollment into the sums
    pub fn add(&mut self, weight: i32, grade: f64) {
        let weight = f64::from(weight);
        self.weighted_sum += weight * grade;
        self.weight_sum += weight;
        self.enrollments += 1;
    }

    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a CourseWithGrade>) -> Self {
        rows.into_iter().fold(Self::default(), |mut totals, row| {
            totals.add(row.weight, row.grade);
            totals
        })
    }

    pub fn average(&self) -> GradeAverage {
        if self.enrollments == 0 || self.weight_sum == 0.0 {
            return GradeAverage::NoData;
        }

        GradeAverage::Grade(self.weighted_sum / self.weight_sum)
    }
}
