//! Scoring display helpers.
//!
//! Scores themselves are computed by the backend; this module only carries
//! the derived read models and the gauge arithmetic the dashboard renders.

use serde::{Deserialize, Serialize};

use crate::id::EmployeeId;
use crate::period::Period;

/// Expected score accrual per employee per day. The reference baseline for
/// a period scales linearly with its length at this rate.
pub const EMPLOYEE_POINTS_PER_DAY: f64 = 0.5;

/// An employee together with their score over some period. Computed by the
/// backend; carries no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredEmployee {
    /// The employee scored
    pub employee_id: EmployeeId,

    /// Name, denormalized for display
    pub name: String,

    /// Accrued score, non-negative
    pub score: i64,
}

/// Reference baseline for a period: the score an employee is expected to
/// reach, rounded to the nearest whole point.
pub fn reference_score(period: &Period) -> i64 {
    (period.day_span() as f64 * EMPLOYEE_POINTS_PER_DAY).round() as i64
}

/// Thresholds dividing scores into gauge bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreNorms {
    /// Upper bound of the low band (inclusive)
    pub low: i64,

    /// Upper bound of the middle band (inclusive)
    pub high: i64,
}

impl ScoreNorms {
    /// Classify a score against these thresholds.
    pub fn band(&self, score: i64) -> ScoreBand {
        if score <= self.low {
            ScoreBand::Low
        } else if score <= self.high {
            ScoreBand::Middle
        } else {
            ScoreBand::High
        }
    }
}

/// Gauge band for a score, the dashboard's traffic light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// At or below the low norm
    Low,

    /// Between the norms
    Middle,

    /// Above the high norm
    High,
}
