//! Project model - a unit of department work composed of stages and tasks.

use serde::{Deserialize, Serialize};

use crate::id::ProjectId;
use crate::Day;

/// A project tracked by the department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Project name
    pub name: String,

    /// Description
    pub description: String,

    /// When the project was opened
    pub created_date: Option<Day>,

    /// Target completion date, if any
    pub deadline: Option<Day>,

    /// Actual completion date. Set only when `status` is `Completed`;
    /// canonicalization clears it otherwise.
    pub completed_date: Option<Day>,

    /// Current status
    pub status: ProjectStatus,
}

impl Project {
    /// Whether the deadline has passed without completion, judged against
    /// the given day.
    pub fn is_overdue_on(&self, today: Day) -> bool {
        match (self.status, self.deadline) {
            (ProjectStatus::Completed, _) => false,
            (_, Some(deadline)) => today > deadline,
            _ => false,
        }
    }
}

/// Project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Open and being worked on
    #[default]
    InProgress,

    /// Closed with a completion date
    Completed,

    /// Past deadline without completion
    Overdue,
}

impl ProjectStatus {
    /// Parse a wire status string, accepting both the canonical form and
    /// the legacy localized vocabulary. Unknown values degrade to
    /// `InProgress`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("in-progress") | Some("в работе") => Self::InProgress,
            Some("completed") | Some("завершен") | Some("завершён") => Self::Completed,
            Some("overdue") | Some("просрочено") => Self::Overdue,
            _ => Self::InProgress,
        }
    }

    /// Canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for querying projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFilter {
    /// Restrict to projects with activity or deadlines in this period
    pub period: Option<crate::Period>,

    /// Case-insensitive name substring
    pub query: Option<String>,

    /// Filter by status
    pub status: Option<ProjectStatus>,
}
