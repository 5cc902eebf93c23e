//! Task model - the unit of scored work.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::id::{EmployeeId, ProjectId, StageId, TaskId};
use crate::Day;

/// A task assigned to one or more employees, optionally filed under a
/// project stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Task name
    pub name: String,

    /// Detailed description. Never null in canonical form; the wire's
    /// missing description becomes an empty string.
    pub description: String,

    /// When the task was opened
    pub created_date: Option<Day>,

    /// Due date
    pub deadline: Option<Day>,

    /// Actual completion date. Set only when `status` is `Done`;
    /// canonicalization clears it otherwise.
    pub completed_date: Option<Day>,

    /// Scoring weight
    pub difficulty: Difficulty,

    /// Current status
    pub status: TaskStatus,

    /// Assigned employees. Always a deduplicated set in canonical form,
    /// never the wire's delimited string.
    pub executor_ids: BTreeSet<EmployeeId>,

    /// Owning project, if the task is filed under one
    pub project_id: Option<ProjectId>,

    /// Owning stage. Present only together with `project_id`.
    pub stage_id: Option<StageId>,
}

impl Task {
    /// Whether the deadline has passed without completion, judged against
    /// the given day.
    pub fn is_overdue_on(&self, today: Day) -> bool {
        match (self.status, self.deadline) {
            (TaskStatus::Done, _) => false,
            (_, Some(deadline)) => today > deadline,
            _ => false,
        }
    }

    /// Score contribution of this task: its weight once done, else zero.
    pub fn score(&self) -> i64 {
        if self.status == TaskStatus::Done {
            self.difficulty.weight()
        } else {
            0
        }
    }
}

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Open and being worked on
    #[default]
    InProgress,

    /// Finished with a completion date
    Done,

    /// Past deadline without completion
    Overdue,
}

impl TaskStatus {
    /// Parse a wire status string, accepting both the canonical form and
    /// the legacy localized vocabulary. Unknown values degrade to
    /// `InProgress`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("in-progress") | Some("в работе") => Self::InProgress,
            Some("done") | Some("выполнено") => Self::Done,
            Some("overdue") | Some("просрочено") => Self::Overdue,
            _ => Self::InProgress,
        }
    }

    /// Canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task difficulty, the enumerated scoring weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Weight 1
    #[default]
    Easy,

    /// Weight 2
    Medium,

    /// Weight 4
    Hard,
}

impl Difficulty {
    /// Numeric scoring weight.
    pub fn weight(self) -> i64 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 4,
        }
    }

    /// Coerce an arbitrary wire weight to the nearest enumerated value.
    /// The midpoint 3 rounds down to `Medium`; old rows contain it because
    /// the backend accepted the full 1..=4 range.
    pub fn from_weight(raw: i64) -> Self {
        if raw <= 1 {
            Self::Easy
        } else if raw <= 3 {
            Self::Medium
        } else {
            Self::Hard
        }
    }
}

/// Filter for querying tasks that sit outside any project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Restrict to tasks created in this period
    pub period: Option<crate::Period>,

    /// Case-insensitive name substring
    pub query: Option<String>,

    /// Filter by status
    pub status: Option<TaskStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_coercion_clamps_to_known_weights() {
        assert_eq!(Difficulty::from_weight(0), Difficulty::Easy);
        assert_eq!(Difficulty::from_weight(1), Difficulty::Easy);
        assert_eq!(Difficulty::from_weight(2), Difficulty::Medium);
        assert_eq!(Difficulty::from_weight(3), Difficulty::Medium);
        assert_eq!(Difficulty::from_weight(4), Difficulty::Hard);
        assert_eq!(Difficulty::from_weight(99), Difficulty::Hard);
    }

    #[test]
    fn legacy_status_strings_map_to_canonical_values() {
        assert_eq!(TaskStatus::from_wire(Some("в работе")), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_wire(Some("выполнено")), TaskStatus::Done);
        assert_eq!(TaskStatus::from_wire(Some("просрочено")), TaskStatus::Overdue);
        assert_eq!(TaskStatus::from_wire(Some("done")), TaskStatus::Done);
        assert_eq!(TaskStatus::from_wire(Some("unheard-of")), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_wire(None), TaskStatus::InProgress);
    }

    #[test]
    fn done_tasks_score_their_weight() {
        let task = Task {
            id: TaskId(1),
            name: "write report".into(),
            description: String::new(),
            created_date: None,
            deadline: None,
            completed_date: None,
            difficulty: Difficulty::Hard,
            status: TaskStatus::Done,
            executor_ids: BTreeSet::new(),
            project_id: None,
            stage_id: None,
        };
        assert_eq!(task.score(), 4);

        let open = Task {
            status: TaskStatus::InProgress,
            ..task
        };
        assert_eq!(open.score(), 0);
    }
}
