//! The canonicalization layer.
//!
//! The backend's wire format is inconsistent across endpoints: executor
//! lists arrive as JSON arrays on some and comma-delimited strings on
//! others, optional fields are sometimes omitted entirely, and older rows
//! carry a legacy status vocabulary. Every response passes through this
//! module exactly once so that all views observe one canonical shape.
//!
//! Normalization is total: it never raises, and malformed fields degrade
//! to safe defaults (empty set, unset date, default status). Strictness
//! belongs at the point of user-initiated writes, not at read time.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::employee::{Employee, EmployeeStatus};
use crate::id::{EmployeeId, ProjectId, StageId, TaskId};
use crate::project::{Project, ProjectStatus};
use crate::stage::Stage;
use crate::task::{Difficulty, Task, TaskStatus};
use crate::Day;

/// Executor list as it appears on the wire: a JSON array of numbers or
/// numeric strings, or a single comma-delimited string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawIdList {
    /// JSON array form
    Ids(Vec<serde_json::Value>),

    /// Delimited string form
    Csv(String),
}

impl From<&BTreeSet<EmployeeId>> for RawIdList {
    fn from(ids: &BTreeSet<EmployeeId>) -> Self {
        Self::Ids(ids.iter().map(|id| serde_json::json!(id.value())).collect())
    }
}

/// Normalize an executor field into a deduplicated id set.
///
/// Tokens that do not parse as integers are discarded; empty or absent
/// input yields an empty set. Idempotent: normalizing the set's own
/// re-encoding returns the same set.
pub fn normalize_executor_ids(raw: Option<&RawIdList>) -> BTreeSet<EmployeeId> {
    let mut ids = BTreeSet::new();
    match raw {
        None => {}
        Some(RawIdList::Ids(values)) => {
            for value in values {
                let parsed = match value {
                    serde_json::Value::Number(n) => n.as_i64(),
                    serde_json::Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                };
                if let Some(id) = parsed {
                    ids.insert(EmployeeId(id));
                }
            }
        }
        Some(RawIdList::Csv(csv)) => {
            for token in csv.split(',') {
                if let Ok(id) = token.trim().parse() {
                    ids.insert(EmployeeId(id));
                }
            }
        }
    }
    ids
}

/// Normalize a wire date into a calendar day.
///
/// Accepts `YYYY-MM-DD`, loosely padded `YYYY-M-D`, and timestamp strings
/// with a date prefix. Anything unparseable, including impossible calendar
/// dates, is the unset value.
pub fn normalize_date(raw: Option<&str>) -> Option<Day> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    // Strip any time-of-day suffix
    let date_part = raw
        .split(['T', ' '])
        .next()
        .unwrap_or(raw);
    let mut parts = date_part.splitn(3, '-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;
    Day::from_ymd_opt(year, month, day)
}

/// A task as the wire delivers it. Every field is optional so one type
/// covers list rows, detail responses, and the abbreviated create
/// response alike.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTask {
    /// Backend id
    #[serde(default)]
    pub id: Option<i64>,

    /// Name
    #[serde(default)]
    pub name: Option<String>,

    /// Description, often omitted
    #[serde(default)]
    pub description: Option<String>,

    /// Creation date string
    #[serde(default)]
    pub created_date: Option<String>,

    /// Deadline date string
    #[serde(default)]
    pub deadline: Option<String>,

    /// Completion date string
    #[serde(default)]
    pub completed_date: Option<String>,

    /// Raw difficulty weight
    #[serde(default)]
    pub difficulty: Option<i64>,

    /// Status in either vocabulary
    #[serde(default)]
    pub status: Option<String>,

    /// Executor list in either encoding
    #[serde(default)]
    pub executor_ids: Option<RawIdList>,

    /// Owning project id
    #[serde(default)]
    pub project_id: Option<i64>,

    /// Owning stage id
    #[serde(default)]
    pub stage_id: Option<i64>,
}

/// Build a canonical [`Task`] from a raw record.
pub fn canonicalize_task(raw: RawTask) -> Task {
    let status = TaskStatus::from_wire(raw.status.as_deref());
    let project_id = raw.project_id.map(ProjectId);
    Task {
        id: TaskId(raw.id.unwrap_or_default()),
        name: raw.name.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        created_date: normalize_date(raw.created_date.as_deref()),
        deadline: normalize_date(raw.deadline.as_deref()),
        // Completion only makes sense for done tasks
        completed_date: if status == TaskStatus::Done {
            normalize_date(raw.completed_date.as_deref())
        } else {
            None
        },
        difficulty: Difficulty::from_weight(raw.difficulty.unwrap_or(1)),
        status,
        executor_ids: normalize_executor_ids(raw.executor_ids.as_ref()),
        // A stage without a project is meaningless
        stage_id: project_id.and(raw.stage_id.map(StageId)),
        project_id,
    }
}

/// An employee as the wire delivers it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEmployee {
    /// Backend id
    #[serde(default)]
    pub id: Option<i64>,

    /// Name
    #[serde(default)]
    pub name: Option<String>,

    /// Position
    #[serde(default)]
    pub position: Option<String>,

    /// Employment start date string
    #[serde(default)]
    pub start_date: Option<String>,

    /// Status in either vocabulary
    #[serde(default)]
    pub status: Option<String>,

    /// Status interval start date string
    #[serde(default)]
    pub status_start: Option<String>,

    /// Status interval end date string
    #[serde(default)]
    pub status_end: Option<String>,
}

/// Build a canonical [`Employee`] from a raw record.
pub fn canonicalize_employee(raw: RawEmployee) -> Employee {
    let status = EmployeeStatus::from_wire(raw.status.as_deref());
    let active = status == EmployeeStatus::Active;
    Employee {
        id: EmployeeId(raw.id.unwrap_or_default()),
        name: raw.name.unwrap_or_default(),
        position: raw.position.filter(|p| !p.trim().is_empty()),
        start_date: normalize_date(raw.start_date.as_deref()),
        status,
        // Interval fields only carry meaning away from the active status
        status_start: if active {
            None
        } else {
            normalize_date(raw.status_start.as_deref())
        },
        status_end: if active {
            None
        } else {
            normalize_date(raw.status_end.as_deref())
        },
    }
}

/// A project as the wire delivers it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProject {
    /// Backend id
    #[serde(default)]
    pub id: Option<i64>,

    /// Name
    #[serde(default)]
    pub name: Option<String>,

    /// Description, often omitted
    #[serde(default)]
    pub description: Option<String>,

    /// Creation date string
    #[serde(default)]
    pub created_date: Option<String>,

    /// Deadline date string
    #[serde(default)]
    pub deadline: Option<String>,

    /// Completion date string
    #[serde(default)]
    pub completed_date: Option<String>,

    /// Status in either vocabulary
    #[serde(default)]
    pub status: Option<String>,
}

/// Build a canonical [`Project`] from a raw record.
pub fn canonicalize_project(raw: RawProject) -> Project {
    let status = ProjectStatus::from_wire(raw.status.as_deref());
    Project {
        id: ProjectId(raw.id.unwrap_or_default()),
        name: raw.name.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        created_date: normalize_date(raw.created_date.as_deref()),
        deadline: normalize_date(raw.deadline.as_deref()),
        // Completion only makes sense for completed projects
        completed_date: if status == ProjectStatus::Completed {
            normalize_date(raw.completed_date.as_deref())
        } else {
            None
        },
        status,
    }
}

/// A stage as the wire delivers it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStage {
    /// Backend id
    #[serde(default)]
    pub id: Option<i64>,

    /// Name
    #[serde(default)]
    pub name: Option<String>,

    /// Owning project id, often omitted on nested responses
    #[serde(default)]
    pub project_id: Option<i64>,

    /// Rank within the project
    #[serde(default)]
    pub order: Option<i64>,
}

/// Build a canonical [`Stage`] from a raw record.
///
/// `owner` is the project the stage was fetched for; the wire's own
/// project id wins when present. `rank` is the record's position in the
/// response, used when the wire omits an explicit order.
pub fn canonicalize_stage(raw: RawStage, owner: ProjectId, rank: i64) -> Stage {
    Stage {
        id: StageId(raw.id.unwrap_or_default()),
        project_id: raw.project_id.map(ProjectId).unwrap_or(owner),
        name: raw.name.unwrap_or_default(),
        order: raw.order.unwrap_or(rank),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> BTreeSet<EmployeeId> {
        raw.iter().copied().map(EmployeeId).collect()
    }

    #[test]
    fn executor_csv_is_split_trimmed_and_deduplicated() {
        let raw = RawIdList::Csv("3, 1, 1, 2".into());
        assert_eq!(normalize_executor_ids(Some(&raw)), ids(&[1, 2, 3]));
    }

    #[test]
    fn executor_arrays_accept_numbers_and_numeric_strings() {
        let raw: RawIdList = serde_json::from_str(r#"[2, "7", 2, "x", null]"#).unwrap();
        assert_eq!(normalize_executor_ids(Some(&raw)), ids(&[2, 7]));
    }

    #[test]
    fn empty_and_absent_executors_yield_empty_sets() {
        assert!(normalize_executor_ids(None).is_empty());
        let empty: RawIdList = serde_json::from_str("[]").unwrap();
        assert!(normalize_executor_ids(Some(&empty)).is_empty());
        let garbage = RawIdList::Csv("ab, ,cd".into());
        assert!(normalize_executor_ids(Some(&garbage)).is_empty());
    }

    #[test]
    fn executor_normalization_is_idempotent() {
        for input in [
            RawIdList::Csv("3, 1, 1, 2".into()),
            RawIdList::Csv(String::new()),
            serde_json::from_str(r#"["5", 5, 9]"#).unwrap(),
        ] {
            let once = normalize_executor_ids(Some(&input));
            let again = normalize_executor_ids(Some(&RawIdList::from(&once)));
            assert_eq!(once, again);
        }
    }

    #[test]
    fn dates_normalize_regardless_of_padding() {
        let expected = Day::from_ymd_opt(2025, 3, 4);
        assert_eq!(normalize_date(Some("2025-03-04")), expected);
        assert_eq!(normalize_date(Some("2025-3-4")), expected);
        assert_eq!(normalize_date(Some("2025-03-04T10:30:00")), expected);
        assert_eq!(normalize_date(Some("2025-03-04 10:30:00")), expected);
    }

    #[test]
    fn bad_dates_become_unset_without_panicking() {
        assert_eq!(normalize_date(None), None);
        assert_eq!(normalize_date(Some("")), None);
        assert_eq!(normalize_date(Some("not-a-date")), None);
        assert_eq!(normalize_date(Some("2025-13-01")), None);
        assert_eq!(normalize_date(Some("2025-02-30")), None);
        assert_eq!(normalize_date(Some("2025-03")), None);
    }

    #[test]
    fn raw_task_canonicalizes_with_defaults() {
        let raw: RawTask = serde_json::from_str(
            r#"{"id":5, "executor_ids":"2,2,7", "deadline":"2025-01-10", "created_date":"2025-01-01"}"#,
        )
        .unwrap();
        let task = canonicalize_task(raw);
        assert_eq!(task.id, TaskId(5));
        assert_eq!(task.executor_ids, ids(&[2, 7]));
        assert_eq!(task.deadline, Day::from_ymd_opt(2025, 1, 10));
        assert_eq!(task.created_date, Day::from_ymd_opt(2025, 1, 1));
        assert_eq!(task.description, "");
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn create_response_shape_canonicalizes_like_a_read() {
        let raw: RawTask = serde_json::from_str(r#"{"id":12, "name":"prepare report"}"#).unwrap();
        let task = canonicalize_task(raw);
        assert_eq!(task.id, TaskId(12));
        assert_eq!(task.name, "prepare report");
        assert!(task.executor_ids.is_empty());
        assert_eq!(task.created_date, None);
    }

    #[test]
    fn completion_date_is_cleared_unless_done() {
        let raw = RawTask {
            id: Some(1),
            status: Some("в работе".into()),
            completed_date: Some("2025-05-01".into()),
            ..RawTask::default()
        };
        assert_eq!(canonicalize_task(raw).completed_date, None);

        let done = RawTask {
            id: Some(1),
            status: Some("done".into()),
            completed_date: Some("2025-05-01".into()),
            ..RawTask::default()
        };
        assert_eq!(
            canonicalize_task(done).completed_date,
            Day::from_ymd_opt(2025, 5, 1)
        );
    }

    #[test]
    fn stage_without_project_loses_its_stage_id() {
        let raw = RawTask {
            id: Some(3),
            stage_id: Some(9),
            ..RawTask::default()
        };
        let task = canonicalize_task(raw);
        assert_eq!(task.project_id, None);
        assert_eq!(task.stage_id, None);
    }

    #[test]
    fn active_employee_loses_status_interval() {
        let raw = RawEmployee {
            id: Some(4),
            name: Some("Ivanov".into()),
            status: Some("работает".into()),
            status_start: Some("2025-01-01".into()),
            status_end: Some("2025-02-01".into()),
            ..RawEmployee::default()
        };
        let emp = canonicalize_employee(raw);
        assert_eq!(emp.status, EmployeeStatus::Active);
        assert_eq!(emp.status_start, None);
        assert_eq!(emp.status_end, None);
    }

    #[test]
    fn on_leave_employee_keeps_status_interval() {
        let raw = RawEmployee {
            id: Some(4),
            status: Some("в отпуске".into()),
            status_start: Some("2025-01-01".into()),
            status_end: Some("2025-02-01".into()),
            ..RawEmployee::default()
        };
        let emp = canonicalize_employee(raw);
        assert_eq!(emp.status, EmployeeStatus::OnLeave);
        assert_eq!(emp.status_start, Day::from_ymd_opt(2025, 1, 1));
        assert_eq!(emp.status_end, Day::from_ymd_opt(2025, 2, 1));
    }

    #[test]
    fn uncompleted_project_loses_completed_date() {
        let raw = RawProject {
            id: Some(2),
            status: Some("в работе".into()),
            completed_date: Some("2025-06-01".into()),
            ..RawProject::default()
        };
        let project = canonicalize_project(raw);
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.completed_date, None);
    }

    #[test]
    fn stage_rank_fills_missing_order() {
        let raw = RawStage {
            id: Some(7),
            name: Some("design".into()),
            ..RawStage::default()
        };
        let stage = canonicalize_stage(raw, ProjectId(3), 2);
        assert_eq!(stage.project_id, ProjectId(3));
        assert_eq!(stage.order, 2);
    }
}
