//! Write payloads.
//!
//! Wire shapes for create and update calls. Patches follow the backend's
//! merge semantics: omitted fields keep their stored value, so optional
//! members skip serialization when unset. The status-interval fields use a
//! nested option because restoring an employee requires sending explicit
//! nulls, not omitting the fields.

use std::collections::BTreeSet;

use serde::Serialize;
use taskbase_core::{
    Day, EmployeeDraft, EmployeeId, EmployeeStatus, ProjectDraft, ProjectId, StageId, TaskDraft,
};

/// Create payload for an employee.
#[derive(Debug, Clone, Serialize)]
pub struct NewEmployee {
    /// Full name
    pub name: String,

    /// Job position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// First day of employment
    pub start_date: Day,
}

impl From<&EmployeeDraft> for NewEmployee {
    fn from(draft: &EmployeeDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            position: draft.position.clone(),
            start_date: draft.start_date,
        }
    }
}

/// Update payload for an employee. Unset fields are left untouched by the
/// backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmployeePatch {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// New employment start date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Day>,

    /// New employment status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,

    /// New status interval start; `Some(None)` writes an explicit null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_start: Option<Option<Day>>,

    /// New status interval end; `Some(None)` writes an explicit null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_end: Option<Option<Day>>,
}

impl EmployeePatch {
    /// Patch that puts an employee back to active and clears the status
    /// interval.
    pub fn restore() -> Self {
        Self {
            status: Some(EmployeeStatus::Active),
            status_start: Some(None),
            status_end: Some(None),
            ..Self::default()
        }
    }

    /// Patch that records a leave or termination interval.
    pub fn set_status(status: EmployeeStatus, from: Option<Day>, to: Option<Day>) -> Self {
        Self {
            status: Some(status),
            status_start: Some(from),
            status_end: Some(to),
            ..Self::default()
        }
    }
}

/// Create payload for a project.
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    /// Project name
    pub name: String,

    /// Description
    pub description: String,

    /// Target completion date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Day>,
}

impl From<&ProjectDraft> for NewProject {
    fn from(draft: &ProjectDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            deadline: draft.deadline,
        }
    }
}

/// Update payload for a project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectPatch {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New deadline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Day>,
}

/// Create payload for a task. Difficulty travels as its numeric weight and
/// the executor set as a plain array.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    /// Task name
    pub name: String,

    /// Description
    pub description: String,

    /// Numeric difficulty weight
    pub difficulty: i64,

    /// Due date
    pub deadline: Day,

    /// Assigned employees
    pub executor_ids: Vec<EmployeeId>,

    /// Owning project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,

    /// Owning stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<StageId>,
}

impl From<&TaskDraft> for NewTask {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            difficulty: draft.difficulty.weight(),
            deadline: draft.deadline,
            executor_ids: id_list(&draft.executor_ids),
            project_id: draft.project_id,
            stage_id: draft.stage_id,
        }
    }
}

/// Update payload for a task. Status transitions are not patchable; they
/// go through the dedicated complete endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New numeric difficulty weight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i64>,

    /// New creation date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<Day>,

    /// New deadline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Day>,

    /// Replacement executor set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_ids: Option<Vec<EmployeeId>>,
}

impl From<&TaskDraft> for TaskPatch {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            name: Some(draft.name.trim().to_string()),
            description: Some(draft.description.clone()),
            difficulty: Some(draft.difficulty.weight()),
            created_date: draft.created_date,
            deadline: Some(draft.deadline),
            executor_ids: Some(id_list(&draft.executor_ids)),
        }
    }
}

fn id_list(ids: &BTreeSet<EmployeeId>) -> Vec<EmployeeId> {
    ids.iter().copied().collect()
}
