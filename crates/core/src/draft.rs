//! Write-time validation.
//!
//! Reads are lenient (see `canonical`); writes are strict. A draft is
//! validated in full before any network call is issued, so a rejected
//! write never leaves the client.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::id::{EmployeeId, ProjectId, StageId};
use crate::task::Difficulty;
use crate::Day;

/// Errors reported to the user before a write reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Name is required for every entity
    #[error("name must not be empty")]
    EmptyName,

    /// Tasks need at least one executor once created
    #[error("at least one executor must be selected")]
    NoExecutors,

    /// Deadlines cannot precede creation
    #[error("deadline {deadline} is before creation date {created}")]
    DeadlineBeforeCreation {
        /// Creation date of the draft
        created: Day,
        /// Offending deadline
        deadline: Day,
    },

    /// A stage only exists inside a project
    #[error("a stage was chosen without a project")]
    StageWithoutProject,

    /// Date ranges must run forward
    #[error("period start {from} is after its end {to}")]
    InvertedPeriod {
        /// Start bound
        from: Day,
        /// End bound
        to: Day,
    },
}

/// A task as entered in the create/edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task name
    pub name: String,

    /// Description
    pub description: String,

    /// Scoring weight
    pub difficulty: Difficulty,

    /// Creation date; the backend defaults to today when unset
    pub created_date: Option<Day>,

    /// Due date
    pub deadline: Day,

    /// Assigned employees
    pub executor_ids: BTreeSet<EmployeeId>,

    /// Owning project, if filed under one
    pub project_id: Option<ProjectId>,

    /// Owning stage, requires `project_id`
    pub stage_id: Option<StageId>,
}

impl TaskDraft {
    /// Check every rule; the first violation wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.executor_ids.is_empty() {
            return Err(ValidationError::NoExecutors);
        }
        if let Some(created) = self.created_date {
            if self.deadline < created {
                return Err(ValidationError::DeadlineBeforeCreation {
                    created,
                    deadline: self.deadline,
                });
            }
        }
        if self.stage_id.is_some() && self.project_id.is_none() {
            return Err(ValidationError::StageWithoutProject);
        }
        Ok(())
    }
}

/// An employee as entered in the create/edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDraft {
    /// Full name
    pub name: String,

    /// Job position
    pub position: Option<String>,

    /// First day of employment
    pub start_date: Day,
}

impl EmployeeDraft {
    /// Check every rule; the first violation wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

/// A project as entered in the create/edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDraft {
    /// Project name
    pub name: String,

    /// Description
    pub description: String,

    /// Target completion date
    pub deadline: Option<Day>,
}

impl ProjectDraft {
    /// Check every rule; the first violation wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}
