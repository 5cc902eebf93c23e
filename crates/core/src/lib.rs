//! TaskBase core data models.
//!
//! This crate defines the canonical in-memory representation of the
//! department dashboard's domain objects and the normalization rules
//! that turn loosely-typed wire payloads into them.

#![warn(missing_docs)]

// Core identities
mod id;

// Domain entities
mod employee;
mod project;
mod stage;
mod task;

// Periods and scoring
mod period;
mod score;

// Wire boundary
mod canonical;
mod draft;

// Re-exports
pub use id::*;

// Entities
pub use employee::{Employee, EmployeeStatus};
pub use project::{Project, ProjectFilter, ProjectStatus};
pub use stage::Stage;
pub use task::{Difficulty, Task, TaskFilter, TaskStatus};

// Periods & scoring
pub use period::Period;
pub use score::{
    reference_score, ScoreBand, ScoreNorms, ScoredEmployee, EMPLOYEE_POINTS_PER_DAY,
};

// Canonicalization
pub use canonical::{
    canonicalize_employee, canonicalize_project, canonicalize_stage, canonicalize_task,
    normalize_date, normalize_executor_ids, RawEmployee, RawIdList, RawProject, RawStage, RawTask,
};

// Write-time validation
pub use draft::{EmployeeDraft, ProjectDraft, TaskDraft, ValidationError};

/// Calendar date type. The domain carries no time-of-day component.
pub type Day = chrono::NaiveDate;
