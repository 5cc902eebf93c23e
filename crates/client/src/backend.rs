//! Backend contract abstraction.

use async_trait::async_trait;
use taskbase_core::{
    Day, Employee, EmployeeDraft, EmployeeId, Period, Project, ProjectDraft, ProjectFilter,
    ProjectId, ScoredEmployee, Stage, StageId, Task, TaskDraft, TaskFilter, TaskId,
};

use crate::payload::{EmployeePatch, ProjectPatch, TaskPatch};

/// Error type for backend operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, DNS, or timeout failure before a response arrived
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("backend rejected the request ({status}): {detail}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error detail from the response body, if any
        detail: String,
    },

    /// The response body did not decode as the expected shape
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A delete was attempted without a configured confirmation secret
    #[error("delete password is not configured")]
    MissingSecret,
}

impl ApiError {
    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// The set of backend operations the dashboard depends on.
///
/// This trait allows the view-state layer to be exercised against a mock
/// backend in tests. No operation retries on failure; callers surface the
/// error and keep whatever data they already hold.
#[async_trait]
pub trait Backend: Send + Sync {
    // === Department ===

    /// Display name of the tracked department.
    async fn department_name(&self) -> Result<String>;

    /// Total department score over a period.
    async fn department_score(&self, period: Period) -> Result<i64>;

    /// Best-scoring employees over a period, highest first.
    async fn top_employees(&self, period: Period, limit: usize) -> Result<Vec<ScoredEmployee>>;

    // === Employees ===

    /// Full employee roster.
    async fn employees(&self) -> Result<Vec<Employee>>;

    /// A single employee by id.
    async fn employee(&self, id: EmployeeId) -> Result<Employee>;

    /// Employees whose name contains the query, case-insensitive.
    async fn search_employees(&self, query: &str) -> Result<Vec<Employee>>;

    /// One employee's score over a period.
    async fn employee_score(&self, id: EmployeeId, period: Period) -> Result<i64>;

    /// Tasks assigned to an employee, created within a period.
    async fn employee_tasks(&self, id: EmployeeId, period: Period) -> Result<Vec<Task>>;

    /// Create an employee.
    async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee>;

    /// Update an employee.
    async fn update_employee(&self, id: EmployeeId, patch: &EmployeePatch) -> Result<Employee>;

    // === Projects & stages ===

    /// Projects matching the filter.
    async fn projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>>;

    /// Stages of a project, in rank order.
    async fn project_stages(&self, id: ProjectId) -> Result<Vec<Stage>>;

    /// Tasks filed under one stage of a project.
    async fn stage_tasks(&self, project: ProjectId, stage: StageId) -> Result<Vec<Task>>;

    /// A project's score over a period.
    async fn project_score(&self, id: ProjectId, period: Period) -> Result<i64>;

    /// Create a project.
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project>;

    /// Update a project.
    async fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project>;

    /// Close a project: sets its completion date and completed status.
    async fn close_project(&self, id: ProjectId, completed: Day) -> Result<()>;

    /// Delete a project. Requires the configured confirmation secret.
    async fn delete_project(&self, id: ProjectId) -> Result<()>;

    // === Tasks ===

    /// Tasks outside any project, matching the filter.
    async fn unassigned_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Create a task. The backend answers with an abbreviated entity that
    /// canonicalizes through the same path as a full read.
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task>;

    /// Update a task. The backend acknowledges without returning the
    /// entity; callers re-fetch the owning list.
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<()>;

    /// Complete a task: sets its completion date and done status.
    async fn complete_task(&self, id: TaskId, completed: Day) -> Result<()>;

    /// Delete a task. Requires the configured confirmation secret.
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}
