//! Configurable in-memory backend for reconciler tests.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use taskbase_client::{ApiError, Backend, Result};
use taskbase_core::{
    Day, Difficulty, Employee, EmployeeDraft, EmployeeId, EmployeeStatus, Period, Project,
    ProjectDraft, ProjectFilter, ProjectId, ProjectStatus, ScoredEmployee, Stage, StageId, Task,
    TaskDraft, TaskFilter, TaskId, TaskStatus,
};

use taskbase_client::payload::{EmployeePatch, ProjectPatch, TaskPatch};

/// Backend double that records every call, can fail selected operations,
/// and can hold selected operations at a gate until the test releases
/// them.
#[derive(Default)]
pub struct MockBackend {
    pub employees: Mutex<Vec<Employee>>,
    pub employee_tasks: Mutex<HashMap<EmployeeId, Vec<Task>>>,
    pub employee_scores: Mutex<HashMap<EmployeeId, i64>>,
    pub projects: Mutex<Vec<Project>>,
    pub project_stages: Mutex<HashMap<ProjectId, Vec<Stage>>>,
    pub stage_tasks: Mutex<HashMap<StageId, Vec<Task>>>,
    pub project_scores: Mutex<HashMap<ProjectId, i64>>,
    pub department_score: Mutex<i64>,
    pub top: Mutex<Vec<ScoredEmployee>>,
    pub failing: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<(&'static str, i64), Arc<Semaphore>>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far, as `op:id` strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Make `op` (for the given id) block until the returned gate receives
    /// a permit.
    pub fn hold(&self, op: &'static str, id: i64) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.lock().unwrap().insert((op, id), Arc::clone(&gate));
        gate
    }

    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    async fn enter(&self, op: &'static str, id: i64) -> Result<()> {
        self.calls.lock().unwrap().push(format!("{op}:{id}"));
        let gate = self.gates.lock().unwrap().get(&(op, id)).cloned();
        if let Some(gate) = gate {
            let permit = gate.acquire().await.expect("gate closed");
            permit.forget();
        }
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::Status {
                status: 500,
                detail: format!("{op} failed"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn department_name(&self) -> Result<String> {
        self.enter("department_name", 0).await?;
        Ok("Engineering".into())
    }

    async fn department_score(&self, _period: Period) -> Result<i64> {
        self.enter("department_score", 0).await?;
        Ok(*self.department_score.lock().unwrap())
    }

    async fn top_employees(&self, _period: Period, limit: usize) -> Result<Vec<ScoredEmployee>> {
        self.enter("top_employees", limit as i64).await?;
        Ok(self.top.lock().unwrap().clone())
    }

    async fn employees(&self) -> Result<Vec<Employee>> {
        self.enter("employees", 0).await?;
        Ok(self.employees.lock().unwrap().clone())
    }

    async fn employee(&self, id: EmployeeId) -> Result<Employee> {
        self.enter("employee", id.value()).await?;
        self.employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                detail: "Employee not found".into(),
            })
    }

    async fn search_employees(&self, _query: &str) -> Result<Vec<Employee>> {
        self.enter("search_employees", 0).await?;
        Ok(self.employees.lock().unwrap().clone())
    }

    async fn employee_score(&self, id: EmployeeId, _period: Period) -> Result<i64> {
        self.enter("employee_score", id.value()).await?;
        Ok(self
            .employee_scores
            .lock()
            .unwrap()
            .get(&id)
            .copied()
            .unwrap_or(0))
    }

    async fn employee_tasks(&self, id: EmployeeId, _period: Period) -> Result<Vec<Task>> {
        self.enter("employee_tasks", id.value()).await?;
        Ok(self
            .employee_tasks
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee> {
        self.enter("create_employee", 0).await?;
        Ok(employee(99, &draft.name))
    }

    async fn update_employee(&self, id: EmployeeId, _patch: &EmployeePatch) -> Result<Employee> {
        self.enter("update_employee", id.value()).await?;
        Ok(employee(id.value(), "updated"))
    }

    async fn projects(&self, _filter: &ProjectFilter) -> Result<Vec<Project>> {
        self.enter("projects", 0).await?;
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn project_stages(&self, id: ProjectId) -> Result<Vec<Stage>> {
        self.enter("project_stages", id.value()).await?;
        Ok(self
            .project_stages
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn stage_tasks(&self, _project: ProjectId, stage: StageId) -> Result<Vec<Task>> {
        self.enter("stage_tasks", stage.value()).await?;
        Ok(self
            .stage_tasks
            .lock()
            .unwrap()
            .get(&stage)
            .cloned()
            .unwrap_or_default())
    }

    async fn project_score(&self, id: ProjectId, _period: Period) -> Result<i64> {
        self.enter("project_score", id.value()).await?;
        Ok(self
            .project_scores
            .lock()
            .unwrap()
            .get(&id)
            .copied()
            .unwrap_or(0))
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        self.enter("create_project", 0).await?;
        Ok(project(99, &draft.name))
    }

    async fn update_project(&self, id: ProjectId, _patch: &ProjectPatch) -> Result<Project> {
        self.enter("update_project", id.value()).await?;
        Ok(project(id.value(), "updated"))
    }

    async fn close_project(&self, id: ProjectId, _completed: Day) -> Result<()> {
        self.enter("close_project", id.value()).await
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        self.enter("delete_project", id.value()).await
    }

    async fn unassigned_tasks(&self, _filter: &TaskFilter) -> Result<Vec<Task>> {
        self.enter("unassigned_tasks", 0).await?;
        Ok(Vec::new())
    }

    async fn create_task(&self, _draft: &TaskDraft) -> Result<Task> {
        self.enter("create_task", 0).await?;
        Ok(task(99, None))
    }

    async fn update_task(&self, id: TaskId, _patch: &TaskPatch) -> Result<()> {
        self.enter("update_task", id.value()).await
    }

    async fn complete_task(&self, id: TaskId, _completed: Day) -> Result<()> {
        self.enter("complete_task", id.value()).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.enter("delete_task", id.value()).await
    }
}

// === Entity builders ===

pub fn period() -> Period {
    Period::new(
        Day::from_ymd_opt(2025, 6, 1).unwrap(),
        Day::from_ymd_opt(2025, 6, 30).unwrap(),
    )
    .unwrap()
}

pub fn employee(id: i64, name: &str) -> Employee {
    Employee {
        id: EmployeeId(id),
        name: name.into(),
        position: None,
        start_date: Day::from_ymd_opt(2024, 1, 1),
        status: EmployeeStatus::Active,
        status_start: None,
        status_end: None,
    }
}

pub fn project(id: i64, name: &str) -> Project {
    Project {
        id: ProjectId(id),
        name: name.into(),
        description: String::new(),
        created_date: Day::from_ymd_opt(2025, 1, 1),
        deadline: None,
        completed_date: None,
        status: ProjectStatus::InProgress,
    }
}

pub fn stage(id: i64, project_id: i64, order: i64) -> Stage {
    Stage {
        id: StageId(id),
        project_id: ProjectId(project_id),
        name: format!("stage {id}"),
        order,
    }
}

pub fn task(id: i64, stage: Option<(i64, i64)>) -> Task {
    let (project_id, stage_id) = match stage {
        Some((project, stage)) => (Some(ProjectId(project)), Some(StageId(stage))),
        None => (None, None),
    };
    Task {
        id: TaskId(id),
        name: format!("task {id}"),
        description: String::new(),
        created_date: Day::from_ymd_opt(2025, 6, 2),
        deadline: Day::from_ymd_opt(2025, 6, 20),
        completed_date: None,
        difficulty: Difficulty::Medium,
        status: TaskStatus::InProgress,
        executor_ids: BTreeSet::from([EmployeeId(1)]),
        project_id,
        stage_id,
    }
}
