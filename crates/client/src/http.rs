//! REST implementation of the backend contract.
//!
//! Every read deserializes into the lenient raw records from
//! `taskbase-core` and canonicalizes before returning, so the rest of the
//! client never sees a wire quirk. Errors come back as FastAPI-style
//! `{"detail": ...}` envelopes on non-success statuses.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use taskbase_core::{
    canonicalize_employee, canonicalize_project, canonicalize_stage, canonicalize_task, Day,
    Employee, EmployeeDraft, EmployeeId, Period, Project, ProjectDraft, ProjectFilter, ProjectId,
    RawEmployee, RawProject, RawStage, RawTask, ScoredEmployee, Stage, StageId, Task, TaskDraft,
    TaskFilter, TaskId,
};

use crate::backend::{ApiError, Backend, Result};
use crate::config::ClientConfig;
use crate::payload::{EmployeePatch, NewEmployee, NewProject, NewTask, ProjectPatch, TaskPatch};

/// Header carrying the delete confirmation secret.
const DELETE_PASSWORD_HEADER: &str = "X-Delete-Password";

/// HTTP backend over the TaskBase REST API.
pub struct HttpBackend {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    /// Build a backend from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(path, "GET");
        let resp = self.http.get(self.url(path)).query(query).send().await?;
        into_json(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        debug!(path, "POST");
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        into_json(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        debug!(path, "PUT");
        let resp = self.http.put(self.url(path)).json(body).send().await?;
        into_json(resp).await
    }

    /// PUT whose response body is only an acknowledgement.
    async fn put_ack<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        debug!(path, "PUT");
        let resp = self.http.put(self.url(path)).json(body).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let password = self
            .config
            .delete_password
            .as_deref()
            .ok_or(ApiError::MissingSecret)?;
        debug!(path, "DELETE");
        let resp = self
            .http
            .delete(self.url(path))
            .header(DELETE_PASSWORD_HEADER, password)
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn department_name(&self) -> Result<String> {
        let envelope: NameEnvelope = self.get("/stats/department_name", &[]).await?;
        Ok(envelope.department_name)
    }

    async fn department_score(&self, period: Period) -> Result<i64> {
        let envelope: ScoreEnvelope = self
            .get("/stats/department_score", &period_query(period))
            .await?;
        Ok(envelope.score)
    }

    async fn top_employees(&self, period: Period, limit: usize) -> Result<Vec<ScoredEmployee>> {
        let mut query = period_query(period);
        query.push(("n", limit.to_string()));
        self.get("/employees/top", &query).await
    }

    async fn employees(&self) -> Result<Vec<Employee>> {
        let raw: Vec<RawEmployee> = self.get("/employees", &[]).await?;
        Ok(raw.into_iter().map(canonicalize_employee).collect())
    }

    async fn employee(&self, id: EmployeeId) -> Result<Employee> {
        let raw: RawEmployee = self.get(&format!("/employees/{id}"), &[]).await?;
        Ok(canonicalize_employee(raw))
    }

    async fn search_employees(&self, query: &str) -> Result<Vec<Employee>> {
        let raw: Vec<RawEmployee> = self
            .get("/employees/search", &[("query", query.to_string())])
            .await?;
        Ok(raw.into_iter().map(canonicalize_employee).collect())
    }

    async fn employee_score(&self, id: EmployeeId, period: Period) -> Result<i64> {
        let envelope: ScoreEnvelope = self
            .get(&format!("/employees/{id}/score"), &period_query(period))
            .await?;
        Ok(envelope.score)
    }

    async fn employee_tasks(&self, id: EmployeeId, period: Period) -> Result<Vec<Task>> {
        let raw: Vec<RawTask> = self
            .get(&format!("/employees/{id}/tasks"), &period_query(period))
            .await?;
        Ok(raw.into_iter().map(canonicalize_task).collect())
    }

    async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee> {
        let raw: RawEmployee = self.post("/employees/", &NewEmployee::from(draft)).await?;
        Ok(canonicalize_employee(raw))
    }

    async fn update_employee(&self, id: EmployeeId, patch: &EmployeePatch) -> Result<Employee> {
        let raw: RawEmployee = self.put(&format!("/employees/{id}"), patch).await?;
        Ok(canonicalize_employee(raw))
    }

    async fn projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let mut query = Vec::new();
        if let Some(period) = filter.period {
            query.extend(period_query(period));
        }
        if let Some(text) = &filter.query {
            query.push(("query", text.clone()));
        }
        if let Some(status) = filter.status {
            query.push(("status", status.as_str().to_string()));
        }
        let raw: Vec<RawProject> = self.get("/projects", &query).await?;
        Ok(raw.into_iter().map(canonicalize_project).collect())
    }

    async fn project_stages(&self, id: ProjectId) -> Result<Vec<Stage>> {
        let raw: Vec<RawStage> = self.get(&format!("/projects/{id}/stages"), &[]).await?;
        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(rank, stage)| canonicalize_stage(stage, id, rank as i64))
            .collect())
    }

    async fn stage_tasks(&self, project: ProjectId, stage: StageId) -> Result<Vec<Task>> {
        let raw: Vec<RawTask> = self
            .get(&format!("/projects/{project}/{stage}/tasks"), &[])
            .await?;
        Ok(raw.into_iter().map(canonicalize_task).collect())
    }

    async fn project_score(&self, id: ProjectId, period: Period) -> Result<i64> {
        let envelope: ScoreEnvelope = self
            .get(&format!("/projects/{id}/score"), &period_query(period))
            .await?;
        Ok(envelope.score)
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        let raw: RawProject = self.post("/projects/", &NewProject::from(draft)).await?;
        Ok(canonicalize_project(raw))
    }

    async fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project> {
        let raw: RawProject = self.put(&format!("/projects/{id}"), patch).await?;
        Ok(canonicalize_project(raw))
    }

    async fn close_project(&self, id: ProjectId, completed: Day) -> Result<()> {
        self.put_ack(
            &format!("/projects/{id}/close"),
            &CompletionBody {
                completed_date: completed,
            },
        )
        .await
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        self.delete(&format!("/projects/{id}")).await
    }

    async fn unassigned_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut query = Vec::new();
        if let Some(period) = filter.period {
            query.extend(period_query(period));
        }
        if let Some(text) = &filter.query {
            query.push(("query", text.clone()));
        }
        if let Some(status) = filter.status {
            query.push(("status", status.as_str().to_string()));
        }
        let raw: Vec<RawTask> = self.get("/tasks", &query).await?;
        Ok(raw.into_iter().map(canonicalize_task).collect())
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        let raw: RawTask = self.post("/tasks/", &NewTask::from(draft)).await?;
        Ok(canonicalize_task(raw))
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<()> {
        self.put_ack(&format!("/tasks/{id}"), patch).await
    }

    async fn complete_task(&self, id: TaskId, completed: Day) -> Result<()> {
        self.put_ack(
            &format!("/tasks/{id}/complete"),
            &CompletionBody {
                completed_date: completed,
            },
        )
        .await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.delete(&format!("/tasks/{id}")).await
    }
}

fn period_query(period: Period) -> Vec<(&'static str, String)> {
    vec![
        ("from_date", period.from.to_string()),
        ("to_date", period.to.to_string()),
    ]
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let detail = match resp.json::<ErrorEnvelope>().await {
        Ok(envelope) => match envelope.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        },
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ApiError::Status {
        status: status.as_u16(),
        detail,
    })
}

async fn into_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let resp = ensure_success(resp).await?;
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[derive(serde::Deserialize)]
struct ScoreEnvelope {
    score: i64,
}

#[derive(serde::Deserialize)]
struct NameEnvelope {
    department_name: String,
}

#[derive(Serialize)]
struct CompletionBody {
    completed_date: Day,
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    detail: serde_json::Value,
}
