//! Department stats page reconciliation.
//!
//! Slices: the department's total score, per-project scores, and the
//! top-scoring employees, all parameterized by the same period and
//! therefore invalidated together when it changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use taskbase_client::Backend;
use taskbase_core::{
    Day, Period, Project, ProjectFilter, ScoredEmployee, ValidationError,
};

use crate::view::ViewData;

/// How many employees the leaderboard shows by default.
pub const DEFAULT_TOP_LIMIT: usize = 3;

/// A project paired with its score over the active period.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectScore {
    /// The project
    pub project: Project,

    /// Its score; zero when the score fetch failed
    pub score: i64,
}

/// Snapshot of the stats page's state.
#[derive(Debug, Clone)]
pub struct DepartmentState {
    /// Active reporting period
    pub period: Period,

    /// Department display name; not period-scoped
    pub name: ViewData<String>,

    /// Total department score over the period
    pub score: ViewData<i64>,

    /// Period-filtered projects with their scores
    pub projects: ViewData<Vec<ProjectScore>>,

    /// Best employees over the period, highest first
    pub top: ViewData<Vec<ScoredEmployee>>,
}

impl DepartmentState {
    fn new(period: Period) -> Self {
        Self {
            period,
            name: ViewData::Empty,
            score: ViewData::Empty,
            projects: ViewData::Empty,
            top: ViewData::Empty,
        }
    }
}

/// Reconciler for the department stats page.
pub struct DepartmentPanel<B> {
    backend: Arc<B>,
    state: Mutex<DepartmentState>,
    epoch: AtomicU64,
    top_limit: usize,
}

impl<B: Backend + 'static> DepartmentPanel<B> {
    /// Panel with nothing loaded and the default leaderboard size.
    pub fn new(backend: Arc<B>, period: Period) -> Self {
        Self {
            backend,
            state: Mutex::new(DepartmentState::new(period)),
            epoch: AtomicU64::new(0),
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }

    /// Override the leaderboard size.
    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.top_limit = limit;
        self
    }

    /// Current state, cloned for rendering.
    pub async fn snapshot(&self) -> DepartmentState {
        self.state.lock().await.clone()
    }

    /// Load the department name. Not epoch-guarded: the name is not
    /// parameterized by the period.
    pub async fn load_name(&self) {
        self.state.lock().await.name.begin();
        let result = self.backend.department_name().await;
        self.state.lock().await.name.resolve(result);
    }

    /// Load or reload every period-scoped slice concurrently.
    pub async fn refresh(&self) {
        let epoch = self.current();
        let period = {
            let mut state = self.state.lock().await;
            state.score.begin();
            state.projects.begin();
            state.top.begin();
            state.period
        };

        let (score, top, projects) = tokio::join!(
            self.backend.department_score(period),
            self.backend.top_employees(period, self.top_limit),
            self.load_project_scores(period),
        );
        self.apply(epoch, |state| {
            state.score.resolve(score);
            state.top.resolve(top);
            state.projects.resolve(projects);
        })
        .await;
    }

    /// Change the reporting period. Rejected bounds issue no fetch; a
    /// valid change invalidates every period-scoped slice at once.
    pub async fn set_period(&self, from: Day, to: Day) -> Result<(), ValidationError> {
        let period = Period::new(from, to)?;
        self.state.lock().await.period = period;
        self.bump();
        self.refresh().await;
        Ok(())
    }

    /// Fetch the period's projects, then one score per project.
    async fn load_project_scores(
        &self,
        period: Period,
    ) -> taskbase_client::Result<Vec<ProjectScore>> {
        let projects = self
            .backend
            .projects(&ProjectFilter {
                period: Some(period),
                ..ProjectFilter::default()
            })
            .await?;

        let mut handles = Vec::new();
        for project in projects {
            let backend = Arc::clone(&self.backend);
            handles.push(tokio::spawn(async move {
                let score = backend
                    .project_score(project.id, period)
                    .await
                    .unwrap_or(0);
                ProjectScore { project, score }
            }));
        }
        let mut scored = Vec::new();
        for handle in handles {
            if let Ok(entry) = handle.await {
                scored.push(entry);
            }
        }
        Ok(scored)
    }

    fn bump(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    async fn apply(&self, epoch: u64, update: impl FnOnce(&mut DepartmentState)) -> bool {
        let mut state = self.state.lock().await;
        if self.current() != epoch {
            debug!(epoch, current = self.current(), "discarding stale fetch result");
            return false;
        }
        update(&mut state);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, MockBackend};
    use taskbase_core::EmployeeId;

    fn seeded() -> MockBackend {
        let backend = MockBackend::new();
        *backend.department_score.lock().unwrap() = 21;
        backend
            .projects
            .lock()
            .unwrap()
            .extend([mock::project(1, "site relaunch"), mock::project(2, "archive")]);
        backend
            .project_scores
            .lock()
            .unwrap()
            .insert(taskbase_core::ProjectId(1), 6);
        backend.top.lock().unwrap().extend([
            ScoredEmployee {
                employee_id: EmployeeId(2),
                name: "Petrov".into(),
                score: 8,
            },
            ScoredEmployee {
                employee_id: EmployeeId(1),
                name: "Ivanova".into(),
                score: 5,
            },
        ]);
        backend
    }

    #[tokio::test]
    async fn refresh_populates_every_slice() {
        let backend = Arc::new(seeded());
        let panel = DepartmentPanel::new(Arc::clone(&backend), mock::period());
        panel.load_name().await;
        panel.refresh().await;

        let state = panel.snapshot().await;
        assert_eq!(state.name.value().map(String::as_str), Some("Engineering"));
        assert_eq!(state.score.value(), Some(&21));
        assert_eq!(state.top.value().unwrap().len(), 2);

        let projects = state.projects.value().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects.iter().find(|p| p.project.id.value() == 1).unwrap().score, 6);
        assert_eq!(projects.iter().find(|p| p.project.id.value() == 2).unwrap().score, 0);
    }

    #[tokio::test]
    async fn inverted_period_issues_no_fetch() {
        let backend = Arc::new(seeded());
        let panel = DepartmentPanel::new(Arc::clone(&backend), mock::period());
        panel.refresh().await;
        let before = backend.call_count();

        let err = panel
            .set_period(
                Day::from_ymd_opt(2025, 9, 1).unwrap(),
                Day::from_ymd_opt(2025, 8, 1).unwrap(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ValidationError::InvertedPeriod { .. }));
        assert_eq!(backend.call_count(), before);
    }

    #[tokio::test]
    async fn failed_score_fetch_keeps_prior_total() {
        let backend = Arc::new(seeded());
        let panel = DepartmentPanel::new(Arc::clone(&backend), mock::period());
        panel.refresh().await;
        assert_eq!(panel.snapshot().await.score.value(), Some(&21));

        backend.fail("department_score");
        panel
            .set_period(
                Day::from_ymd_opt(2025, 7, 1).unwrap(),
                Day::from_ymd_opt(2025, 7, 31).unwrap(),
            )
            .await
            .unwrap();

        let state = panel.snapshot().await;
        assert_eq!(state.score.value(), Some(&21));
        assert!(state.score.error().is_some());
        assert_eq!(state.top.value().unwrap().len(), 2);
    }
}
