//! Projects page reconciliation.
//!
//! Slices: the period-filtered project list, the single expanded project
//! card with its stages, per-stage task lists and period score, and the
//! independently expandable task cards inside it. Project cards are
//! single-open: expanding one collapses the previous. Task cards expand
//! and collapse freely and never touch the network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use taskbase_core::{
    Day, Period, Project, ProjectFilter, ProjectId, Stage, StageId, Task, TaskId, ValidationError,
};

use taskbase_client::Backend;

use crate::view::ViewData;

/// Snapshot of the projects page's state.
#[derive(Debug, Clone)]
pub struct BoardState {
    /// Active reporting period
    pub period: Period,

    /// Period-filtered project list
    pub projects: ViewData<Vec<Project>>,

    /// The one expanded project card, if any
    pub expanded: Option<ProjectId>,

    /// Stages of the expanded project, in rank order
    pub stages: ViewData<Vec<Stage>>,

    /// Task list per stage of the expanded project
    pub stage_tasks: HashMap<StageId, ViewData<Vec<Task>>>,

    /// Expanded project's score over the period
    pub score: ViewData<i64>,

    /// Independently expanded task cards
    pub open_tasks: HashSet<TaskId>,
}

impl BoardState {
    fn new(period: Period) -> Self {
        Self {
            period,
            projects: ViewData::Empty,
            expanded: None,
            stages: ViewData::Empty,
            stage_tasks: HashMap::new(),
            score: ViewData::Empty,
            open_tasks: HashSet::new(),
        }
    }

    fn clear_expanded_views(&mut self) {
        self.stages = ViewData::Empty;
        self.stage_tasks.clear();
        self.score = ViewData::Empty;
        self.open_tasks.clear();
    }
}

/// Reconciler for the projects page.
pub struct ProjectBoard<B> {
    backend: Arc<B>,
    state: Mutex<BoardState>,
    epoch: AtomicU64,
}

impl<B: Backend + 'static> ProjectBoard<B> {
    /// Board with nothing loaded and nothing expanded.
    pub fn new(backend: Arc<B>, period: Period) -> Self {
        Self {
            backend,
            state: Mutex::new(BoardState::new(period)),
            epoch: AtomicU64::new(0),
        }
    }

    /// Current state, cloned for rendering.
    pub async fn snapshot(&self) -> BoardState {
        self.state.lock().await.clone()
    }

    /// Load or reload the project list for the active period.
    pub async fn refresh_projects(&self) {
        let epoch = self.current();
        let period = {
            let mut state = self.state.lock().await;
            state.projects.begin();
            state.period
        };
        let result = self
            .backend
            .projects(&ProjectFilter {
                period: Some(period),
                ..ProjectFilter::default()
            })
            .await;
        self.apply(epoch, |state| state.projects.resolve(result)).await;
    }

    /// Change the reporting period. Rejected bounds issue no fetch. A
    /// valid change reloads the project list and the expanded project's
    /// score; stage task lists are not period-scoped and stay put.
    pub async fn set_period(&self, from: Day, to: Day) -> Result<(), ValidationError> {
        let period = Period::new(from, to)?;
        let expanded = {
            let mut state = self.state.lock().await;
            state.period = period;
            state.expanded
        };
        self.bump();
        self.refresh_projects().await;
        if let Some(project) = expanded {
            self.refresh_score(project).await;
        }
        Ok(())
    }

    /// Toggle a project card. Collapsing is purely local; expanding
    /// collapses any previously expanded card and loads the project's
    /// stages, their task lists, and its score.
    pub async fn toggle_project(&self, id: ProjectId) {
        let epoch = self.bump();
        let (expand, period) = {
            let mut state = self.state.lock().await;
            state.clear_expanded_views();
            if state.expanded == Some(id) {
                state.expanded = None;
                (false, state.period)
            } else {
                state.expanded = Some(id);
                state.stages.begin();
                state.score.begin();
                (true, state.period)
            }
        };
        if !expand {
            return;
        }

        let (stages, score) = tokio::join!(
            self.backend.project_stages(id),
            self.backend.project_score(id, period),
        );

        // Fan out one task fetch per stage before taking the lock back
        let mut tasks = Vec::new();
        if let Ok(stages) = &stages {
            let mut handles = Vec::new();
            for stage in stages {
                let backend = Arc::clone(&self.backend);
                let stage_id = stage.id;
                handles.push(tokio::spawn(async move {
                    (stage_id, backend.stage_tasks(id, stage_id).await)
                }));
            }
            for handle in handles {
                if let Ok(fetched) = handle.await {
                    tasks.push(fetched);
                }
            }
        }

        self.apply(epoch, |state| {
            state.score.resolve(score);
            for (stage_id, result) in tasks {
                state
                    .stage_tasks
                    .entry(stage_id)
                    .or_default()
                    .resolve(result);
            }
            state.stages.resolve(stages);
        })
        .await;
    }

    /// Toggle one task card. Task cards expand independently of each
    /// other and never trigger a fetch.
    pub async fn toggle_task(&self, id: TaskId) {
        let mut state = self.state.lock().await;
        if !state.open_tasks.remove(&id) {
            state.open_tasks.insert(id);
        }
    }

    /// Reconcile after a task was created, edited, or completed in a
    /// stage: reload exactly that stage's task list and the project
    /// score. Expansion state and sibling stages stay put.
    pub async fn task_saved(&self, stage: StageId) {
        let epoch = self.current();
        let (project, period) = {
            let mut state = self.state.lock().await;
            let Some(project) = state.expanded else {
                return;
            };
            state.stage_tasks.entry(stage).or_default().begin();
            state.score.begin();
            (project, state.period)
        };
        let (tasks, score) = tokio::join!(
            self.backend.stage_tasks(project, stage),
            self.backend.project_score(project, period),
        );
        self.apply(epoch, |state| {
            state
                .stage_tasks
                .entry(stage)
                .or_default()
                .resolve(tasks);
            state.score.resolve(score);
        })
        .await;
    }

    /// Reconcile after a task was deleted: drop it from its stage's list
    /// and from the open cards locally, then refresh only the project
    /// score. Sibling lists are not reloaded.
    pub async fn task_deleted(&self, task: &Task) {
        let project = {
            let mut state = self.state.lock().await;
            state.open_tasks.remove(&task.id);
            if let Some(stage) = task.stage_id {
                if let Some(list) = state.stage_tasks.get_mut(&stage) {
                    list.map_value(|tasks| tasks.retain(|t| t.id != task.id));
                }
            }
            state.expanded
        };
        if let Some(project) = project {
            self.refresh_score(project).await;
        }
    }

    /// Reconcile after a project was created or edited: reload the list
    /// only, leaving expansion and period untouched.
    pub async fn project_saved(&self) {
        self.refresh_projects().await;
    }

    /// Reconcile after a project was deleted: drop it from the list and
    /// collapse its card if it was the expanded one. No reload of
    /// unrelated state.
    pub async fn project_deleted(&self, id: ProjectId) {
        let mut state = self.state.lock().await;
        state
            .projects
            .map_value(|projects| projects.retain(|p| p.id != id));
        if state.expanded == Some(id) {
            state.expanded = None;
            state.clear_expanded_views();
        }
    }

    async fn refresh_score(&self, project: ProjectId) {
        let epoch = self.current();
        let period = {
            let mut state = self.state.lock().await;
            state.score.begin();
            state.period
        };
        let score = self.backend.project_score(project, period).await;
        self.apply(epoch, |state| state.score.resolve(score)).await;
    }

    fn bump(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    async fn apply(&self, epoch: u64, update: impl FnOnce(&mut BoardState)) -> bool {
        let mut state = self.state.lock().await;
        if self.current() != epoch {
            debug!(epoch, current = self.current(), "discarding stale fetch result");
            return false;
        }
        update(&mut state);
        true
    }
}
