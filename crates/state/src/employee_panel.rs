//! Employee page reconciliation.
//!
//! Slices: the roster, the selected employee with their period score and
//! task list, the active period, and the derived reference baseline.
//! Selecting an employee reloads only that employee's detail views, never
//! the roster; changing the period reloads the period-scoped views and
//! recomputes the baseline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use taskbase_client::Backend;
use taskbase_core::{
    reference_score, Day, Employee, EmployeeId, Period, Task, ValidationError,
};

use crate::view::ViewData;

/// Snapshot of the employee page's state.
#[derive(Debug, Clone)]
pub struct EmployeeState {
    /// Active reporting period
    pub period: Period,

    /// Currently selected employee, if any
    pub selected: Option<EmployeeId>,

    /// Full roster; independent of selection and period
    pub roster: ViewData<Vec<Employee>>,

    /// Detail of the selected employee
    pub detail: ViewData<Employee>,

    /// Selected employee's score over the period
    pub score: ViewData<i64>,

    /// Selected employee's tasks created within the period
    pub tasks: ViewData<Vec<Task>>,

    /// Expected score for the period, for gauge rendering
    pub baseline: i64,
}

impl EmployeeState {
    fn new(period: Period) -> Self {
        Self {
            period,
            selected: None,
            roster: ViewData::Empty,
            detail: ViewData::Empty,
            score: ViewData::Empty,
            tasks: ViewData::Empty,
            baseline: reference_score(&period),
        }
    }

    fn clear_selection_views(&mut self) {
        self.detail = ViewData::Empty;
        self.score = ViewData::Empty;
        self.tasks = ViewData::Empty;
    }
}

/// Reconciler for the employee page.
pub struct EmployeePanel<B> {
    backend: Arc<B>,
    state: Mutex<EmployeeState>,
    epoch: AtomicU64,
}

impl<B: Backend + 'static> EmployeePanel<B> {
    /// Panel with an empty roster and no selection.
    pub fn new(backend: Arc<B>, period: Period) -> Self {
        Self {
            backend,
            state: Mutex::new(EmployeeState::new(period)),
            epoch: AtomicU64::new(0),
        }
    }

    /// Current state, cloned for rendering.
    pub async fn snapshot(&self) -> EmployeeState {
        self.state.lock().await.clone()
    }

    /// Load or reload the roster. Not epoch-guarded: the roster is not
    /// parameterized by selection or period, so no input change can make
    /// a roster response stale.
    pub async fn load_roster(&self) {
        self.state.lock().await.roster.begin();
        let result = self.backend.employees().await;
        self.state.lock().await.roster.resolve(result);
    }

    /// Change the selection. Fetches the employee's detail, score, and
    /// task list concurrently; the roster is left alone.
    pub async fn select(&self, id: Option<EmployeeId>) {
        let epoch = self.bump();
        let period = {
            let mut state = self.state.lock().await;
            state.selected = id;
            state.clear_selection_views();
            if id.is_some() {
                state.detail.begin();
                state.score.begin();
                state.tasks.begin();
            }
            state.period
        };
        let Some(id) = id else { return };

        let (detail, score, tasks) = tokio::join!(
            self.backend.employee(id),
            self.backend.employee_score(id, period),
            self.backend.employee_tasks(id, period),
        );
        self.apply(epoch, |state| {
            state.detail.resolve(detail);
            state.score.resolve(score);
            state.tasks.resolve(tasks);
        })
        .await;
    }

    /// Change the reporting period. Rejected bounds issue no fetch. A
    /// valid change recomputes the baseline and refreshes the selected
    /// employee's period-scoped views.
    pub async fn set_period(&self, from: Day, to: Day) -> Result<(), ValidationError> {
        let period = Period::new(from, to)?;
        let epoch = self.bump();
        let selected = {
            let mut state = self.state.lock().await;
            state.period = period;
            state.baseline = reference_score(&period);
            if state.selected.is_some() {
                state.score.begin();
                state.tasks.begin();
            }
            state.selected
        };
        if let Some(id) = selected {
            let (score, tasks) = tokio::join!(
                self.backend.employee_score(id, period),
                self.backend.employee_tasks(id, period),
            );
            self.apply(epoch, |state| {
                state.score.resolve(score);
                state.tasks.resolve(tasks);
            })
            .await;
        }
        Ok(())
    }

    /// Reconcile after an employee create or update: the roster is the
    /// owning list, and the detail view could have changed if the saved
    /// employee is the selected one. Selection and period stay put.
    pub async fn employee_saved(&self, id: EmployeeId) {
        let epoch = self.current();
        let (selected, period) = {
            let state = self.state.lock().await;
            (state.selected, state.period)
        };
        if selected == Some(id) {
            {
                let mut state = self.state.lock().await;
                state.detail.begin();
                state.score.begin();
            }
            let (detail, score) = tokio::join!(
                self.backend.employee(id),
                self.backend.employee_score(id, period),
            );
            self.apply(epoch, |state| {
                state.detail.resolve(detail);
                state.score.resolve(score);
            })
            .await;
        }
        self.load_roster().await;
    }

    fn bump(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    async fn apply(&self, epoch: u64, update: impl FnOnce(&mut EmployeeState)) -> bool {
        let mut state = self.state.lock().await;
        if self.current() != epoch {
            debug!(epoch, current = self.current(), "discarding stale fetch result");
            return false;
        }
        update(&mut state);
        true
    }
}
