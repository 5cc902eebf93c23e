//! View-state reconciliation for the TaskBase dashboard.
//!
//! Each page of the dashboard owns a small set of interdependent state
//! slices: the selected entity, the active reporting period, which cards
//! are expanded, and the fetched data those inputs parameterize. The
//! panels in this crate define how every slice is invalidated and
//! recomputed when an input changes, without reloading unrelated views.
//!
//! Overlapping fetches are resolved by stale-response suppression: every
//! input change bumps an epoch counter, a fetch captures the epoch it was
//! issued under, and a completed fetch applies its result only if that
//! epoch is still current. In-flight requests are never cancelled, only
//! ignored; failed fetches keep the previously displayed data in place.

#![warn(missing_docs)]

pub mod department;
pub mod employee_panel;
pub mod project_board;
pub mod view;

#[cfg(test)]
pub(crate) mod mock;

pub use department::{DepartmentPanel, DepartmentState, ProjectScore, DEFAULT_TOP_LIMIT};
pub use employee_panel::{EmployeePanel, EmployeeState};
pub use project_board::{BoardState, ProjectBoard};
pub use view::ViewData;
