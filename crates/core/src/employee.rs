//! Employee model - a member of the tracked department.

use serde::{Deserialize, Serialize};

use crate::id::EmployeeId;
use crate::Day;

/// An employee of the department.
///
/// Snapshots of backend state; mutations go through the backend and come
/// back as fresh snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier
    pub id: EmployeeId,

    /// Full name
    pub name: String,

    /// Job position, if recorded
    pub position: Option<String>,

    /// First day of employment
    pub start_date: Option<Day>,

    /// Current employment status
    pub status: EmployeeStatus,

    /// Start of the status interval. Only meaningful for non-active
    /// statuses; cleared during canonicalization otherwise.
    pub status_start: Option<Day>,

    /// End of the status interval, same rules as `status_start`.
    pub status_end: Option<Day>,
}

impl Employee {
    /// Whether the employee currently counts toward department scoring.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EmployeeStatus {
    /// Working as usual
    #[default]
    Active,

    /// Temporarily away
    OnLeave,

    /// No longer employed
    Terminated,
}

impl EmployeeStatus {
    /// Parse a wire status string, accepting both the canonical form and
    /// the legacy localized vocabulary still present in old rows.
    /// Unknown or missing values degrade to `Active`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("active") | Some("работает") => Self::Active,
            Some("on-leave") | Some("в отпуске") => Self::OnLeave,
            Some("terminated") | Some("уволен") => Self::Terminated,
            _ => Self::Active,
        }
    }

    /// Canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on-leave",
            Self::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
