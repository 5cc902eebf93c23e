//! Stage model - an ordered phase inside a project.

use serde::{Deserialize, Serialize};

use crate::id::{ProjectId, StageId};

/// A stage of a project. Stages belong to exactly one project and cannot
/// outlive it; the backend cascades deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Unique identifier
    pub id: StageId,

    /// Owning project
    pub project_id: ProjectId,

    /// Stage name
    pub name: String,

    /// Rank within the project, lowest first
    pub order: i64,
}
