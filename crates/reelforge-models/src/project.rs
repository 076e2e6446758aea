//! Projects: the owning container for a serialized timeline.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Generate a new random project ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the account owning projects and assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Project status, mirroring the most recent job's terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Not yet rendered
    #[default]
    Draft,
    /// A render job is in flight
    Processing,
    /// Last render completed
    Completed,
    /// Last render failed
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Processing => "processing",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project owning one serialized timeline document.
///
/// The timeline is stored as raw JSON and only parsed when a job renders it;
/// editing surfaces treat it as an opaque document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: OwnerId,
    pub name: String,

    /// Serialized timeline JSON (see [`crate::timeline::TimelineSpec`])
    pub timeline: String,

    #[serde(default)]
    pub status: ProjectStatus,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Project {
    /// Create a new draft project around a serialized timeline.
    pub fn new(owner_id: OwnerId, name: impl Into<String>, timeline: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            owner_id,
            name: name.into(),
            timeline: timeline.into(),
            status: ProjectStatus::Draft,
            created_at: now,
            modified_at: now,
        }
    }

    /// Update the status, stamping `modified_at`.
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self.modified_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = Project::new(OwnerId::from_string("user-1"), "Promo", "{}");
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.timeline, "{}");
    }

    #[test]
    fn test_with_status_stamps_modified() {
        let project = Project::new(OwnerId::from_string("user-1"), "Promo", "{}");
        let before = project.modified_at;
        let updated = project.with_status(ProjectStatus::Completed);
        assert_eq!(updated.status, ProjectStatus::Completed);
        assert!(updated.modified_at >= before);
    }
}
