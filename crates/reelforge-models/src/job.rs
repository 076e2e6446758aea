//! Render job records and their status state machine.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::project::{OwnerId, ProjectId};

/// Unique identifier for a render job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
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

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a render job.
///
/// Transitions are monotone: `Queued -> Processing -> {Completed, Failed}`.
/// Terminal states are absorbing; a terminal record is never mutated again
/// except by explicit deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting for a worker
    #[default]
    Queued,
    /// Job is being rendered
    Processing,
    /// Job finished and the output file exists
    Completed,
    /// Job failed; `error_message` carries the reason
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        match self {
            JobStatus::Queued => matches!(next, JobStatus::Processing),
            JobStatus::Processing => matches!(next, JobStatus::Completed | JobStatus::Failed),
            JobStatus::Completed | JobStatus::Failed => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution attempt rendering a project's timeline into a final video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Project whose timeline this job renders
    pub project_id: ProjectId,

    /// Owner of the project (scopes asset resolution and notifications)
    pub owner_id: OwnerId,

    /// Current status
    #[serde(default)]
    pub status: JobStatus,

    /// Target distribution platform name
    pub platform: String,

    /// Final output file path (set on completion)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    /// Failure reason (set on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Enqueue timestamp
    pub queued_at: DateTime<Utc>,

    /// Processing start timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Terminal timestamp (completion or failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new queued job.
    pub fn new(project_id: ProjectId, owner_id: OwnerId, platform: impl Into<String>) -> Self {
        Self {
            id: JobId::new(),
            project_id,
            owner_id,
            status: JobStatus::Queued,
            platform: platform.into(),
            output_path: None,
            error_message: None,
            queued_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Start processing the job.
    pub fn start(mut self) -> Self {
        self.status = JobStatus::Processing;
        self.started_at = Some(Utc::now());
        self
    }

    /// Mark the job as completed with its output file.
    pub fn complete(mut self, output_path: impl Into<String>) -> Self {
        self.status = JobStatus::Completed;
        self.output_path = Some(output_path.into());
        self.completed_at = Some(Utc::now());
        self
    }

    /// Mark the job as failed.
    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self.status = JobStatus::Failed;
        self.error_message = Some(error.into());
        self.completed_at = Some(Utc::now());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> Job {
        Job::new(ProjectId::new(), OwnerId::from_string("user-1"), "TikTok")
    }

    #[test]
    fn test_job_creation() {
        let job = sample_job();
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.started_at.is_none());
        assert!(job.output_path.is_none());
    }

    #[test]
    fn test_job_lifecycle() {
        let started = sample_job().start();
        assert_eq!(started.status, JobStatus::Processing);
        assert!(started.started_at.is_some());

        let completed = started.clone().complete("/out/a.mp4");
        assert_eq!(completed.status, JobStatus::Completed);
        assert_eq!(completed.output_path.as_deref(), Some("/out/a.mp4"));
        assert!(completed.completed_at.is_some());

        let failed = started.fail("boom");
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_status_transitions_are_monotone() {
        use JobStatus::*;
        assert!(Queued.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));

        assert!(!Queued.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Queued));
        for terminal in [Completed, Failed] {
            for next in [Queued, Processing, Completed, Failed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
