//! Notification event schemas.
//!
//! Events are published per owner at each job status transition; delivery is
//! fire-and-forget with no acknowledgment.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::job::{JobId, JobStatus};

/// A job lifecycle event delivered to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyEvent {
    /// A job changed status; `error` is set on failure.
    StatusChanged {
        #[serde(rename = "jobId")]
        job_id: JobId,
        status: JobStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// A job completed and its output is available.
    Completed {
        #[serde(rename = "jobId")]
        job_id: JobId,
        platform: String,
    },

    /// A batch submission finished enqueueing all of its jobs.
    BatchCompleted {
        #[serde(rename = "jobIds")]
        job_ids: Vec<JobId>,
    },
}

impl NotifyEvent {
    pub fn status_changed(job_id: JobId, status: JobStatus) -> Self {
        NotifyEvent::StatusChanged {
            job_id,
            status,
            error: None,
        }
    }

    pub fn status_failed(job_id: JobId, error: impl Into<String>) -> Self {
        NotifyEvent::StatusChanged {
            job_id,
            status: JobStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn completed(job_id: JobId, platform: impl Into<String>) -> Self {
        NotifyEvent::Completed {
            job_id,
            platform: platform.into(),
        }
    }

    pub fn batch_completed(job_ids: Vec<JobId>) -> Self {
        NotifyEvent::BatchCompleted { job_ids }
    }

    /// The job this event concerns, when it concerns exactly one.
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            NotifyEvent::StatusChanged { job_id, .. } | NotifyEvent::Completed { job_id, .. } => {
                Some(job_id)
            }
            NotifyEvent::BatchCompleted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_changed_serialization() {
        let event = NotifyEvent::status_changed(JobId::from_string("j1"), JobStatus::Processing);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"status_changed\""));
        assert!(json.contains("\"jobId\":\"j1\""));
        assert!(json.contains("\"status\":\"processing\""));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_failure_carries_error() {
        let event = NotifyEvent::status_failed(JobId::from_string("j1"), "Unknown segment type: bogus");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"error\":\"Unknown segment type: bogus\""));
        assert!(json.contains("\"status\":\"failed\""));
    }

    #[test]
    fn test_batch_completed_roundtrip() {
        let event =
            NotifyEvent::batch_completed(vec![JobId::from_string("a"), JobId::from_string("b")]);
        let json = serde_json::to_string(&event).unwrap();
        let back: NotifyEvent = serde_json::from_str(&json).unwrap();
        match back {
            NotifyEvent::BatchCompleted { job_ids } => assert_eq!(job_ids.len(), 2),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(event.job_id().is_none());
    }
}
