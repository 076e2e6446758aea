//! Job record storage.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use reelforge_models::{Job, JobId};

use crate::error::{StoreError, StoreResult};

/// Read/write access to job records, keyed by id.
///
/// The pipeline is the sole writer for a job during its one execution
/// window. Implementations must keep status transitions monotone: once a
/// record is terminal it can only be deleted, never updated.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch a job by id.
    async fn get(&self, id: &JobId) -> StoreResult<Option<Job>>;

    /// Insert a new job record.
    async fn insert(&self, job: Job) -> StoreResult<()>;

    /// Replace an existing job record, enforcing the status state machine.
    async fn update(&self, job: Job) -> StoreResult<()>;

    /// Remove a job record, returning it so the caller can delete the
    /// output file it references.
    async fn delete(&self, id: &JobId) -> StoreResult<Option<Job>>;
}

/// In-memory job store.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, id: &JobId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn insert(&self, job: Job) -> StoreResult<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::AlreadyExists(format!("job {}", job.id)));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn update(&self, job: Job) -> StoreResult<()> {
        let mut jobs = self.jobs.write().await;
        let existing = jobs
            .get(&job.id)
            .ok_or_else(|| StoreError::not_found(format!("job {}", job.id)))?;

        if existing.status != job.status && !existing.status.can_transition_to(job.status) {
            return Err(StoreError::InvalidTransition {
                from: existing.status,
                to: job.status,
            });
        }
        if existing.status.is_terminal() {
            return Err(StoreError::InvalidTransition {
                from: existing.status,
                to: job.status,
            });
        }

        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn delete(&self, id: &JobId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.write().await.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelforge_models::{JobStatus, OwnerId, ProjectId};

    fn queued_job() -> Job {
        Job::new(ProjectId::new(), OwnerId::from_string("user-1"), "TikTok")
    }

    #[tokio::test]
    async fn test_insert_get_roundtrip() {
        let store = MemoryJobStore::new();
        let job = queued_job();
        let id = job.id.clone();

        store.insert(job).await.unwrap();
        let fetched = store.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.status, JobStatus::Queued);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = MemoryJobStore::new();
        let job = queued_job();

        store.insert(job.clone()).await.unwrap();
        assert!(matches!(
            store.insert(job).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_valid_transition_chain() {
        let store = MemoryJobStore::new();
        let job = queued_job();
        store.insert(job.clone()).await.unwrap();

        let started = job.start();
        store.update(started.clone()).await.unwrap();
        store.update(started.complete("/out/a.mp4")).await.unwrap();
    }

    #[tokio::test]
    async fn test_terminal_records_are_immutable() {
        let store = MemoryJobStore::new();
        let job = queued_job();
        store.insert(job.clone()).await.unwrap();

        let started = job.start();
        store.update(started.clone()).await.unwrap();
        let failed = started.fail("boom");
        store.update(failed.clone()).await.unwrap();

        // Any further update, including a same-status rewrite, is rejected.
        let err = store.update(failed.clone().complete("/out/a.mp4")).await;
        assert!(matches!(err, Err(StoreError::InvalidTransition { .. })));
        let err = store.update(failed.clone()).await;
        assert!(matches!(err, Err(StoreError::InvalidTransition { .. })));

        // Deletion is still allowed and returns the record.
        let removed = store.delete(&failed.id).await.unwrap().unwrap();
        assert_eq!(removed.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_skipping_processing_is_rejected() {
        let store = MemoryJobStore::new();
        let job = queued_job();
        store.insert(job.clone()).await.unwrap();

        let err = store.update(job.complete("/out/a.mp4")).await;
        assert!(matches!(err, Err(StoreError::InvalidTransition { .. })));
    }
}
