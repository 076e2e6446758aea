//! Project record storage.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use reelforge_models::{Project, ProjectId, ProjectStatus};

use crate::error::{StoreError, StoreResult};

/// Read/write access to project records.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch a project by id.
    async fn get(&self, id: &ProjectId) -> StoreResult<Option<Project>>;

    /// Insert a new project.
    async fn insert(&self, project: Project) -> StoreResult<()>;

    /// Set a project's status, stamping its modification time.
    async fn set_status(&self, id: &ProjectId, status: ProjectStatus) -> StoreResult<()>;
}

/// In-memory project store.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn get(&self, id: &ProjectId) -> StoreResult<Option<Project>> {
        Ok(self.projects.read().await.get(id).cloned())
    }

    async fn insert(&self, project: Project) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(StoreError::AlreadyExists(format!("project {}", project.id)));
        }
        projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn set_status(&self, id: &ProjectId, status: ProjectStatus) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(format!("project {id}")))?;
        project.status = status;
        project.modified_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelforge_models::OwnerId;

    #[tokio::test]
    async fn test_set_status() {
        let store = MemoryProjectStore::new();
        let project = Project::new(OwnerId::from_string("user-1"), "Promo", "{}");
        let id = project.id.clone();
        store.insert(project).await.unwrap();

        store
            .set_status(&id, ProjectStatus::Completed)
            .await
            .unwrap();
        let fetched = store.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ProjectStatus::Completed);
    }

    #[tokio::test]
    async fn test_set_status_unknown_project() {
        let store = MemoryProjectStore::new();
        let err = store
            .set_status(&ProjectId::new(), ProjectStatus::Failed)
            .await;
        assert!(matches!(err, Err(StoreError::NotFound(_))));
    }
}
