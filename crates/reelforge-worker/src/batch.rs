//! Batch submission from a template timeline.
//!
//! A template carries one `content-placeholder` segment; batch submission
//! stamps each content asset into a copy of the template, creating one
//! project + job pair per asset and submitting them for rendering.

use chrono::Utc;
use tracing::{info, warn};

use reelforge_models::{AssetId, Job, JobId, NotifyEvent, OwnerId, Project, SegmentKind, TimelineSpec};
use reelforge_queue::{JobSubmitter, NotificationSink};
use reelforge_store::{AssetResolver, JobStore, ProjectStore};

use crate::error::{WorkerError, WorkerResult};

/// Replace the first `content-placeholder` segment with a concrete asset
/// segment. Returns false when the timeline has no placeholder.
pub fn resolve_placeholder(timeline: &mut TimelineSpec, asset_id: &AssetId) -> bool {
    match timeline
        .segments
        .iter_mut()
        .find(|s| s.kind == SegmentKind::ContentPlaceholder.as_tag())
    {
        Some(placeholder) => {
            placeholder.asset_id = Some(asset_id.clone());
            placeholder.kind = SegmentKind::Asset.as_tag().to_string();
            true
        }
        None => false,
    }
}

/// Submit one render job per content asset, instantiated from a template
/// timeline. Unknown asset ids are skipped with a warning; after all jobs
/// are submitted, one `BatchCompleted` notification is published.
#[allow(clippy::too_many_arguments)]
pub async fn submit_batch(
    jobs: &dyn JobStore,
    projects: &dyn ProjectStore,
    assets: &dyn AssetResolver,
    queue: &dyn JobSubmitter,
    notifier: &dyn NotificationSink,
    owner: &OwnerId,
    platform: &str,
    template_timeline: &str,
    content_ids: &[AssetId],
) -> WorkerResult<Vec<JobId>> {
    let mut job_ids = Vec::new();

    for asset_id in content_ids {
        if assets.resolve(asset_id, owner).await?.is_none() {
            warn!(
                owner = %owner,
                asset_id = %asset_id,
                "Asset not found for batch item, skipping"
            );
            continue;
        }

        let mut timeline: TimelineSpec = serde_json::from_str(template_timeline)
            .map_err(|e| WorkerError::validation(format!("Invalid template timeline: {e}")))?;
        resolve_placeholder(&mut timeline, asset_id);

        let timeline_json = serde_json::to_string(&timeline)
            .map_err(|e| WorkerError::validation(format!("Failed to serialize timeline: {e}")))?;

        let project = Project::new(
            owner.clone(),
            format!("Batch {} - {}", Utc::now().format("%Y-%m-%d"), asset_id),
            timeline_json,
        );
        let job = Job::new(project.id.clone(), owner.clone(), platform);
        let job_id = job.id.clone();

        projects.insert(project).await?;
        jobs.insert(job).await?;
        queue.submit(&job_id).await?;
        job_ids.push(job_id);
    }

    info!(
        owner = %owner,
        count = job_ids.len(),
        "Batch submission complete"
    );
    if let Err(e) = notifier
        .publish(owner, NotifyEvent::batch_completed(job_ids.clone()))
        .await
    {
        warn!(owner = %owner, "Failed to publish batch notification: {}", e);
    }

    Ok(job_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reelforge_queue::{QueueError, QueueResult};
    use reelforge_store::{MemoryAssetResolver, MemoryJobStore, MemoryProjectStore};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSubmitter {
        submitted: Mutex<Vec<JobId>>,
    }

    #[async_trait]
    impl JobSubmitter for RecordingSubmitter {
        async fn submit(&self, job_id: &JobId) -> QueueResult<()> {
            self.submitted.lock().unwrap().push(job_id.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<NotifyEvent>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn publish(&self, _owner: &OwnerId, event: NotifyEvent) -> QueueResult<()> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    /// Sink that always fails, to show batch submission shrugs it off.
    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn publish(&self, _owner: &OwnerId, _event: NotifyEvent) -> QueueResult<()> {
            Err(QueueError::submit_failed("sink offline"))
        }
    }

    const TEMPLATE: &str = r#"{
        "segments": [
            {"id": "intro", "type": "textSlide", "text": "Intro", "order": 0},
            {"id": "slot", "type": "content-placeholder", "order": 1},
            {"id": "outro", "type": "textSlide", "text": "Outro", "order": 2}
        ]
    }"#;

    #[test]
    fn test_resolve_placeholder() {
        let mut timeline: TimelineSpec = serde_json::from_str(TEMPLATE).unwrap();
        let asset = AssetId::from_string("clip-1");

        assert!(resolve_placeholder(&mut timeline, &asset));
        let slot = &timeline.segments[1];
        assert_eq!(slot.kind, "asset");
        assert_eq!(slot.asset_id.as_ref().unwrap().as_str(), "clip-1");

        // Already resolved: nothing left to replace.
        assert!(!resolve_placeholder(&mut timeline, &asset));
    }

    #[tokio::test]
    async fn test_submit_batch_creates_job_per_known_asset() {
        let jobs = MemoryJobStore::new();
        let projects = MemoryProjectStore::new();
        let assets = MemoryAssetResolver::new();
        let queue = RecordingSubmitter::default();
        let sink = RecordingSink::default();
        let owner = OwnerId::from_string("user-1");

        for id in ["clip-1", "clip-2"] {
            assets
                .register(AssetId::from_string(id), owner.clone(), format!("/m/{id}.mp4"))
                .await;
        }

        let content = [
            AssetId::from_string("clip-1"),
            AssetId::from_string("missing"),
            AssetId::from_string("clip-2"),
        ];
        let job_ids = submit_batch(
            &jobs, &projects, &assets, &queue, &sink, &owner, "TikTok", TEMPLATE, &content,
        )
        .await
        .unwrap();

        // The unknown asset is skipped, not fatal.
        assert_eq!(job_ids.len(), 2);
        assert_eq!(queue.submitted.lock().unwrap().len(), 2);

        // Each created job's project carries a resolved timeline.
        let job = jobs.get(&job_ids[0]).await.unwrap().unwrap();
        let project = projects.get(&job.project_id).await.unwrap().unwrap();
        let timeline: TimelineSpec = serde_json::from_str(&project.timeline).unwrap();
        assert!(timeline.segments.iter().all(|s| s.kind != "content-placeholder"));
        assert!(timeline.segments.iter().any(|s| s.kind == "asset"));

        // One batch notification carrying every submitted id.
        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            NotifyEvent::BatchCompleted { job_ids: ids } => assert_eq!(ids, &job_ids),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_notification_failure_is_swallowed() {
        let jobs = MemoryJobStore::new();
        let projects = MemoryProjectStore::new();
        let assets = MemoryAssetResolver::new();
        let queue = RecordingSubmitter::default();
        let owner = OwnerId::from_string("user-1");

        assets
            .register(AssetId::from_string("clip-1"), owner.clone(), "/m/c.mp4")
            .await;

        let job_ids = submit_batch(
            &jobs,
            &projects,
            &assets,
            &queue,
            &FailingSink,
            &owner,
            "TikTok",
            TEMPLATE,
            &[AssetId::from_string("clip-1")],
        )
        .await
        .unwrap();
        assert_eq!(job_ids.len(), 1);
    }
}
