//! The render pipeline: one job's state machine from `Queued` to a terminal
//! state, with unconditional temp-artifact cleanup.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::fs;
use tracing::{error, warn};

use reelforge_media::MediaBackend;
use reelforge_models::{
    Job, JobId, JobStatus, NotifyEvent, OwnerId, PlatformProfiles, ProjectStatus, TimelineSpec,
};
use reelforge_queue::NotificationSink;
use reelforge_store::{AssetResolver, JobStore, ProjectStore};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::render::SegmentRenderer;

/// Orchestrates the full render for one job id: status transitions, segment
/// rendering in timeline order, combination, project mirroring,
/// notifications and cleanup.
pub struct Pipeline {
    config: WorkerConfig,
    backend: Arc<dyn MediaBackend>,
    renderer: SegmentRenderer,
    jobs: Arc<dyn JobStore>,
    projects: Arc<dyn ProjectStore>,
    notifier: Arc<dyn NotificationSink>,
    profiles: PlatformProfiles,
}

impl Pipeline {
    pub fn new(
        config: WorkerConfig,
        backend: Arc<dyn MediaBackend>,
        jobs: Arc<dyn JobStore>,
        projects: Arc<dyn ProjectStore>,
        assets: Arc<dyn AssetResolver>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let renderer = SegmentRenderer::new(Arc::clone(&backend), assets, config.work_dir.clone());
        Self {
            config,
            backend,
            renderer,
            jobs,
            projects,
            notifier,
            profiles: PlatformProfiles::builtin(),
        }
    }

    /// Execute one render attempt for `job_id`.
    ///
    /// A single invocation is a single attempt; re-running a failed job
    /// requires a fresh external submission. Every failure is absorbed here
    /// and recorded on the job — nothing propagates to the caller.
    pub async fn run(&self, job_id: &JobId) {
        let logger = JobLogger::new(job_id, "render_timeline");

        let job = match self.jobs.get(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                // Nothing to update; the submission was stale or withdrawn.
                error!(job_id = %job_id, "Render job not found");
                return;
            }
            Err(e) => {
                error!(job_id = %job_id, "Failed to load job: {}", e);
                return;
            }
        };

        let job = job.start();
        if let Err(e) = self.jobs.update(job.clone()).await {
            error!(job_id = %job_id, "Failed to mark job processing: {}", e);
            return;
        }
        logger.log_start(&format!("Rendering timeline for platform {}", job.platform));
        self.notify(
            &job.owner_id,
            NotifyEvent::status_changed(job.id.clone(), JobStatus::Processing),
        )
        .await;

        let mut temp_files: Vec<PathBuf> = Vec::new();
        let result = self.execute(&job, &logger, &mut temp_files).await;

        match result {
            Ok(output_path) => {
                let output = output_path.to_string_lossy().into_owned();
                if let Err(e) = self.jobs.update(job.clone().complete(&output)).await {
                    error!(job_id = %job_id, "Failed to record completion: {}", e);
                }
                self.mirror_project_status(&job, ProjectStatus::Completed)
                    .await;
                self.notify(
                    &job.owner_id,
                    NotifyEvent::completed(job.id.clone(), job.platform.clone()),
                )
                .await;
                logger.log_completion(&format!("Output written to {}", output));
            }
            Err(e) => {
                let message = e.to_string();
                logger.log_error(&message);
                if let Err(e) = self.jobs.update(job.clone().fail(&message)).await {
                    error!(job_id = %job_id, "Failed to record failure: {}", e);
                }
                self.mirror_project_status(&job, ProjectStatus::Failed).await;
                self.notify(
                    &job.owner_id,
                    NotifyEvent::status_failed(job.id.clone(), message),
                )
                .await;
            }
        }

        // Cleanup runs whatever branch was taken above.
        self.cleanup(&temp_files).await;
    }

    /// Render and combine. Temp artifacts are pushed into `temp_files` as
    /// they are produced so the caller can clean up on any exit path.
    async fn execute(
        &self,
        job: &Job,
        logger: &JobLogger,
        temp_files: &mut Vec<PathBuf>,
    ) -> WorkerResult<PathBuf> {
        let project = self
            .projects
            .get(&job.project_id)
            .await?
            .ok_or_else(|| WorkerError::not_found(format!("Project not found: {}", job.project_id)))?;

        let timeline: TimelineSpec = serde_json::from_str(&project.timeline)
            .map_err(|e| WorkerError::validation(format!("Invalid timeline definition: {e}")))?;

        let profile = self.profiles.resolve(&job.platform);
        let (width, height) = (profile.width, profile.height);

        let segments = timeline.sorted_segments();
        if segments.is_empty() {
            return Err(WorkerError::validation("Timeline has no segments"));
        }

        fs::create_dir_all(&self.config.work_dir).await?;
        let total = segments.len();
        for (index, segment) in segments.into_iter().enumerate() {
            let clip = self
                .renderer
                .render(segment, &job.owner_id, width, height)
                .await?;
            temp_files.push(clip);
            logger.log_progress(&format!("Rendered segment {}/{}", index + 1, total));
        }

        fs::create_dir_all(&self.config.output_dir).await?;
        let output = self.config.output_dir.join(format!(
            "{}_{}_{}.mp4",
            job.id,
            job.platform,
            Utc::now().format("%Y%m%d%H%M%S")
        ));

        let combined: WorkerResult<()> = if temp_files.len() == 1 {
            // Adopt the single artifact unchanged; no re-encode.
            fs::copy(&temp_files[0], &output)
                .await
                .map(|_| ())
                .map_err(WorkerError::from)
        } else {
            self.backend
                .concat(temp_files, &output)
                .await
                .map_err(WorkerError::from)
        };
        if let Err(e) = combined {
            // Never leave a partial output behind a failed job.
            fs::remove_file(&output).await.ok();
            return Err(e);
        }

        Ok(output)
    }

    /// Mirror the job's terminal status onto the owning project.
    async fn mirror_project_status(&self, job: &Job, status: ProjectStatus) {
        if let Err(e) = self.projects.set_status(&job.project_id, status).await {
            warn!(
                job_id = %job.id,
                project_id = %job.project_id,
                "Failed to mirror project status: {}", e
            );
        }
    }

    /// Best-effort notification; failures never affect the job.
    async fn notify(&self, owner: &OwnerId, event: NotifyEvent) {
        if let Err(e) = self.notifier.publish(owner, event).await {
            warn!(owner = %owner, "Failed to publish notification: {}", e);
        }
    }

    /// Delete this run's temp artifacts, swallowing individual failures.
    async fn cleanup(&self, temp_files: &[PathBuf]) {
        for file in temp_files {
            match fs::remove_file(file).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove temp artifact {}: {}", file.display(), e),
            }
        }
    }
}
