//! Job executor: the bounded worker pool consuming the render queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, error, info};
use uuid::Uuid;

use reelforge_models::JobId;
use reelforge_queue::RenderQueue;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::pipeline::Pipeline;

/// Executes queued render jobs with bounded concurrency.
///
/// Each consumed entry is acked exactly once after its run reaches a
/// terminal state — success and failure alike. Failures live on the job
/// record; the queue never redelivers.
pub struct JobExecutor {
    config: WorkerConfig,
    queue: Arc<RenderQueue>,
    pipeline: Arc<Pipeline>,
    job_semaphore: Arc<Semaphore>,
    shutdown: tokio::sync::watch::Sender<bool>,
    consumer_name: String,
}

impl JobExecutor {
    /// Create a new job executor.
    pub fn new(config: WorkerConfig, queue: RenderQueue, pipeline: Pipeline) -> Self {
        let job_semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let (shutdown, _) = tokio::sync::watch::channel(false);
        let consumer_name = format!("worker-{}", Uuid::new_v4());

        Self {
            config,
            queue: Arc::new(queue),
            pipeline: Arc::new(pipeline),
            job_semaphore,
            shutdown,
            consumer_name,
        }
    }

    /// Run the consume loop until shutdown.
    pub async fn run(&self) -> WorkerResult<()> {
        info!(
            "Starting job executor '{}' with {} max concurrent jobs",
            self.consumer_name, self.config.max_concurrent_jobs
        );

        self.queue.init().await?;

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping executor");
                        break;
                    }
                }
                result = self.consume_jobs() => {
                    if let Err(e) = result {
                        error!("Error consuming jobs: {}", e);
                        // Back off on error
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        }

        info!("Waiting for in-flight jobs to complete...");
        let _ = tokio::time::timeout(self.config.shutdown_timeout, self.wait_for_jobs()).await;

        info!("Job executor stopped");
        Ok(())
    }

    /// Consume queued job ids up to the free concurrency slots.
    async fn consume_jobs(&self) -> WorkerResult<()> {
        let available = self.job_semaphore.available_permits();
        if available == 0 {
            // All slots busy, wait a bit
            tokio::time::sleep(Duration::from_millis(100)).await;
            return Ok(());
        }

        let jobs = self
            .queue
            .consume(
                &self.consumer_name,
                1000, // Block for 1 second
                available.min(5),
            )
            .await?;

        if jobs.is_empty() {
            return Ok(());
        }

        debug!("Consumed {} jobs from queue", jobs.len());

        for (message_id, job_id) in jobs {
            let pipeline = Arc::clone(&self.pipeline);
            let queue = Arc::clone(&self.queue);
            let permit = match self.job_semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break, // Semaphore closed during shutdown
            };

            tokio::spawn(async move {
                let _permit = permit;
                Self::execute_job(pipeline, queue, message_id, job_id).await;
            });
        }

        Ok(())
    }

    /// Execute a single job: run the pipeline, then ack and release the id.
    async fn execute_job(
        pipeline: Arc<Pipeline>,
        queue: Arc<RenderQueue>,
        message_id: String,
        job_id: JobId,
    ) {
        info!("Executing job {}", job_id);

        pipeline.run(&job_id).await;

        // One attempt per submission: ack regardless of the job's outcome.
        if let Err(e) = queue.ack(&message_id).await {
            error!("Failed to ack job {}: {}", job_id, e);
        }
        if let Err(e) = queue.clear_active(&job_id).await {
            error!("Failed to release active key for job {}: {}", job_id, e);
        }
    }

    /// Wait for all in-flight jobs to complete.
    async fn wait_for_jobs(&self) {
        loop {
            if self.job_semaphore.available_permits() == self.config.max_concurrent_jobs {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Signal shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}
