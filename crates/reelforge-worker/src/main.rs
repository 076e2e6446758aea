//! Timeline rendering worker binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelforge_media::FfmpegBackend;
use reelforge_queue::{RedisNotifier, RenderQueue};
use reelforge_store::{MemoryAssetResolver, MemoryJobStore, MemoryProjectStore};
use reelforge_worker::{JobExecutor, Pipeline, TempJanitor, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS Redis)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting reelforge-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    if let Err(e) = reelforge_media::check_ffmpeg() {
        warn!("FFmpeg preflight failed, renders will not succeed: {}", e);
    }

    let queue = RenderQueue::from_env().context("Failed to create render queue")?;
    let notifier = Arc::new(RedisNotifier::from_env().context("Failed to create notifier")?);

    // In-process stores; the submission service owns durable persistence.
    let jobs = Arc::new(MemoryJobStore::new());
    let projects = Arc::new(MemoryProjectStore::new());
    let assets = Arc::new(MemoryAssetResolver::new());

    let pipeline = Pipeline::new(
        config.clone(),
        Arc::new(FfmpegBackend::new()),
        jobs,
        projects,
        assets,
        notifier,
    );

    let executor = Arc::new(JobExecutor::new(config.clone(), queue, pipeline));

    let (janitor_shutdown, janitor_shutdown_rx) = tokio::sync::watch::channel(false);
    let janitor = TempJanitor::new(config);
    let janitor_task = tokio::spawn(async move { janitor.run(janitor_shutdown_rx).await });

    {
        let executor = Arc::clone(&executor);
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
            executor.shutdown();
            let _ = janitor_shutdown.send(true);
        });
    }

    executor.run().await.context("Executor error")?;

    janitor_task.abort();
    info!("Worker shutdown complete");
    Ok(())
}

/// Tracing with colored output for dev, JSON for production.
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("reelforge=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}
