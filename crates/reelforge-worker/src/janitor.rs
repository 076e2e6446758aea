//! Temp-file janitor.
//!
//! Per-run artifacts are deleted by the pipeline itself; this independent
//! low-priority sweep catches whatever a crashed worker left behind once
//! the retention window has passed.

use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing::{info, warn};

use crate::config::WorkerConfig;

/// File extensions the pipeline produces in the work directory.
const SWEPT_EXTENSIONS: [&str; 3] = ["mp4", "png", "txt"];

/// Periodic retention sweep of the work directory.
pub struct TempJanitor {
    config: WorkerConfig,
}

impl TempJanitor {
    pub fn new(config: WorkerConfig) -> Self {
        Self { config }
    }

    /// Run sweeps on the configured interval until shutdown.
    pub async fn run(&self, mut shutdown_rx: tokio::sync::watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.config.janitor_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    let deleted = sweep(&self.config.work_dir, self.config.temp_retention).await;
                    info!("Temp file cleanup completed. Deleted {} files", deleted);
                }
            }
        }
    }
}

/// Delete stale artifacts in `work_dir` older than `retention`.
/// Returns the number of files deleted; individual failures are warnings.
pub async fn sweep(work_dir: &Path, retention: Duration) -> usize {
    let cutoff = SystemTime::now() - retention;
    let mut deleted = 0;

    let mut entries = match tokio::fs::read_dir(work_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Unable to read work directory {}: {}", work_dir.display(), e);
            return 0;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();

        let swept_kind = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SWEPT_EXTENSIONS.contains(&ext));
        if !swept_kind {
            continue;
        }

        let stale = match entry.metadata().await.and_then(|m| m.modified()) {
            Ok(modified) => modified <= cutoff,
            Err(e) => {
                warn!("Unable to stat {}: {}", path.display(), e);
                continue;
            }
        };
        if !stale {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => deleted += 1,
            Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
        }
    }

    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sweep_deletes_expired_artifacts() {
        let dir = TempDir::new().unwrap();
        let stale = dir.path().join("old.mp4");
        tokio::fs::write(&stale, b"x").await.unwrap();

        let deleted = sweep(dir.path(), Duration::ZERO).await;
        assert_eq!(deleted, 1);
        assert!(!stale.exists());
    }

    #[tokio::test]
    async fn test_sweep_keeps_fresh_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        let fresh = dir.path().join("fresh.mp4");
        let foreign = dir.path().join("notes.log");
        tokio::fs::write(&fresh, b"x").await.unwrap();
        tokio::fs::write(&foreign, b"x").await.unwrap();

        let deleted = sweep(dir.path(), Duration::from_secs(3600)).await;
        assert_eq!(deleted, 0);
        assert!(fresh.exists());

        // Non-media files are never swept, regardless of age.
        let deleted = sweep(dir.path(), Duration::ZERO).await;
        assert_eq!(deleted, 1);
        assert!(foreign.exists());
    }

    #[tokio::test]
    async fn test_sweep_missing_directory_is_harmless() {
        assert_eq!(sweep(Path::new("/no/such/dir"), Duration::ZERO).await, 0);
    }
}
