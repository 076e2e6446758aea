//! Single-frame snapshots.

use std::path::Path;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Capture a single frame at `offset_secs`, scaled to fit within `size`.
///
/// Very short clips can fail to seek; a failure at a non-zero offset is
/// retried once at offset zero before giving up.
pub async fn snapshot(
    video: impl AsRef<Path>,
    offset_secs: f64,
    size: (u32, u32),
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let output = output.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    info!(
        "Capturing snapshot of {} at {:.2}s -> {}",
        video.display(),
        offset_secs,
        output.display()
    );

    match snapshot_at(video, offset_secs, size, output).await {
        Ok(()) => Ok(()),
        Err(e) if offset_secs > 0.0 => {
            debug!(
                "Snapshot at {:.2}s failed ({}), retrying at offset zero",
                offset_secs, e
            );
            snapshot_at(video, 0.0, size, output).await
        }
        Err(e) => Err(e),
    }
}

async fn snapshot_at(
    video: &Path,
    offset_secs: f64,
    (width, height): (u32, u32),
    output: &Path,
) -> MediaResult<()> {
    let cmd = FfmpegCommand::new(video.to_string_lossy(), output)
        .seek(offset_secs)
        .single_frame()
        .video_filter(format!(
            "scale={width}:{height}:force_original_aspect_ratio=decrease"
        ));

    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_video_is_rejected() {
        let err = snapshot("/no/such/clip.mp4", 1.0, (320, 180), "/tmp/thumb.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
