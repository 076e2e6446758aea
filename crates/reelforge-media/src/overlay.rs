//! Burned-in text overlays.

use std::path::Path;
use tracing::info;

use reelforge_models::{EncodingProfile, OverlayPosition, OverlayStyle};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::build_overlay_drawtext;

/// Burn `text` onto a clip at the given anchor, re-encoding with the fixed
/// output profile. The clip's resolution is left untouched.
pub async fn text_overlay(
    video: impl AsRef<Path>,
    text: &str,
    position: OverlayPosition,
    style: &OverlayStyle,
    output: impl AsRef<Path>,
    profile: &EncodingProfile,
) -> MediaResult<()> {
    let video = video.as_ref();
    let output = output.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    info!(
        "Burning overlay at {} onto {} -> {}",
        position,
        video.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(video.to_string_lossy(), output)
        .video_filter(build_overlay_drawtext(text, position, style))
        .output_args(profile.to_ffmpeg_args());

    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_video_is_rejected() {
        let err = text_overlay(
            "/no/such/clip.mp4",
            "Hello",
            OverlayPosition::BottomCenter,
            &OverlayStyle::default(),
            "/tmp/out.mp4",
            &EncodingProfile::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
