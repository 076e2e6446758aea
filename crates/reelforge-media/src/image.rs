//! Still image to fixed-duration clip conversion.

use std::path::Path;
use tracing::info;

use reelforge_models::encoding::FPS;
use reelforge_models::EncodingProfile;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::letterbox;

/// Encode a still image into a clip of `duration` seconds, letterboxed onto
/// a black canvas of the target resolution (center-fit, aspect preserved).
pub async fn image_to_video(
    image: impl AsRef<Path>,
    duration: f64,
    width: u32,
    height: u32,
    output: impl AsRef<Path>,
    profile: &EncodingProfile,
) -> MediaResult<()> {
    let image = image.as_ref();
    let output = output.as_ref();

    if !image.exists() {
        return Err(MediaError::FileNotFound(image.to_path_buf()));
    }

    info!(
        "Encoding image {} -> {} ({}x{}, {:.1}s)",
        image.display(),
        output.display(),
        width,
        height,
        duration
    );

    let cmd = FfmpegCommand::new(image.to_string_lossy(), output)
        .input_args(["-loop", "1"])
        .duration(duration)
        .format("image2")
        .video_filter(letterbox(width, height))
        .fps(FPS)
        .output_args(profile.video_args());

    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_image_is_rejected() {
        let err = image_to_video(
            "/no/such/image.png",
            3.0,
            1080,
            1920,
            "/tmp/out.mp4",
            &EncodingProfile::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
