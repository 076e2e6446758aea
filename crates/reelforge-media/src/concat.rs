//! Demuxer-based concatenation of rendered clips.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use reelforge_models::EncodingProfile;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Concatenate clips in the given order into a single output.
///
/// Uses the concat demuxer with a generated list file placed next to the
/// output; the list file is removed afterwards, best effort.
pub async fn concat_videos(
    inputs: &[PathBuf],
    output: impl AsRef<Path>,
    profile: &EncodingProfile,
) -> MediaResult<()> {
    let output = output.as_ref();

    if inputs.is_empty() {
        return Err(MediaError::invalid_input(
            "concat requires at least one input clip",
        ));
    }

    let list_dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
    let list_path = list_dir.join(format!("concat_{}.txt", Uuid::new_v4()));

    let mut lines = String::new();
    for input in inputs {
        lines.push_str(&format!("file '{}'\n", input.display()));
    }
    fs::write(&list_path, lines).await?;

    info!(
        "Concatenating {} clips -> {}",
        inputs.len(),
        output.display()
    );

    let cmd = FfmpegCommand::new(list_path.to_string_lossy(), output)
        .format("concat")
        .input_args(["-safe", "0"])
        .output_args(profile.to_ffmpeg_args());

    let result = FfmpegRunner::new().run(&cmd).await;

    // List file is scratch either way.
    fs::remove_file(&list_path).await.ok();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_input_list_is_rejected() {
        let err = concat_videos(&[], "/tmp/out.mp4", &EncodingProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidInput(_)));
    }
}
