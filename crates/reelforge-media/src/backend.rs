//! The media backend capability contract.
//!
//! The pipeline consumes rendering strictly through this trait, so the
//! concrete FFmpeg implementation can be replaced (notably by scripted
//! fakes in orchestrator tests).

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use reelforge_models::{EncodingProfile, OverlayPosition, OverlayStyle};

use crate::error::MediaResult;

/// Rendering operations the pipeline composes.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Media duration in seconds.
    async fn probe(&self, path: &Path) -> MediaResult<f64>;

    /// Capture a single frame at `offset_secs`, scaled to fit `size`.
    async fn snapshot(
        &self,
        path: &Path,
        offset_secs: f64,
        size: (u32, u32),
        output: &Path,
    ) -> MediaResult<()>;

    /// Render a text slide clip at the target resolution.
    async fn text_slide(
        &self,
        text: &str,
        background_color: Option<&str>,
        duration: f64,
        width: u32,
        height: u32,
        output: &Path,
    ) -> MediaResult<()>;

    /// Encode a still image into a letterboxed fixed-duration clip.
    async fn image_to_video(
        &self,
        image: &Path,
        duration: f64,
        width: u32,
        height: u32,
        output: &Path,
    ) -> MediaResult<()>;

    /// Burn a text overlay onto a clip, re-encoding.
    async fn text_overlay(
        &self,
        video: &Path,
        text: &str,
        position: OverlayPosition,
        style: &OverlayStyle,
        output: &Path,
    ) -> MediaResult<()>;

    /// Concatenate clips in order into a single output.
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> MediaResult<()>;
}

/// FFmpeg-backed implementation of [`MediaBackend`].
#[derive(Debug, Default)]
pub struct FfmpegBackend {
    profile: EncodingProfile,
}

impl FfmpegBackend {
    /// Create a backend using the default output profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with an explicit encoding profile.
    pub fn with_profile(profile: EncodingProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    async fn probe(&self, path: &Path) -> MediaResult<f64> {
        Ok(crate::probe::probe_video(path).await?.duration)
    }

    async fn snapshot(
        &self,
        path: &Path,
        offset_secs: f64,
        size: (u32, u32),
        output: &Path,
    ) -> MediaResult<()> {
        crate::snapshot::snapshot(path, offset_secs, size, output).await
    }

    async fn text_slide(
        &self,
        text: &str,
        background_color: Option<&str>,
        duration: f64,
        width: u32,
        height: u32,
        output: &Path,
    ) -> MediaResult<()> {
        crate::slide::text_slide(
            text,
            background_color,
            duration,
            width,
            height,
            output,
            &self.profile,
        )
        .await
    }

    async fn image_to_video(
        &self,
        image: &Path,
        duration: f64,
        width: u32,
        height: u32,
        output: &Path,
    ) -> MediaResult<()> {
        crate::image::image_to_video(image, duration, width, height, output, &self.profile).await
    }

    async fn text_overlay(
        &self,
        video: &Path,
        text: &str,
        position: OverlayPosition,
        style: &OverlayStyle,
        output: &Path,
    ) -> MediaResult<()> {
        crate::overlay::text_overlay(video, text, position, style, output, &self.profile).await
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> MediaResult<()> {
        crate::concat::concat_videos(inputs, output, &self.profile).await
    }
}
