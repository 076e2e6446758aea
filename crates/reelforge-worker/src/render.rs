//! Segment rendering.
//!
//! Each segment becomes one standalone temporary clip in the work
//! directory, named by a fresh UUID so concurrent runs never collide.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use reelforge_media::MediaBackend;
use reelforge_models::{OwnerId, Segment, SegmentKind};
use reelforge_store::AssetResolver;

use crate::error::{WorkerError, WorkerResult};

/// Fallback slide text when a textSlide segment carries none.
const DEFAULT_SLIDE_TEXT: &str = "Text";

/// Renders one timeline segment into a temporary clip.
pub struct SegmentRenderer {
    backend: Arc<dyn MediaBackend>,
    assets: Arc<dyn AssetResolver>,
    work_dir: PathBuf,
}

impl SegmentRenderer {
    pub fn new(
        backend: Arc<dyn MediaBackend>,
        assets: Arc<dyn AssetResolver>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            backend,
            assets,
            work_dir,
        }
    }

    /// Render a segment at the target resolution, returning the path of the
    /// temporary clip. The caller owns the artifact's lifetime.
    pub async fn render(
        &self,
        segment: &Segment,
        owner: &OwnerId,
        width: u32,
        height: u32,
    ) -> WorkerResult<PathBuf> {
        let kind = SegmentKind::from_tag(&segment.kind)
            .map_err(|e| WorkerError::validation(e.to_string()))?;

        let output = self.work_dir.join(format!("{}.mp4", Uuid::new_v4()));
        debug!(
            segment_id = %segment.id,
            kind = %kind,
            "Rendering segment -> {}",
            output.display()
        );

        match kind {
            SegmentKind::TextSlide => {
                let text = segment
                    .text
                    .as_deref()
                    .or(segment.overlay_text.as_deref())
                    .unwrap_or(DEFAULT_SLIDE_TEXT);
                self.backend
                    .text_slide(
                        text,
                        segment.background_color.as_deref(),
                        segment.duration_or_default(),
                        width,
                        height,
                        &output,
                    )
                    .await?;
            }

            SegmentKind::Image => {
                let image = self.resolve_media(segment, owner, "Image").await?;
                self.backend
                    .image_to_video(&image, segment.duration_or_default(), width, height, &output)
                    .await?;
            }

            SegmentKind::Video | SegmentKind::Asset => {
                let media = self.resolve_media(segment, owner, "Video").await?;
                match segment.overlay_text.as_deref() {
                    Some(text) if !text.is_empty() => {
                        let position = segment.overlay_position.unwrap_or_default();
                        let style = segment.overlay_style.clone().unwrap_or_default();
                        self.backend
                            .text_overlay(&media, text, position, &style, &output)
                            .await?;
                    }
                    // No overlay: the source clip is used unchanged.
                    _ => {
                        fs::copy(&media, &output).await?;
                    }
                }
            }

            SegmentKind::ContentPlaceholder => {
                return Err(WorkerError::validation(format!(
                    "Segment {} is an unresolved content-placeholder",
                    segment.id
                )));
            }
        }

        Ok(output)
    }

    /// Resolve a segment's media path: asset reference first (owner-scoped),
    /// then the literal path.
    async fn resolve_media(
        &self,
        segment: &Segment,
        owner: &OwnerId,
        what: &str,
    ) -> WorkerResult<PathBuf> {
        if let Some(asset_id) = &segment.asset_id {
            return self
                .assets
                .resolve(asset_id, owner)
                .await?
                .ok_or_else(|| WorkerError::not_found(format!("{what} asset not found: {asset_id}")));
        }

        if let Some(path) = &segment.path {
            return Ok(PathBuf::from(path));
        }

        Err(WorkerError::not_found(format!(
            "{what} segment {} has no asset reference or path",
            segment.id
        )))
    }
}
