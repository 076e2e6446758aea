//! Timeline documents: the declarative description of one output video.
//!
//! The wire format uses camelCase field names and is stored verbatim on the
//! owning project. Segment `type` stays a plain string on the wire and is
//! converted to [`SegmentKind`] at dispatch time, so an unrecognized tag
//! surfaces as a typed validation error rather than a document parse error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque identifier of an asset in the external asset store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default segment duration in seconds, used where a duration is required
/// but absent from the document.
pub const DEFAULT_SEGMENT_DURATION: f64 = 3.0;

/// A timeline: ordered segments plus output settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TimelineSpec {
    #[serde(default)]
    pub segments: Vec<Segment>,

    #[serde(default, rename = "outputSettings")]
    pub output_settings: OutputSettings,
}

impl TimelineSpec {
    /// Segments in render order: ascending `order`, ties keeping their
    /// original relative position (stable sort).
    pub fn sorted_segments(&self) -> Vec<&Segment> {
        let mut segments: Vec<&Segment> = self.segments.iter().collect();
        segments.sort_by_key(|s| s.order);
        segments
    }
}

/// The smallest renderable unit of a timeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Stable segment id within the document
    #[serde(default = "generated_id")]
    pub id: String,

    /// Wire segment tag; see [`SegmentKind::from_tag`]
    #[serde(rename = "type")]
    pub kind: String,

    /// Asset reference, resolved against the owner's library
    #[serde(default, rename = "assetId", skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<AssetId>,

    /// Literal media path, used when no asset reference is present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Duration in seconds for generated clips (default 3)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Text burned onto video/asset segments
    #[serde(default, rename = "overlayText", skip_serializing_if = "Option::is_none")]
    pub overlay_text: Option<String>,

    /// Overlay anchor (default bottom-center)
    #[serde(default, rename = "overlayPosition", skip_serializing_if = "Option::is_none")]
    pub overlay_position: Option<OverlayPosition>,

    /// Overlay styling
    #[serde(default, rename = "overlayStyle", skip_serializing_if = "Option::is_none")]
    pub overlay_style: Option<OverlayStyle>,

    /// Slide text (textSlide segments)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Slide background color (textSlide segments)
    #[serde(default, rename = "backgroundColor", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    /// Render position; segments are processed in ascending order
    pub order: i32,
}

fn generated_id() -> String {
    Uuid::new_v4().to_string()
}

impl Segment {
    /// Duration to use for generated clips, falling back to the default.
    pub fn duration_or_default(&self) -> f64 {
        self.duration.unwrap_or(DEFAULT_SEGMENT_DURATION)
    }
}

/// Error for a wire segment tag outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown segment type: {0}")]
pub struct UnknownSegmentType(pub String);

/// Closed set of segment kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Generated slide: text over a solid background
    TextSlide,
    /// Still image, letterboxed into a fixed-duration clip
    Image,
    /// Video clip, passed through or overlaid
    Video,
    /// Library asset, treated like `Video`
    Asset,
    /// Template marker; must be resolved to `Asset` before rendering
    ContentPlaceholder,
}

impl SegmentKind {
    /// Convert a wire tag into a kind.
    pub fn from_tag(tag: &str) -> Result<Self, UnknownSegmentType> {
        match tag {
            "textSlide" => Ok(SegmentKind::TextSlide),
            "image" => Ok(SegmentKind::Image),
            "video" => Ok(SegmentKind::Video),
            "asset" => Ok(SegmentKind::Asset),
            "content-placeholder" => Ok(SegmentKind::ContentPlaceholder),
            other => Err(UnknownSegmentType(other.to_string())),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            SegmentKind::TextSlide => "textSlide",
            SegmentKind::Image => "image",
            SegmentKind::Video => "video",
            SegmentKind::Asset => "asset",
            SegmentKind::ContentPlaceholder => "content-placeholder",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Overlay anchor positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayPosition {
    TopLeft,
    TopCenter,
    TopRight,
    Center,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl OverlayPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayPosition::TopLeft => "top-left",
            OverlayPosition::TopCenter => "top-center",
            OverlayPosition::TopRight => "top-right",
            OverlayPosition::Center => "center",
            OverlayPosition::BottomLeft => "bottom-left",
            OverlayPosition::BottomCenter => "bottom-center",
            OverlayPosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for OverlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Styling for burned-in text overlays.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OverlayStyle {
    #[serde(default = "default_font_size", rename = "fontSize")]
    pub font_size: u32,

    #[serde(default = "default_font_color", rename = "fontColor")]
    pub font_color: String,

    #[serde(default = "default_box_color", rename = "backgroundColor")]
    pub background_color: String,

    #[serde(default = "default_box_opacity", rename = "backgroundOpacity")]
    pub background_opacity: f64,
}

fn default_font_size() -> u32 {
    48
}
fn default_font_color() -> String {
    "white".to_string()
}
fn default_box_color() -> String {
    "black".to_string()
}
fn default_box_opacity() -> f64 {
    0.5
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            font_color: default_font_color(),
            background_color: default_box_color(),
            background_opacity: default_box_opacity(),
        }
    }
}

/// Output settings carried on the wire document.
///
/// The encode profile itself is fixed (see [`crate::encoding`]); these fields
/// are preserved for document compatibility.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OutputSettings {
    #[serde(default = "default_resolution")]
    pub resolution: String,

    #[serde(default = "default_fps")]
    pub fps: u32,

    #[serde(default = "default_video_bitrate", rename = "videoBitrate")]
    pub video_bitrate: String,

    #[serde(default = "default_audio_bitrate", rename = "audioBitrate")]
    pub audio_bitrate: String,
}

fn default_resolution() -> String {
    "1080x1920".to_string()
}
fn default_fps() -> u32 {
    30
}
fn default_video_bitrate() -> String {
    "5000k".to_string()
}
fn default_audio_bitrate() -> String {
    "192k".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            fps: default_fps(),
            video_bitrate: default_video_bitrate(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_document() {
        let doc = r#"{
            "segments": [
                {"id": "a", "type": "textSlide", "text": "Hi", "order": 1},
                {"type": "asset", "assetId": "clip-9", "overlayText": "Buy now",
                 "overlayPosition": "top-right", "duration": 5.5, "order": 0}
            ],
            "outputSettings": {"resolution": "1080x1920", "fps": 30}
        }"#;

        let spec: TimelineSpec = serde_json::from_str(doc).unwrap();
        assert_eq!(spec.segments.len(), 2);
        assert_eq!(spec.segments[0].kind, "textSlide");
        assert_eq!(spec.segments[1].asset_id.as_ref().unwrap().as_str(), "clip-9");
        assert_eq!(
            spec.segments[1].overlay_position,
            Some(OverlayPosition::TopRight)
        );
        // Generated id for the segment that omitted one
        assert!(!spec.segments[1].id.is_empty());
        assert_eq!(spec.output_settings.video_bitrate, "5000k");
    }

    #[test]
    fn test_sorted_segments_is_stable() {
        let doc = r#"{"segments": [
            {"id": "b", "type": "image", "order": 2},
            {"id": "a", "type": "image", "order": 1},
            {"id": "c", "type": "image", "order": 2},
            {"id": "d", "type": "image", "order": 0}
        ]}"#;
        let spec: TimelineSpec = serde_json::from_str(doc).unwrap();

        let ids: Vec<&str> = spec
            .sorted_segments()
            .into_iter()
            .map(|s| s.id.as_str())
            .collect();
        // Ascending order; "b" and "c" tie and keep document order.
        assert_eq!(ids, vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_segment_kind_from_tag() {
        assert_eq!(SegmentKind::from_tag("textSlide"), Ok(SegmentKind::TextSlide));
        assert_eq!(
            SegmentKind::from_tag("content-placeholder"),
            Ok(SegmentKind::ContentPlaceholder)
        );

        let err = SegmentKind::from_tag("bogus").unwrap_err();
        assert_eq!(err.to_string(), "Unknown segment type: bogus");
    }

    #[test]
    fn test_duration_default() {
        let doc = r#"{"segments": [{"type": "image", "order": 0}]}"#;
        let spec: TimelineSpec = serde_json::from_str(doc).unwrap();
        assert_eq!(spec.segments[0].duration_or_default(), 3.0);
    }

    #[test]
    fn test_overlay_style_defaults() {
        let style: OverlayStyle = serde_json::from_str("{}").unwrap();
        assert_eq!(style.font_size, 48);
        assert_eq!(style.font_color, "white");
        assert!((style.background_opacity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_overlay_position_rejected() {
        let doc = r#"{"segments": [
            {"type": "video", "overlayText": "x", "overlayPosition": "middle-ish", "order": 0}
        ]}"#;
        assert!(serde_json::from_str::<TimelineSpec>(doc).is_err());
    }
}
