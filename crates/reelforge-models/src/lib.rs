//! Shared data models for the Reelforge render backend.
//!
//! This crate provides Serde-serializable types for:
//! - Render jobs and their status state machine
//! - Projects and their serialized timelines
//! - Timeline documents (segments, overlays, output settings)
//! - Platform output profiles
//! - The fixed encoding profile
//! - Notification event schemas

pub mod encoding;
pub mod job;
pub mod notify;
pub mod platform;
pub mod project;
pub mod timeline;

// Re-export common types
pub use encoding::EncodingProfile;
pub use job::{Job, JobId, JobStatus};
pub use notify::NotifyEvent;
pub use platform::{PlatformProfile, PlatformProfiles};
pub use project::{OwnerId, Project, ProjectId, ProjectStatus};
pub use timeline::{
    AssetId, OutputSettings, OverlayPosition, OverlayStyle, Segment, SegmentKind, TimelineSpec,
    UnknownSegmentType,
};
