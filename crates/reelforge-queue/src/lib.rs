//! Render job dispatch and notifications over Redis.
//!
//! This crate provides:
//! - The scheduler contract ([`JobSubmitter`]) and its Redis Streams
//!   implementation with at-most-one in-flight execution per job id and
//!   zero implicit retries
//! - The [`NotificationSink`] contract and its Redis Pub/Sub implementation

pub mod error;
pub mod notify;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use notify::{NotificationSink, RedisNotifier};
pub use queue::{JobSubmitter, QueueConfig, RenderQueue};
