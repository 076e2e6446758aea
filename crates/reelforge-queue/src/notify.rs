//! Job status notifications via Redis Pub/Sub.
//!
//! Events are published to a per-owner channel; delivery is fire-and-forget
//! and publish failures are the caller's to swallow. The concrete transport
//! behind subscribers (socket push, event bus, log sink) is pluggable.

use async_trait::async_trait;
use tracing::debug;

use reelforge_models::{NotifyEvent, OwnerId};

use crate::error::QueueResult;

/// Best-effort publication of job lifecycle events to subscribers.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Publish an event to the owner's subscribers.
    async fn publish(&self, owner: &OwnerId, event: NotifyEvent) -> QueueResult<()>;
}

/// Redis Pub/Sub notification sink.
pub struct RedisNotifier {
    client: redis::Client,
}

impl RedisNotifier {
    /// Create a new notifier.
    pub fn new(redis_url: &str) -> QueueResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    /// Create from the `REDIS_URL` environment variable.
    pub fn from_env() -> QueueResult<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        Self::new(&url)
    }

    /// Channel name for an owner's notifications.
    pub fn channel_name(owner: &OwnerId) -> String {
        format!("notify:{}", owner)
    }

    /// Subscribe to an owner's events.
    /// Returns a pinned stream that can be polled with `.next()`.
    pub async fn subscribe(
        &self,
        owner: &OwnerId,
    ) -> QueueResult<std::pin::Pin<Box<dyn futures_util::Stream<Item = NotifyEvent> + Send>>> {
        use futures_util::StreamExt;

        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(Self::channel_name(owner)).await?;

        let stream = pubsub.into_on_message().filter_map(|msg| async move {
            let payload: String = msg.get_payload().ok()?;
            serde_json::from_str(&payload).ok()
        });

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl NotificationSink for RedisNotifier {
    async fn publish(&self, owner: &OwnerId, event: NotifyEvent) -> QueueResult<()> {
        use redis::AsyncCommands;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let channel = Self::channel_name(owner);
        let payload = serde_json::to_string(&event)?;

        debug!("Publishing notification to {}", channel);
        conn.publish::<_, _, ()>(channel, payload).await?;

        Ok(())
    }
}
