//! Render job queue over Redis Streams.
//!
//! The scheduler contract is deliberately narrow: `submit(job_id)` with
//! at-most-one in-flight execution per id, one consumption per submission,
//! zero implicit retries. Workers ack every consumed entry exactly once
//! whatever the render outcome; failures live on the job record, not in the
//! queue.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, info, warn};

use reelforge_models::JobId;

use crate::error::{QueueError, QueueResult};

/// Safety TTL on the per-job active key, in case a worker dies without
/// acking. Until it expires, resubmission of that id is refused.
const ACTIVE_KEY_TTL_SECS: u64 = 86400;

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Redis URL
    pub redis_url: String,
    /// Stream name for render jobs
    pub stream_name: String,
    /// Consumer group name
    pub consumer_group: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            stream_name: "reelforge:jobs".to_string(),
            consumer_group: "reelforge:workers".to_string(),
        }
    }
}

impl QueueConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            stream_name: std::env::var("QUEUE_STREAM").unwrap_or(defaults.stream_name),
            consumer_group: std::env::var("QUEUE_CONSUMER_GROUP").unwrap_or(defaults.consumer_group),
        }
    }
}

/// The scheduler contract consumed by submission paths.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Submit a job id for execution.
    async fn submit(&self, job_id: &JobId) -> QueueResult<()>;
}

/// Render queue client.
pub struct RenderQueue {
    client: redis::Client,
    config: QueueConfig,
}

impl RenderQueue {
    /// Create a new queue client.
    pub fn new(config: QueueConfig) -> QueueResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> QueueResult<Self> {
        Self::new(QueueConfig::from_env())
    }

    fn active_key(&self, job_id: &JobId) -> String {
        format!("{}:active:{}", self.config.stream_name, job_id)
    }

    /// Initialize the queue (create consumer group if not exists).
    pub async fn init(&self) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let result: Result<(), redis::RedisError> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg("$")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        match result {
            Ok(_) => info!("Created consumer group: {}", self.config.consumer_group),
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!("Consumer group already exists: {}", self.config.consumer_group);
            }
            Err(e) => return Err(QueueError::Redis(e)),
        }

        Ok(())
    }

    /// Consume job ids from the queue.
    /// Returns (message_id, job_id) pairs.
    pub async fn consume(
        &self,
        consumer_name: &str,
        block_ms: u64,
        count: usize,
    ) -> QueueResult<Vec<(String, JobId)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let result: redis::streams::StreamReadReply = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.config.consumer_group)
            .arg(consumer_name)
            .arg("COUNT")
            .arg(count)
            .arg("BLOCK")
            .arg(block_ms)
            .arg("STREAMS")
            .arg(&self.config.stream_name)
            .arg(">") // Only new messages
            .query_async(&mut conn)
            .await?;

        let mut jobs = Vec::new();

        for stream_key in result.keys {
            for entry in stream_key.ids {
                let message_id = entry.id.clone();

                match entry.map.get("jobId") {
                    Some(redis::Value::BulkString(raw)) => {
                        let job_id = JobId::from_string(String::from_utf8_lossy(raw).into_owned());
                        debug!("Consumed job {} from stream", job_id);
                        jobs.push((message_id, job_id));
                    }
                    _ => {
                        warn!("Dropping malformed stream entry {}", message_id);
                        self.ack(&message_id).await.ok();
                    }
                }
            }
        }

        Ok(jobs)
    }

    /// Acknowledge a consumed entry. Called exactly once per consumption,
    /// on success and failure alike.
    pub async fn ack(&self, message_id: &str) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        redis::cmd("XACK")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(message_id)
            .query_async::<()>(&mut conn)
            .await?;

        redis::cmd("XDEL")
            .arg(&self.config.stream_name)
            .arg(message_id)
            .query_async::<()>(&mut conn)
            .await?;

        debug!("Acknowledged stream entry: {}", message_id);
        Ok(())
    }

    /// Release a job id after its run reached a terminal state, allowing an
    /// explicit resubmission.
    pub async fn clear_active(&self, job_id: &JobId) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(self.active_key(job_id)).await?;
        Ok(())
    }

    /// Get queue length.
    pub async fn len(&self) -> QueueResult<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let len: u64 = conn.xlen(&self.config.stream_name).await?;
        Ok(len)
    }
}

#[async_trait]
impl JobSubmitter for RenderQueue {
    async fn submit(&self, job_id: &JobId) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        // At most one in-flight execution per job id.
        let active_key = self.active_key(job_id);
        let claimed: bool = redis::cmd("SET")
            .arg(&active_key)
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(ACTIVE_KEY_TTL_SECS)
            .query_async::<Option<String>>(&mut conn)
            .await?
            .is_some();
        if !claimed {
            warn!("Rejecting duplicate submission for job {}", job_id);
            return Err(QueueError::submit_failed(format!(
                "job {job_id} is already in flight"
            )));
        }

        let message_id: String = redis::cmd("XADD")
            .arg(&self.config.stream_name)
            .arg("*")
            .arg("jobId")
            .arg(job_id.as_str())
            .query_async(&mut conn)
            .await?;

        info!("Submitted job {} with message ID {}", job_id, message_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueueConfig::default();
        assert_eq!(config.stream_name, "reelforge:jobs");
        assert_eq!(config.consumer_group, "reelforge:workers");
    }

    #[test]
    fn test_active_key_includes_job_id() {
        let queue = RenderQueue::new(QueueConfig::default()).unwrap();
        let key = queue.active_key(&JobId::from_string("j-1"));
        assert_eq!(key, "reelforge:jobs:active:j-1");
    }
}
