//! Queue error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to enqueue job: {0}")]
    SubmitFailed(String),
}

impl QueueError {
    pub fn submit_failed(message: impl Into<String>) -> Self {
        Self::SubmitFailed(message.into())
    }
}
