//! Worker error types.
//!
//! `Validation` and `NotFound` display as their bare message: their text is
//! the caller-facing `error_message` recorded on a failed job.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Media(#[from] reelforge_media::MediaError),

    #[error(transparent)]
    Store(#[from] reelforge_store::StoreError),

    #[error(transparent)]
    Queue(#[from] reelforge_queue::QueueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
