//! Timeline rendering worker.
//!
//! Consumes job ids from the render queue and drives each through the
//! pipeline: resolve job + timeline, render segments in order, combine,
//! record the terminal status and clean up.

pub mod batch;
pub mod config;
pub mod error;
pub mod executor;
pub mod janitor;
pub mod logging;
pub mod pipeline;
pub mod render;

pub use batch::submit_batch;
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use janitor::TempJanitor;
pub use pipeline::Pipeline;
pub use render::SegmentRenderer;
