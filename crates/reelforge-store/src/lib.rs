//! Persistence interfaces consumed by the render pipeline.
//!
//! Jobs, projects and the asset library are owned by external systems; the
//! pipeline only needs the narrow read/write surface defined here. The
//! in-memory implementations back the worker binary and tests.

pub mod assets;
pub mod error;
pub mod jobs;
pub mod projects;

pub use assets::{AssetResolver, MemoryAssetResolver};
pub use error::{StoreError, StoreResult};
pub use jobs::{JobStore, MemoryJobStore};
pub use projects::{MemoryProjectStore, ProjectStore};
