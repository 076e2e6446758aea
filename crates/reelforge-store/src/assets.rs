//! Asset resolution.
//!
//! Assets live in an external library; the pipeline only resolves an
//! `(asset id, owner)` pair to a media path. Resolution is ownership-scoped:
//! an asset id belonging to another owner resolves to nothing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use reelforge_models::{AssetId, OwnerId};

use crate::error::StoreResult;

/// Lookup of asset media paths.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// Resolve an asset to its media path, scoped to the owner.
    async fn resolve(&self, asset_id: &AssetId, owner: &OwnerId) -> StoreResult<Option<PathBuf>>;
}

/// In-memory asset resolver.
#[derive(Debug, Default)]
pub struct MemoryAssetResolver {
    assets: RwLock<HashMap<(AssetId, OwnerId), PathBuf>>,
}

impl MemoryAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset path for an owner.
    pub async fn register(&self, asset_id: AssetId, owner: OwnerId, path: impl Into<PathBuf>) {
        self.assets
            .write()
            .await
            .insert((asset_id, owner), path.into());
    }
}

#[async_trait]
impl AssetResolver for MemoryAssetResolver {
    async fn resolve(&self, asset_id: &AssetId, owner: &OwnerId) -> StoreResult<Option<PathBuf>> {
        Ok(self
            .assets
            .read()
            .await
            .get(&(asset_id.clone(), owner.clone()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolution_is_owner_scoped() {
        let resolver = MemoryAssetResolver::new();
        let asset = AssetId::from_string("clip-1");
        let owner = OwnerId::from_string("user-1");
        resolver
            .register(asset.clone(), owner.clone(), "/media/clip-1.mp4")
            .await;

        let path = resolver.resolve(&asset, &owner).await.unwrap();
        assert_eq!(path, Some(PathBuf::from("/media/clip-1.mp4")));

        let other = OwnerId::from_string("user-2");
        assert_eq!(resolver.resolve(&asset, &other).await.unwrap(), None);
    }
}
