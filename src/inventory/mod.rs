use anyhow::Result;
use async_trait::async_trait;

use crate::types::snapshot::Snapshot;

#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Current state of every favourited listing.
    async fn fetch_favourites(&self) -> Result<Snapshot>;
}
