use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    /// Inventory source unreachable or answered with something unusable.
    #[error("fetching favourites failed: {0:#}")]
    Fetch(#[source] anyhow::Error),

    #[error("delivering message failed: {0:#}")]
    Delivery(#[source] anyhow::Error),
}
