use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::notify::{Notifier, message::Message};

/// Logs messages instead of sending them.
#[derive(Debug, Default)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn deliver(&self, message: &Message) -> Result<()> {
        info!(
            audience = ?message.audience,
            image = message.image.as_deref().unwrap_or("-"),
            text = %message.text,
            "dry run delivery"
        );

        Ok(())
    }
}
