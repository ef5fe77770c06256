pub mod dry_run;
pub mod message;

use anyhow::Result;
use async_trait::async_trait;

use crate::notify::message::Message;

pub type DynamicNotifier = Box<dyn Notifier + Send + Sync>;

#[async_trait]
pub trait Notifier {
    async fn deliver(&self, message: &Message) -> Result<()>;
}

#[async_trait]
impl<N: Notifier + Send + Sync + ?Sized> Notifier for Box<N> {
    async fn deliver(&self, message: &Message) -> Result<()> {
        (**self).deliver(message).await
    }
}
