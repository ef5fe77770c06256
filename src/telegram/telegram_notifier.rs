use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::notify::{Notifier, message::Message};
use crate::telegram::{telegram_client::TelegramClient, telegram_config::TelegramConfig};

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: TelegramClient,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        Ok(Self {
            client: TelegramClient::new(&config)?,
            config,
        })
    }

    async fn deliver_to(&self, chat_id: &str, message: &Message) -> Result<()> {
        let sent = match &message.image {
            Some(image) => {
                self.client
                    .send_photo(chat_id, image, Some(&message.text))
                    .await?
            }
            None => self.client.send_message(chat_id, &message.text).await?,
        };

        tracing::debug!(chat_id, message_id = sent.message_id, "telegram message delivered");

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// Tries every chat in the audience before reporting failures.
    async fn deliver(&self, message: &Message) -> Result<()> {
        let mut failures = Vec::new();

        for chat_id in self.config.chats_for(message.audience) {
            if let Err(error) = self.deliver_to(chat_id, message).await {
                tracing::error!(chat_id, error = %error, "telegram delivery failed");
                failures.push(format!("{chat_id}: {error}"));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("delivery failed for {}", failures.join("; ")))
        }
    }
}
