use anyhow::{Result, bail};
use serde::Deserialize;

use crate::config::{optional_var, required_var};
use crate::notify::message::Audience;

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub admin_chat_id: String,
    #[serde(default)]
    pub subscriber_chat_ids: Vec<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl TelegramConfig {
    pub fn from_env() -> Result<Self> {
        let bot_token = required_var("TELEGRAM_BOT_TOKEN")?;
        let admin_chat_id = required_var("TELEGRAM_ADMIN_CHAT_ID")?;

        let subscriber_chat_ids = optional_var::<String>("TELEGRAM_SUBSCRIBER_CHAT_IDS")?
            .map(|raw| parse_chat_ids(&raw))
            .unwrap_or_default();

        let api_base = optional_var::<String>("TELEGRAM_API_BASE")?.unwrap_or_else(default_api_base);

        let config = Self {
            bot_token,
            admin_chat_id,
            subscriber_chat_ids,
            api_base,
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            bail!("telegram bot_token must not be empty");
        }
        if self.admin_chat_id.trim().is_empty() {
            bail!("telegram admin_chat_id must not be empty");
        }
        Ok(())
    }

    /// Admin first, then subscribers, without duplicates.
    pub fn chats_for(&self, audience: Audience) -> Vec<&str> {
        let mut chats = vec![self.admin_chat_id.as_str()];

        if audience == Audience::All {
            for chat in &self.subscriber_chat_ids {
                if !chats.contains(&chat.as_str()) {
                    chats.push(chat.as_str());
                }
            }
        }

        chats
    }
}

fn parse_chat_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
