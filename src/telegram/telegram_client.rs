use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::telegram::telegram_config::TelegramConfig;

#[derive(Clone, Debug)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: Url,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_base)
            .with_context(|| format!("invalid telegram api base {}", config.api_base))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            bot_token: config.bot_token.clone(),
        })
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<SentMessage> {
        let request = SendMessage { chat_id, text };

        self.call("sendMessage", &request).await
    }

    pub async fn send_photo(
        &self,
        chat_id: &str,
        photo: &str,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        let request = SendPhoto {
            chat_id,
            photo,
            caption,
        };

        self.call("sendPhoto", &request).await
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("telegram api base {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .push(&format!("bot{}", self.bot_token))
            .push(method);

        Ok(url)
    }

    async fn call<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        let resp = self
            .http
            .post(self.method_url(method)?)
            .json(body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("telegram {method} request failed"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("read response body failed")?;

        parse_envelope(method, status, &text)
    }
}

fn parse_envelope<T: DeserializeOwned>(
    method: &str,
    status: reqwest::StatusCode,
    text: &str,
) -> Result<T> {
    let parsed: TelegramResponse<T> = match serde_json::from_str(text) {
        Ok(p) => p,
        Err(e) => {
            anyhow::bail!("telegram {method} http {status}, unparseable body: {e}; raw={text}");
        }
    };

    if !parsed.ok || !status.is_success() {
        anyhow::bail!(
            "telegram {method} failed ({status}): {}",
            parsed.description.as_deref().unwrap_or("no description")
        );
    }

    match parsed.result {
        Some(result) => Ok(result),
        None => anyhow::bail!("telegram {method} response missing `result`; raw={text}"),
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}
