use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::config::optional_var;
use crate::marketplace::marketplace_config::MarketplaceConfig;
use crate::telegram::telegram_config::TelegramConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub marketplace: MarketplaceConfig,
    /// Only required when notifications go out through Telegram.
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

static CREDENTIALS: OnceCell<Credentials> = OnceCell::new();

impl Credentials {
    /// Environment first; the YAML file at `path` only when the environment
    /// is incomplete. Cached for the life of the process.
    pub fn load(path: &Path) -> Result<&'static Credentials> {
        CREDENTIALS.get_or_try_init(|| match Self::from_env() {
            Ok(credentials) => {
                tracing::info!("credentials loaded from environment");
                Ok(credentials)
            }
            Err(env_error) => {
                tracing::info!(reason = %env_error, path = %path.display(), "falling back to credentials file");
                Self::from_file(path)
            }
        })
    }

    pub fn from_env() -> Result<Self> {
        let marketplace = MarketplaceConfig::from_env()?;

        let telegram = match optional_var::<String>("TELEGRAM_BOT_TOKEN")? {
            Some(_) => Some(TelegramConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            marketplace,
            telegram,
        })
    }

    pub fn telegram(&self) -> Result<&TelegramConfig> {
        self.telegram
            .as_ref()
            .ok_or_else(|| anyhow!("telegram credentials missing"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read credentials {}", path.display()))?;

        let credentials: Credentials = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse credentials {}", path.display()))?;

        credentials
            .validate()
            .context("credentials validation failed")?;

        Ok(credentials)
    }

    fn validate(&self) -> Result<()> {
        self.marketplace.validate()?;
        if let Some(telegram) = &self.telegram {
            telegram.validate()?;
        }
        Ok(())
    }
}
