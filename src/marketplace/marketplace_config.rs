use anyhow::{Result, bail};
use serde::Deserialize;

use crate::config::{optional_var, required_var};

/// Session material for the marketplace API. Obtaining and refreshing the
/// tokens happens outside this process.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    pub access_token: String,
    pub user_id: String,
    #[serde(default)]
    pub cookie: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    "https://apptoogoodtogo.com".to_string()
}

fn default_radius() -> u32 {
    21
}

fn default_page_size() -> u32 {
    20
}

impl MarketplaceConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            access_token: required_var("TGTG_ACCESS_TOKEN")?,
            user_id: required_var("TGTG_USER_ID")?,
            cookie: optional_var("TGTG_COOKIE")?,
            base_url: optional_var("TGTG_BASE_URL")?.unwrap_or_else(default_base_url),
            latitude: optional_var("TGTG_LATITUDE")?.unwrap_or_default(),
            longitude: optional_var("TGTG_LONGITUDE")?.unwrap_or_default(),
            radius: optional_var("TGTG_RADIUS")?.unwrap_or_else(default_radius),
            page_size: default_page_size(),
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            bail!("marketplace access_token must not be empty");
        }
        if self.user_id.trim().is_empty() {
            bail!("marketplace user_id must not be empty");
        }
        if self.page_size == 0 {
            bail!("marketplace page_size must be > 0");
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            bail!("marketplace origin is out of range");
        }
        Ok(())
    }
}
