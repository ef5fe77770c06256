use std::future::Future;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION, COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;

use crate::inventory::InventorySource;
use crate::marketplace::favourites::{FavouritesPage, normalize};
use crate::marketplace::marketplace_config::MarketplaceConfig;
use crate::types::listing::ListingRecord;
use crate::types::snapshot::Snapshot;

const USER_AGENT_VALUE: &str = "TGTG/24.11.0 Dalvik/2.1.0 (Linux; U; Android 14; Pixel 7 Build/UQ1A.240105.004)";
const MAX_PAGES: u32 = 50;

#[derive(Clone, Debug)]
pub struct MarketplaceClient {
    http: reqwest::Client,
    config: MarketplaceConfig,
}

impl MarketplaceClient {
    pub fn new(config: MarketplaceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<FavouritesPage> {
        let uri_path = "/api/item/v8/";
        let body = ItemsRequest {
            user_id: &self.config.user_id,
            origin: Origin {
                latitude: self.config.latitude,
                longitude: self.config.longitude,
            },
            radius: self.config.radius,
            page_size: self.config.page_size,
            page,
            favorites_only: true,
            with_stock_only: false,
        };

        let resp = self
            .http
            .post(format!("{}{}", self.config.base_url.trim_end_matches('/'), uri_path))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .context("marketplace favourites POST failed")?;

        let status = resp.status();
        let text = resp.text().await.context("read response body failed")?;

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            anyhow::bail!("marketplace rejected the session ({status}); credentials may have expired");
        }

        if !status.is_success() {
            anyhow::bail!("marketplace http error {status}: {text}");
        }

        match serde_json::from_str(&text) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!(error = %e, %text, "failed to parse marketplace JSON response");
                anyhow::bail!("parse marketplace response JSON failed: {e}");
            }
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.config.access_token))
                .context("invalid access token header value")?,
        );

        if let Some(cookie) = &self.config.cookie {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(cookie).context("invalid cookie header value")?,
            );
        }

        Ok(headers)
    }
}

#[async_trait]
impl InventorySource for MarketplaceClient {
    async fn fetch_favourites(&self) -> Result<Snapshot> {
        let records = collect_pages(self.config.page_size, |page| self.fetch_page(page)).await?;

        tracing::debug!(listings = records.len(), "fetched favourites");

        Ok(Snapshot::from_records(records))
    }
}

/// Requests pages from 1 until a short page arrives or `MAX_PAGES` is hit.
async fn collect_pages<F, Fut>(page_size: u32, mut fetch_page: F) -> Result<Vec<ListingRecord>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<FavouritesPage>>,
{
    let mut records = Vec::new();

    for page in 1..=MAX_PAGES {
        let items = fetch_page(page).await?.items;
        let received = items.len();
        records.extend(normalize(items));

        if received < page_size as usize {
            return Ok(records);
        }
    }

    tracing::warn!(
        max_pages = MAX_PAGES,
        listings = records.len(),
        "favourites truncated at page limit; later listings will look dropped"
    );

    Ok(records)
}

#[derive(Debug, Serialize)]
struct ItemsRequest<'a> {
    user_id: &'a str,
    origin: Origin,
    radius: u32,
    page_size: u32,
    page: u32,
    favorites_only: bool,
    with_stock_only: bool,
}

#[derive(Debug, Serialize)]
struct Origin {
    latitude: f64,
    longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::favourites::{RawFavourite, RawId, RawItem, RawStore};

    fn page_of(page: u32, len: u32) -> FavouritesPage {
        FavouritesPage {
            items: (0..len)
                .map(|n| RawFavourite {
                    item: RawItem {
                        item_id: RawId::Text(format!("{page}-{n}")),
                    },
                    store: RawStore {
                        store_name: format!("Store {page}-{n}"),
                        cover_picture: None,
                    },
                    items_available: 1,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn paging_stops_on_short_page() {
        let mut requested = Vec::new();

        let records = collect_pages(2, |page| {
            requested.push(page);
            async move { Ok(page_of(page, if page == 1 { 2 } else { 1 })) }
        })
        .await
        .unwrap();

        assert_eq!(requested, vec![1, 2]);
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn paging_stops_at_page_limit() {
        let mut requested = 0;

        let records = collect_pages(2, |page| {
            requested += 1;
            async move { Ok(page_of(page, 2)) }
        })
        .await
        .unwrap();

        assert_eq!(requested, MAX_PAGES);
        assert_eq!(records.len(), 2 * MAX_PAGES as usize);
    }

    #[tokio::test]
    async fn page_error_fails_the_whole_fetch() {
        let result = collect_pages(2, |page| async move {
            if page == 2 {
                anyhow::bail!("marketplace http error 500");
            }
            Ok(page_of(page, 2))
        })
        .await;

        assert!(result.is_err());
    }

    fn config(cookie: Option<&str>) -> MarketplaceConfig {
        MarketplaceConfig {
            access_token: "token".to_string(),
            user_id: "42".to_string(),
            cookie: cookie.map(str::to_string),
            base_url: "https://example.test".to_string(),
            latitude: 52.5,
            longitude: 13.4,
            radius: 21,
            page_size: 20,
        }
    }

    #[test]
    fn headers_carry_bearer_and_cookie() {
        let client = MarketplaceClient::new(config(Some("datadome=abc")));

        let headers = client.headers().unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer token");
        assert_eq!(headers[COOKIE], "datadome=abc");
    }

    #[test]
    fn cookie_is_optional() {
        let headers = MarketplaceClient::new(config(None)).headers().unwrap();

        assert!(headers.get(COOKIE).is_none());
    }

    #[test]
    fn request_asks_for_favourites_only() {
        let body = serde_json::to_value(ItemsRequest {
            user_id: "42",
            origin: Origin {
                latitude: 1.0,
                longitude: 2.0,
            },
            radius: 21,
            page_size: 20,
            page: 1,
            favorites_only: true,
            with_stock_only: false,
        })
        .unwrap();

        assert_eq!(body["favorites_only"], true);
        assert_eq!(body["origin"]["longitude"], 2.0);
    }
}
