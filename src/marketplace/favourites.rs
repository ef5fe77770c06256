use serde::Deserialize;

use crate::types::listing::{ListingId, ListingRecord};

#[derive(Debug, Deserialize)]
pub struct FavouritesPage {
    #[serde(default)]
    pub items: Vec<RawFavourite>,
}

#[derive(Debug, Deserialize)]
pub struct RawFavourite {
    pub item: RawItem,
    pub store: RawStore,
    #[serde(default)]
    pub items_available: u32,
}

#[derive(Debug, Deserialize)]
pub struct RawItem {
    pub item_id: RawId,
}

/// Item ids arrive as strings, older payloads carry plain numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

#[derive(Debug, Deserialize)]
pub struct RawStore {
    pub store_name: String,
    #[serde(default)]
    pub cover_picture: Option<RawPicture>,
}

#[derive(Debug, Deserialize)]
pub struct RawPicture {
    #[serde(default)]
    pub current_url: Option<String>,
}

impl From<RawId> for ListingId {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Text(text) => ListingId::new(text),
            RawId::Number(number) => ListingId::from(number),
        }
    }
}

impl From<RawFavourite> for ListingRecord {
    fn from(raw: RawFavourite) -> Self {
        ListingRecord {
            id: raw.item.item_id.into(),
            store_name: raw.store.store_name,
            available_count: raw.items_available,
            image_ref: raw
                .store
                .cover_picture
                .and_then(|picture| picture.current_url)
                .filter(|url| !url.is_empty()),
        }
    }
}

pub fn normalize(items: Vec<RawFavourite>) -> Vec<ListingRecord> {
    items.into_iter().map(ListingRecord::from).collect()
}
