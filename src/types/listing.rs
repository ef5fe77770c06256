use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for ListingId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Observable state of one favourited listing at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub id: ListingId,
    pub store_name: String,
    /// Surplus bags currently on offer.
    pub available_count: u32,
    /// Cover picture shown alongside restock messages.
    pub image_ref: Option<String>,
}

#[cfg(test)]
impl ListingRecord {
    pub fn new(id: impl Into<ListingId>, store_name: impl Into<String>, available_count: u32) -> Self {
        Self {
            id: id.into(),
            store_name: store_name.into(),
            available_count,
            image_ref: None,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }
}
