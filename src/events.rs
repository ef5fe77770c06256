use crate::types::listing::ListingId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockEvent {
    Restocked {
        id: ListingId,
        store_name: String,
        available: u32,
        image_ref: Option<String>,
    },
    SoldOut {
        id: ListingId,
        store_name: String,
    },
    QuantityChanged {
        id: ListingId,
        store_name: String,
        previous: u32,
        current: u32,
    },
}

impl StockEvent {
    pub fn listing_id(&self) -> &ListingId {
        match self {
            Self::Restocked { id, .. } | Self::SoldOut { id, .. } | Self::QuantityChanged { id, .. } => id,
        }
    }

    pub fn store_name(&self) -> &str {
        match self {
            Self::Restocked { store_name, .. }
            | Self::SoldOut { store_name, .. }
            | Self::QuantityChanged { store_name, .. } => store_name,
        }
    }
}
