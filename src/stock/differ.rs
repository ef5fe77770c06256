use crate::events::StockEvent;
use crate::types::listing::ListingRecord;
use crate::types::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Restocked,
    SoldOut,
    QuantityChanged,
}

/// First match wins: zero to positive is a restock, positive to zero is a
/// sell-out, and any other nonzero change in either direction is a quantity
/// change.
pub fn classify(previous: u32, current: u32) -> Option<Transition> {
    if previous == current {
        return None;
    }

    if previous == 0 {
        return Some(Transition::Restocked);
    }

    if current == 0 {
        return Some(Transition::SoldOut);
    }

    Some(Transition::QuantityChanged)
}

/// Events for every listing in `current`, in fetch order. Listings only
/// present in `previous` are ignored; unseen listings count as zero before.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<StockEvent> {
    current
        .iter()
        .filter_map(|record| {
            let before = previous.count(&record.id).unwrap_or(0);
            let transition = classify(before, record.available_count)?;

            Some(event_for(transition, before, record))
        })
        .collect()
}

fn event_for(transition: Transition, previous: u32, record: &ListingRecord) -> StockEvent {
    let id = record.id.clone();
    let store_name = record.store_name.clone();

    match transition {
        Transition::Restocked => StockEvent::Restocked {
            id,
            store_name,
            available: record.available_count,
            image_ref: record.image_ref.clone(),
        },
        Transition::SoldOut => StockEvent::SoldOut { id, store_name },
        Transition::QuantityChanged => StockEvent::QuantityChanged {
            id,
            store_name,
            previous,
            current: record.available_count,
        },
    }
}
