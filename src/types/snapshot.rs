use std::collections::HashMap;
use std::fmt;

use crate::types::listing::{ListingId, ListingRecord};

/// Every favourited listing as returned by one successful fetch.
///
/// Records keep their fetch order so summaries read the same way the
/// marketplace lists them; lookups by id go through an index.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<ListingRecord>,
    index: HashMap<ListingId, usize>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ListingRecord>) -> Self {
        let mut snapshot = Self::empty();

        for record in records {
            snapshot.insert(record);
        }

        snapshot
    }

    fn insert(&mut self, record: ListingRecord) {
        match self.index.get(&record.id) {
            Some(&position) => {
                tracing::warn!(id = %record.id, "duplicate listing in fetch; keeping the later record");
                self.records[position] = record;
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, id: &ListingId) -> Option<&ListingRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn count(&self, id: &ListingId) -> Option<u32> {
        self.get(id).map(|record| record.available_count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListingRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_available(&self) -> u64 {
        self.records
            .iter()
            .map(|record| u64::from(record.available_count))
            .sum()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("listings", &self.records.len())
            .field("total_available", &self.total_available())
            .finish()
    }
}
