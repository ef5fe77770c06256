use crate::events::StockEvent;
use crate::stock::differ;
use crate::types::snapshot::Snapshot;

/// Owns the one retained snapshot between checks.
#[derive(Debug, Default)]
pub struct StockTracker {
    previous: Snapshot,
}

impl StockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.previous
    }

    /// Diffs `current` against the retained snapshot, then replaces it
    /// wholesale.
    pub fn apply(&mut self, current: Snapshot) -> Vec<StockEvent> {
        let events = differ::diff(&self.previous, &current);
        self.previous = current;

        events
    }
}
