pub mod listing;
pub mod snapshot;
