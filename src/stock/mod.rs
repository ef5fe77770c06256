pub mod differ;
pub mod stock_tracker;
