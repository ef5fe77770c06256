pub mod stock_watcher;
