pub mod favourites;
pub mod marketplace_client;
pub mod marketplace_config;
