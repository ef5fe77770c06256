pub mod telegram_client;
pub mod telegram_config;
pub mod telegram_notifier;
