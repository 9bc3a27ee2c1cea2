pub mod app_settings;
pub mod config;
pub mod messages;
pub mod refresher;
