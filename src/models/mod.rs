pub mod app_config;
pub mod lyrics;
pub mod oauth;

pub use app_config::{AppConfig, AppState};
