use log::LevelFilter;
use std::path::PathBuf;

pub const LOG_ENV: &str = "PGATUI_LOG";
pub const CONFIG_ENV: &str = "PGATUI_CONFIG";

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub config_path: Option<PathBuf>,
}

impl AppSettings {
    pub fn load() -> Self {
        Self {
            full_screen: false,
            log_level: std::env::var(LOG_ENV).ok().and_then(|raw| parse_level(&raw)),
            config_path: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        }
    }
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse().ok()
}
