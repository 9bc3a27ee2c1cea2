use log::warn;
use pga_api::client::ESPN_SPORTS_BASE;
use pga_api::leaderboard::PollSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    pub const GOLD: Rgb = Rgb { r: 255, g: 215, b: 0 };
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, reason: String },
    Parse(String),
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, reason } => write!(f, "invalid {key}: {reason}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Io(msg) => write!(f, "config read error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Plugin configuration as stored in the host's JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub enabled: bool,
    /// Seconds the host keeps this plugin on screen.
    pub display_duration: f64,
    /// Seconds between polls while a tournament is current.
    pub update_interval: u64,
    pub max_players: usize,
    pub fallback_players: usize,
    /// Look-ahead window in days for upcoming tournaments.
    pub tournament_date_range: u32,
    pub text_color: Rgb,
    pub highlight_color: Rgb,
    /// Ticker speed in columns per second.
    pub scroll_speed: f64,
    pub scroll_fps: u32,
    pub display_width: u32,
    pub display_height: u32,
    pub api_base_url: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display_duration: 15.0,
            update_interval: 600,
            max_players: 10,
            fallback_players: 5,
            tournament_date_range: 7,
            text_color: Rgb::WHITE,
            highlight_color: Rgb::GOLD,
            scroll_speed: 8.0,
            scroll_fps: 12,
            display_width: 128,
            display_height: 32,
            api_base_url: ESPN_SPORTS_BASE.to_owned(),
        }
    }
}

/// Largest panel edge accepted, in pixels.
pub const MAX_DISPLAY_PIXELS: u32 = 1024;

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { key, reason: reason.into() }
}

impl PluginConfig {
    /// Check every value against its allowed range, reporting the first offender.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.display_duration > 0.0) {
            return Err(invalid("display_duration", "must be greater than 0"));
        }
        if self.update_interval < 1 {
            return Err(invalid("update_interval", "must be at least 1 second"));
        }
        if !(1..=20).contains(&self.max_players) {
            return Err(invalid("max_players", format!("{} not in 1..=20", self.max_players)));
        }
        if !(1..=20).contains(&self.fallback_players) {
            return Err(invalid(
                "fallback_players",
                format!("{} not in 1..=20", self.fallback_players),
            ));
        }
        if self.fallback_players > self.max_players {
            return Err(invalid(
                "fallback_players",
                format!("{} exceeds max_players {}", self.fallback_players, self.max_players),
            ));
        }
        if self.tournament_date_range > 30 {
            return Err(invalid(
                "tournament_date_range",
                format!("{} not in 0..=30", self.tournament_date_range),
            ));
        }
        if !(self.scroll_speed > 0.0) {
            return Err(invalid("scroll_speed", "must be greater than 0"));
        }
        if !(1..=60).contains(&self.scroll_fps) {
            return Err(invalid("scroll_fps", format!("{} not in 1..=60", self.scroll_fps)));
        }
        if !(8..=MAX_DISPLAY_PIXELS).contains(&self.display_width) {
            return Err(invalid(
                "display_width",
                format!("{} not in 8..={MAX_DISPLAY_PIXELS} pixels", self.display_width),
            ));
        }
        if !(8..=MAX_DISPLAY_PIXELS).contains(&self.display_height) {
            return Err(invalid(
                "display_height",
                format!("{} not in 8..={MAX_DISPLAY_PIXELS} pixels", self.display_height),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        Ok(())
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: PluginConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Load from `path`, falling back to defaults when it is unset, missing or invalid.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::read(path).unwrap_or_else(|e| {
            warn!("using default config: {e}");
            Self::default()
        })
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            max_players: self.max_players,
            fallback_players: self.fallback_players,
            date_range_days: self.tournament_date_range,
            update_interval: Duration::from_secs(self.update_interval),
        }
    }

    pub fn display_duration(&self) -> Duration {
        Duration::from_secs_f64(self.display_duration)
    }

    /// One animation frame at `scroll_fps`.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.scroll_fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PluginConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_players, 10);
        assert_eq!(config.highlight_color, Rgb::GOLD);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = PluginConfig::from_json(r#"{ "max_players": 15, "update_interval": 300 }"#).unwrap();
        assert_eq!(config.max_players, 15);
        assert_eq!(config.update_interval, 300);
        assert_eq!(config.fallback_players, 5);
        assert_eq!(config.scroll_fps, 12);
    }

    #[test]
    fn out_of_range_values_name_the_key() {
        let cases = [
            (r#"{ "max_players": 0 }"#, "max_players"),
            (r#"{ "max_players": 21 }"#, "max_players"),
            (r#"{ "fallback_players": 40 }"#, "fallback_players"),
            (r#"{ "max_players": 3, "fallback_players": 5 }"#, "fallback_players"),
            (r#"{ "tournament_date_range": 31 }"#, "tournament_date_range"),
            (r#"{ "update_interval": 0 }"#, "update_interval"),
            (r#"{ "scroll_speed": 0.0 }"#, "scroll_speed"),
            (r#"{ "scroll_fps": 0 }"#, "scroll_fps"),
            (r#"{ "display_height": 4 }"#, "display_height"),
            (r#"{ "display_width": 4096 }"#, "display_width"),
            (r#"{ "display_height": 70000 }"#, "display_height"),
        ];
        for (raw, expected) in cases {
            match PluginConfig::from_json(raw) {
                Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, expected, "{raw}"),
                other => panic!("{raw}: expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn fallback_may_equal_max_players() {
        let config = PluginConfig::from_json(r#"{ "max_players": 3, "fallback_players": 3 }"#).unwrap();
        assert_eq!(config.fallback_players, 3);
        assert!(PluginConfig::from_json(r#"{ "display_width": 1024, "display_height": 1024 }"#).is_ok());
    }

    #[test]
    fn zero_day_window_is_allowed() {
        assert!(PluginConfig::from_json(r#"{ "tournament_date_range": 0 }"#).is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(PluginConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = PluginConfig::load(Some(Path::new("/nonexistent/pgatui.json")));
        assert_eq!(config, PluginConfig::default());
        assert_eq!(PluginConfig::load(None), PluginConfig::default());
    }

    #[test]
    fn poll_settings_follow_config() {
        let config = PluginConfig { update_interval: 90, tournament_date_range: 3, ..Default::default() };
        let settings = config.poll_settings();
        assert_eq!(settings.update_interval, Duration::from_secs(90));
        assert_eq!(settings.date_range_days, 3);
        assert_eq!(config.frame_interval(), Duration::from_millis(83));
    }
}
