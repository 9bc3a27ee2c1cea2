use crate::components::panel::DisplayFrame;
use crate::plugin::LeaderboardPlugin;
use crate::state::app_settings::AppSettings;
use crate::state::config::{ConfigError, PluginConfig};
use log::{info, warn};
use pga_api::client::PgaApi;
use std::time::Duration;

pub struct App {
    pub settings: AppSettings,
    pub plugin: LeaderboardPlugin<PgaApi>,
    pub show_logs: bool,
    pub last_error: Option<String>,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();
        let config = PluginConfig::load(settings.config_path.as_deref());
        let plugin = LeaderboardPlugin::new(PgaApi::with_base_url(&config.api_base_url), config);

        let app = Self {
            settings,
            plugin,
            show_logs: false,
            last_error: None,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub async fn update(&mut self) {
        self.plugin.update().await;
    }

    pub fn advance_animation(&mut self) {
        self.plugin.tick_animation();
    }

    pub fn frame(&mut self) -> DisplayFrame {
        self.plugin.display()
    }

    pub fn frame_interval(&self) -> Duration {
        self.plugin.config().frame_interval()
    }

    pub fn toggle_show_logs(&mut self) {
        self.show_logs = !self.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    /// Re-read the config file and hand it to the plugin. A bad file leaves
    /// the running config alone.
    pub fn reload_config(&mut self) {
        match self.try_reload_config() {
            Ok(()) => self.last_error = None,
            Err(e) => {
                warn!("config reload rejected: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn try_reload_config(&mut self) -> Result<(), ConfigError> {
        let config = match &self.settings.config_path {
            Some(path) => PluginConfig::read(path)?,
            None => PluginConfig::default(),
        };
        let base_url_changed = config.api_base_url != self.plugin.config().api_base_url;
        let base_url = config.api_base_url.clone();
        self.plugin.on_config_change(config)?;
        if base_url_changed {
            info!("scoreboard host changed to {base_url}");
            self.plugin.set_source(PgaApi::with_base_url(base_url));
        }
        Ok(())
    }
}
