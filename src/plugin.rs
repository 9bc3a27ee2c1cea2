//! The leaderboard plugin: the `update()` / `display()` pair a host drives.
//!
//! `update` runs one poll cycle behind a panic boundary. `display` only reads
//! the settled state and builds a frame for the LED panel; the scrolling ticker
//! is the only thing it caches, and that cache is dropped after each settled
//! poll or config change.

use crate::components::panel::{DisplayFrame, PanelGeometry};
use crate::components::ticker::Ticker;
use crate::state::config::{ConfigError, PluginConfig, Rgb};
use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::FutureExt;
use log::{error, info};
use pga_api::client::ScoreboardSource;
use pga_api::leaderboard::{PollOutcome, Poller};
use pga_api::{Board, PlayerEntry};
use serde::Serialize;
use std::cell::Cell;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

pub const PREVIOUS_PREFIX: &str = "PREV: ";
const HIGHLIGHTED_ROWS: usize = 3;
const TICKER_SEPARATOR: &str = "   ";

thread_local! {
    static POLL_IN_FLIGHT: Cell<bool> = const { Cell::new(false) };
}

/// True while this thread is inside a poll cycle, whose panics `update`
/// catches. Panic hooks use it to leave the terminal alone.
pub fn poll_in_flight() -> bool {
    POLL_IN_FLIGHT.with(Cell::get)
}

/// Summary of what the plugin holds, for the host's status line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PluginInfo {
    pub current_tournament: Option<String>,
    pub players_count: usize,
    pub previous_tournament: Option<String>,
    pub previous_players_count: usize,
    pub last_update: Option<String>,
}

pub struct LeaderboardPlugin<S> {
    source: S,
    config: PluginConfig,
    poller: Poller,
    ticker: Ticker,
    render_stale: bool,
    last_poll_failed: bool,
}

impl<S: ScoreboardSource> LeaderboardPlugin<S> {
    pub fn new(source: S, config: PluginConfig) -> Self {
        Self {
            source,
            poller: Poller::new(config.poll_settings()),
            ticker: Ticker::new(config.scroll_speed, config.scroll_fps),
            config,
            render_stale: true,
            last_poll_failed: false,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn set_source(&mut self, source: S) {
        self.source = source;
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.poller.state().current_board()
    }

    pub fn previous_board(&self) -> Option<&Board> {
        self.poller.state().previous_board()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.poller.state().last_update()
    }

    pub fn last_poll_failed(&self) -> bool {
        self.last_poll_failed
    }

    pub fn display_duration(&self) -> Duration {
        self.config.display_duration()
    }

    pub async fn update(&mut self) {
        self.update_at(Utc::now()).await;
    }

    /// Run one poll cycle as of `now`. Never fails: a fetch error or a panic
    /// inside the cycle leaves the last settled state in place.
    pub async fn update_at(&mut self, now: DateTime<Utc>) {
        if !self.config.enabled {
            return;
        }

        let poll = AssertUnwindSafe(self.poller.poll(&self.source, now)).catch_unwind();
        POLL_IN_FLIGHT.with(|flag| flag.set(true));
        let outcome = poll.await;
        POLL_IN_FLIGHT.with(|flag| flag.set(false));
        match outcome {
            Ok(PollOutcome::Settled { .. }) => {
                self.last_poll_failed = false;
                self.render_stale = true;
            }
            Ok(PollOutcome::FetchFailed { .. }) => self.last_poll_failed = true,
            Ok(PollOutcome::Throttled { .. }) => {}
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_owned());
                error!("poll aborted by panic, keeping previous leaderboard: {reason}");
                self.poller.abort();
                self.last_poll_failed = true;
            }
        }
    }

    /// Advance the ticker by one animation frame.
    pub fn tick_animation(&mut self) {
        self.ticker.advance();
    }

    /// Build the frame for the panel from the last settled state.
    pub fn display(&mut self) -> DisplayFrame {
        let geometry = PanelGeometry::for_pixels(self.config.display_width, self.config.display_height);
        let mut frame = DisplayFrame::new(geometry);

        let state = self.poller.state();
        let shown = state
            .current_board()
            .filter(|board| !board.is_empty())
            .map(|board| (board, false))
            .or_else(|| state.previous_board().map(|board| (board, true)));

        let Some((board, is_previous)) = shown else {
            if self.last_poll_failed {
                frame.push("Error loading", Rgb::RED);
                frame.push("leaderboard", Rgb::RED);
            } else {
                frame.push("No PGA Tour", self.config.text_color);
                frame.push("tournaments", self.config.text_color);
            }
            return frame;
        };

        if self.render_stale || !self.ticker.has_content() {
            self.ticker.set_content(&ticker_text(&board.players));
            self.render_stale = false;
        }

        let title = if is_previous {
            format!("{PREVIOUS_PREFIX}{}", board.name())
        } else {
            board.name().to_owned()
        };
        frame.push(&title, self.config.highlight_color);
        frame.push(&board.info.round_status, self.config.text_color);
        frame.push(&self.ticker.visible(geometry.columns), self.config.text_color);

        for (i, player) in board.players.iter().enumerate() {
            if frame.is_full() {
                break;
            }
            let color = if i < HIGHLIGHTED_ROWS {
                self.config.highlight_color
            } else {
                self.config.text_color
            };
            frame.push(&player_row(player), color);
        }
        frame
    }

    pub fn info(&self) -> PluginInfo {
        let current = self.current_board();
        let previous = self.previous_board();
        PluginInfo {
            current_tournament: current.map(|b| b.name().to_owned()),
            players_count: current.map_or(0, |b| b.players.len()),
            previous_tournament: previous.map(|b| b.name().to_owned()),
            previous_players_count: previous.map_or(0, |b| b.players.len()),
            last_update: self
                .last_update()
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    /// Apply a new config. The settled leaderboard is kept; the next poll and
    /// the next frame use the new values.
    pub fn on_config_change(&mut self, config: PluginConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.poller.set_settings(config.poll_settings());
        self.ticker.configure(config.scroll_speed, config.scroll_fps);
        self.config = config;
        self.render_stale = true;
        info!("leaderboard config updated");
        Ok(())
    }

    pub fn cleanup(&mut self) {
        self.poller.clear();
        self.source.clear_cache();
        self.ticker.clear();
        self.render_stale = true;
        self.last_poll_failed = false;
        info!("leaderboard plugin cleaned up");
    }
}

/// `"{rank}. {name} {score}"`, plus holes played while the player is on course.
pub fn player_row(player: &PlayerEntry) -> String {
    let mut row = format!("{}. {} {}", player.rank_label, player.short_name, player.score_text);
    if player.on_course {
        row.push(' ');
        row.push_str(&player.thru_text);
    }
    row
}

fn ticker_text(players: &[PlayerEntry]) -> String {
    players
        .iter()
        .map(player_row)
        .collect::<Vec<_>>()
        .join(TICKER_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use pga_api::client::{ApiError, ApiResult, ScoreboardQuery};
    use pga_api::espn::ScoreboardResponse;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Replies {
        live: Mutex<VecDeque<ApiResult<ScoreboardResponse>>>,
        calls: AtomicUsize,
        panic_next: AtomicBool,
        cache_clears: AtomicUsize,
    }

    impl Replies {
        fn push(self, reply: ApiResult<ScoreboardResponse>) -> Self {
            self.live.lock().unwrap().push_back(reply);
            self
        }
    }

    impl ScoreboardSource for Replies {
        fn fetch_scoreboard(
            &self,
            query: &ScoreboardQuery,
        ) -> impl Future<Output = ApiResult<ScoreboardResponse>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = if self.panic_next.swap(false, Ordering::SeqCst) {
                panic!("malformed payload");
            } else if query.date.is_some() {
                Ok(ScoreboardResponse::default())
            } else {
                self.live
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Ok(ScoreboardResponse::default()))
            };
            async move { reply }
        }

        fn clear_cache(&self) {
            self.cache_clears.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 11, 18, 0, 0).unwrap()
    }

    fn competitor(order: u32, short: &str, score: &str, thru: &str) -> Value {
        json!({
            "order": order,
            "athlete": { "displayName": short, "shortName": short },
            "score": score,
            "statistics": [{ "name": "thru", "displayValue": thru }]
        })
    }

    fn scoreboard(name: &str, state: &str, start: DateTime<Utc>, competitors: Vec<Value>) -> ScoreboardResponse {
        serde_json::from_value(json!({
            "events": [{
                "name": name,
                "date": start.format("%Y-%m-%dT%H:%MZ").to_string(),
                "status": { "type": { "state": state } },
                "competitions": [{
                    "status": { "period": 3, "type": { "state": state, "description": "Round 3 - In Progress" } },
                    "competitors": competitors
                }]
            }]
        }))
        .unwrap()
    }

    fn masters() -> ScoreboardResponse {
        scoreboard(
            "Masters Tournament",
            "in",
            now() - TimeDelta::days(2),
            vec![
                competitor(1, "S. Scheffler", "-11", "14*"),
                competitor(2, "R. McIlroy", "-9", "F"),
                competitor(3, "J. Rahm", "-8", "12"),
                competitor(4, "X. Schauffele", "-7", "F"),
                competitor(5, "L. Aberg", "-6", "F"),
            ],
        )
    }

    fn plugin(replies: Replies) -> LeaderboardPlugin<Replies> {
        LeaderboardPlugin::new(replies, PluginConfig::default())
    }

    #[tokio::test]
    async fn update_then_display_current_board() {
        let mut plugin = plugin(Replies::default().push(Ok(masters())));
        plugin.update_at(now()).await;

        let frame = plugin.display();
        let texts = frame.texts();
        assert_eq!(texts.len(), 5);
        assert_eq!(texts[0], "Masters Tournament");
        assert_eq!(texts[1], "R3 Live");
        assert_eq!(texts[3], "1. S. Scheffler -11 14*");
        assert_eq!(texts[4], "2. R. McIlroy -9");
        assert_eq!(frame.lines[3].color, Rgb::GOLD);
    }

    #[tokio::test]
    async fn ticker_carries_every_row() {
        let mut plugin = plugin(Replies::default().push(Ok(masters())));
        plugin.update_at(now()).await;
        plugin.display();
        assert!(plugin.ticker.has_content());
        let all = plugin.ticker.visible(500);
        assert!(all.contains("3. J. Rahm -8 12"));
        assert!(all.contains("5. L. Aberg -6"));
    }

    #[tokio::test]
    async fn display_is_stable_between_polls() {
        let mut plugin = plugin(Replies::default().push(Ok(masters())));
        plugin.update_at(now()).await;
        let first = plugin.display();
        assert_eq!(plugin.display(), first);
        assert_eq!(plugin.display(), first);
    }

    #[tokio::test]
    async fn animation_moves_only_the_ticker_line() {
        let mut plugin = plugin(Replies::default().push(Ok(masters())));
        plugin.update_at(now()).await;
        let before = plugin.display();
        for _ in 0..12 {
            plugin.tick_animation();
        }
        let after = plugin.display();
        assert_ne!(before.lines[2], after.lines[2]);
        assert_eq!(before.lines[0], after.lines[0]);
        assert_eq!(before.lines[3..], after.lines[3..]);
    }

    #[tokio::test]
    async fn previous_board_is_marked() {
        let post = scoreboard(
            "RBC Heritage",
            "post",
            now() - TimeDelta::days(9),
            vec![competitor(1, "J. Thomas", "-17", "F")],
        );
        let mut plugin = plugin(Replies::default().push(Ok(post)));
        plugin.update_at(now()).await;

        let frame = plugin.display();
        assert_eq!(frame.texts()[0], "PREV: RBC Heritage");
        assert!(plugin.current_board().is_none());
    }

    #[test]
    fn empty_state_shows_no_tournaments() {
        let mut plugin = plugin(Replies::default());
        assert_eq!(plugin.display().texts(), vec!["No PGA Tour", "tournaments"]);
    }

    #[tokio::test]
    async fn failed_first_poll_shows_error_frame() {
        let mut plugin = plugin(Replies::default().push(Err(ApiError::Other("offline".into()))));
        plugin.update_at(now()).await;
        let frame = plugin.display();
        assert_eq!(frame.texts(), vec!["Error loading", "leaderboard"]);
        assert_eq!(frame.lines[0].color, Rgb::RED);
        assert!(plugin.last_update().is_none());
    }

    #[tokio::test]
    async fn failed_poll_keeps_showing_last_board() {
        let replies = Replies::default()
            .push(Ok(masters()))
            .push(Err(ApiError::Other("offline".into())));
        let mut plugin = plugin(replies);
        plugin.update_at(now()).await;
        plugin.update_at(now() + TimeDelta::seconds(601)).await;

        assert!(plugin.last_poll_failed());
        assert_eq!(plugin.display().texts()[0], "Masters Tournament");
    }

    #[tokio::test]
    async fn panic_during_poll_keeps_state() {
        let mut plugin = plugin(Replies::default().push(Ok(masters())));
        plugin.update_at(now()).await;
        let before = plugin.info();

        plugin.source.panic_next.store(true, Ordering::SeqCst);
        plugin.update_at(now() + TimeDelta::seconds(601)).await;

        assert_eq!(plugin.info(), before);
        assert!(plugin.last_poll_failed());
    }

    #[tokio::test]
    async fn disabled_plugin_never_fetches() {
        let config = PluginConfig { enabled: false, ..Default::default() };
        let mut plugin = LeaderboardPlugin::new(Replies::default().push(Ok(masters())), config);
        plugin.update_at(now()).await;
        assert_eq!(plugin.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn info_reports_boards_and_timestamp() {
        let mut plugin = plugin(Replies::default().push(Ok(masters())));
        plugin.update_at(now()).await;
        let info = plugin.info();
        assert_eq!(info.current_tournament.as_deref(), Some("Masters Tournament"));
        assert_eq!(info.players_count, 5);
        assert_eq!(info.previous_tournament, None);
        assert_eq!(info.last_update.as_deref(), Some("2026-04-11T18:00:00Z"));
    }

    #[tokio::test]
    async fn config_change_keeps_state_and_applies_to_next_poll() {
        let mut plugin = plugin(Replies::default().push(Ok(masters())).push(Ok(masters())));
        plugin.update_at(now()).await;

        let config = PluginConfig {
            max_players: 2,
            fallback_players: 2,
            update_interval: 60,
            ..Default::default()
        };
        plugin.on_config_change(config).unwrap();
        assert_eq!(plugin.current_board().map(|b| b.players.len()), Some(5));

        plugin.update_at(now() + TimeDelta::seconds(60)).await;
        assert_eq!(plugin.current_board().map(|b| b.players.len()), Some(2));
    }

    #[test]
    fn invalid_config_change_is_rejected() {
        let mut plugin = plugin(Replies::default());
        let bad = PluginConfig { max_players: 0, ..Default::default() };
        assert!(plugin.on_config_change(bad).is_err());
        assert_eq!(plugin.config().max_players, 10);
    }

    #[tokio::test]
    async fn cleanup_empties_everything() {
        let mut plugin = plugin(Replies::default().push(Ok(masters())));
        plugin.update_at(now()).await;
        plugin.display();
        plugin.cleanup();

        assert_eq!(plugin.info(), PluginInfo::default());
        assert!(!plugin.ticker.has_content());
        assert_eq!(plugin.display().texts(), vec!["No PGA Tour", "tournaments"]);
        assert_eq!(plugin.source.cache_clears.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rows_show_thru_only_on_course() {
        let mut player = PlayerEntry {
            rank: 1,
            rank_label: "T2".into(),
            short_name: "T. Fleetwood".into(),
            score_text: "-4".into(),
            thru_text: "F".into(),
            ..Default::default()
        };
        assert_eq!(player_row(&player), "T2. T. Fleetwood -4");
        player.thru_text = "16".into();
        player.on_course = true;
        assert_eq!(player_row(&player), "T2. T. Fleetwood -4 16");
    }
}
