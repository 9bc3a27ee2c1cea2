//! Leaderboard state and the poll cycle that refreshes it.
//!
//! One [`Poller`] owns one [`LeaderboardState`]. A poll runs
//! `Idle → Fetching → Reconciling → Settled → Idle`; the state is replaced in
//! one assignment at the end of a successful cycle, so readers never see a
//! half-derived board.

use crate::client::{ScoreboardQuery, ScoreboardSource};
use crate::fallback::{PreviousResolution, resolve_previous};
use crate::select::{build_board, select_events};
use crate::Board;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::time::Duration;

/// Poll ceiling while no tournament is current, so a starting tournament is
/// picked up quickly even with a long configured interval.
pub const FAST_RETRY_INTERVAL: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub max_players: usize,
    pub fallback_players: usize,
    pub date_range_days: u32,
    pub update_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_players: 10,
            fallback_players: 5,
            date_range_days: 7,
            update_interval: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardState {
    current: Option<Board>,
    previous: Option<Board>,
    last_update: Option<DateTime<Utc>>,
}

impl LeaderboardState {
    pub fn current_board(&self) -> Option<&Board> {
        self.current.as_ref()
    }

    pub fn previous_board(&self) -> Option<&Board> {
        self.previous.as_ref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.previous.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollPhase {
    #[default]
    Idle,
    Fetching,
    Reconciling,
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Too soon since the last successful poll; nothing fetched.
    Throttled { remaining: Duration },
    /// The live fetch failed; state left untouched.
    FetchFailed { reason: String },
    /// State replaced. Names are what is now held.
    Settled {
        current: Option<String>,
        previous: Option<String>,
    },
}

#[derive(Debug, Default)]
pub struct Poller {
    settings: PollSettings,
    state: LeaderboardState,
    phase: PollPhase,
}

impl Poller {
    pub fn new(settings: PollSettings) -> Self {
        Self { settings, ..Self::default() }
    }

    pub fn state(&self) -> &LeaderboardState {
        &self.state
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    /// Swap settings; the settled state is kept and the next poll uses them.
    pub fn set_settings(&mut self, settings: PollSettings) {
        self.settings = settings;
    }

    pub fn clear(&mut self) {
        self.state.clear();
        self.phase = PollPhase::Idle;
    }

    /// Return to idle after a cycle that never finished. The settled state is
    /// untouched.
    pub fn abort(&mut self) {
        if self.phase != PollPhase::Idle {
            warn!("poll abandoned during {:?}", self.phase);
        }
        self.transition(PollPhase::Idle);
    }

    /// Configured interval, capped at [`FAST_RETRY_INTERVAL`] while no
    /// tournament is current.
    pub fn effective_interval(&self) -> Duration {
        if self.state.current.is_none() {
            self.settings.update_interval.min(FAST_RETRY_INTERVAL)
        } else {
            self.settings.update_interval
        }
    }

    /// Time left before the next poll may fetch; zero when due.
    pub fn time_until_due(&self, now: DateTime<Utc>) -> Duration {
        let Some(last) = self.state.last_update else {
            return Duration::ZERO;
        };
        let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
        self.effective_interval().saturating_sub(elapsed)
    }

    /// Run one poll cycle against `source` at time `now`.
    pub async fn poll<S: ScoreboardSource>(&mut self, source: &S, now: DateTime<Utc>) -> PollOutcome {
        let remaining = self.time_until_due(now);
        if !remaining.is_zero() {
            debug!("skipping update, next poll due in {}s", remaining.as_secs());
            return PollOutcome::Throttled { remaining };
        }

        self.transition(PollPhase::Fetching);
        let response = match source.fetch_scoreboard(&ScoreboardQuery::live()).await {
            Ok(response) => response,
            Err(e) => {
                warn!("failed to fetch PGA Tour scoreboard: {e}");
                self.transition(PollPhase::Idle);
                return PollOutcome::FetchFailed { reason: e.to_string() };
            }
        };

        self.transition(PollPhase::Reconciling);
        if response.events.is_empty() {
            warn!("no events found in scoreboard response");
        }
        let selection = select_events(&response.events, now, self.settings.date_range_days);
        let current = selection
            .current
            .map(|event| build_board(event, self.settings.max_players));
        let captured = selection
            .completed
            .map(|event| build_board(event, self.settings.fallback_players))
            .filter(|board| !board.is_empty());

        let resolution = if current.is_none() {
            info!(
                "no tournament within {} days, resolving previous tournament",
                self.settings.date_range_days
            );
            resolve_previous(source, now, captured, self.settings.fallback_players).await
        } else {
            captured.map_or(PreviousResolution::NotFound, PreviousResolution::Captured)
        };

        let lost_current = self.state.current.is_some() && current.is_none();
        let previous = match resolution.into_board() {
            Some(candidate) if replaces_previous(self.state.previous.as_ref(), &candidate, lost_current) => {
                Some(candidate)
            }
            _ => self.state.previous.clone(),
        };

        self.state = LeaderboardState {
            current,
            previous,
            last_update: Some(self.state.last_update.map_or(now, |last| last.max(now))),
        };
        self.transition(PollPhase::Settled);
        self.log_settled();
        self.transition(PollPhase::Idle);

        PollOutcome::Settled {
            current: self.state.current.as_ref().map(|b| b.name().to_owned()),
            previous: self.state.previous.as_ref().map(|b| b.name().to_owned()),
        }
    }

    fn transition(&mut self, next: PollPhase) {
        debug!("poll phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn log_settled(&self) {
        if let Some(board) = &self.state.current {
            info!(
                "updated PGA Tour data: {} ({} players)",
                board.name(),
                board.players.len()
            );
        } else if let Some(board) = &self.state.previous {
            info!(
                "using previous tournament: {} ({} players)",
                board.name(),
                board.players.len()
            );
        } else {
            info!("no active or previous tournaments found");
        }
    }
}

/// A held previous board is only replaced by a tournament that started no
/// earlier, or by any result when the current tournament just went away.
fn replaces_previous(held: Option<&Board>, candidate: &Board, lost_current: bool) -> bool {
    let Some(held) = held else {
        return true;
    };
    if lost_current {
        return true;
    }
    match (held.info.start_date, candidate.info.start_date) {
        (Some(held_start), Some(candidate_start)) => candidate_start >= held_start,
        (None, _) => true,
        (Some(_), None) => false,
    }
}
