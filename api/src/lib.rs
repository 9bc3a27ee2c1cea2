pub mod client;
pub mod espn;
pub mod extract;
pub mod fallback;
pub mod leaderboard;
pub mod rank;
pub mod select;

#[cfg(test)]
pub(crate) mod test_support;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types, independent of the ESPN wire format
// ---------------------------------------------------------------------------

/// Tournament lifecycle as reported by `status.type.state`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventState {
    Pre,
    In,
    Post,
    #[default]
    Unknown,
}

impl EventState {
    pub fn from_wire(state: Option<&str>) -> Self {
        match state.map(str::trim) {
            Some("pre") => EventState::Pre,
            Some("in") => EventState::In,
            Some("post") => EventState::Post,
            _ => EventState::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentInfo {
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub state: EventState,
    pub status_description: String, // raw "Round 3 - Suspended" etc.
    pub round_status: String,       // derived "R3 Susp", "Final", ...
}

/// One normalized leaderboard row. Position in the containing board is the
/// rank order; ties keep fetch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerEntry {
    pub rank: i64,          // parsed position, 999 when unknown
    pub rank_label: String, // rank text as the feed shows it ("1", "T3", "-")
    pub display_name: String,
    pub short_name: String,
    pub score_text: String, // "-5", "E", "+2"
    pub thru_text: String,  // "F", "12", "14*"
    pub on_course: bool,
}

/// A tournament paired with its own derived leaderboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub info: TournamentInfo,
    pub players: Vec<PlayerEntry>,
}

impl Board {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }
}
