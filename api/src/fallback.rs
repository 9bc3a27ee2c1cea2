//! Previous-tournament resolution.
//!
//! The previous board can come from two places: the completed event that the
//! selector spotted in the live response, or a backward search over dated
//! scoreboards. [`resolve_previous`] hides which one produced it.

use crate::client::{ScoreboardQuery, ScoreboardSource};
use crate::select::build_board;
use crate::{Board, EventState};
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use std::time::Duration;

/// First day searched, counting back from today.
pub const SEARCH_START_DAYS: i64 = 1;
/// Days between searched dates.
pub const SEARCH_STRIDE_DAYS: i64 = 3;
/// Furthest day searched.
pub const SEARCH_LIMIT_DAYS: i64 = 30;
/// Dated scoreboards of past weeks don't change; cache them for a day.
pub const SEARCH_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq)]
pub enum PreviousResolution {
    /// Taken from the completed event in the live response.
    Captured(Board),
    /// Found by the backward date search.
    Searched { board: Board, days_back: i64 },
    /// Search exhausted without a completed tournament.
    NotFound,
}

impl PreviousResolution {
    pub fn into_board(self) -> Option<Board> {
        match self {
            PreviousResolution::Captured(board) | PreviousResolution::Searched { board, .. } => {
                Some(board)
            }
            PreviousResolution::NotFound => None,
        }
    }
}

/// Days back that the search visits: 1, 4, 7, ... up to the limit.
pub fn search_offsets() -> impl Iterator<Item = i64> {
    (SEARCH_START_DAYS..=SEARCH_LIMIT_DAYS).step_by(SEARCH_STRIDE_DAYS as usize)
}

/// Resolve the previous tournament board, preferring an already captured one.
///
/// Only searches when nothing was captured. Each stride issues one request;
/// failed requests are skipped, and the first completed event with players
/// ends the search.
pub async fn resolve_previous<S: ScoreboardSource>(
    source: &S,
    now: DateTime<Utc>,
    captured: Option<Board>,
    limit: usize,
) -> PreviousResolution {
    if let Some(board) = captured {
        debug!("previous tournament captured from live response: {}", board.name());
        return PreviousResolution::Captured(board);
    }

    for days_back in search_offsets() {
        let date = (now - TimeDelta::days(days_back)).date_naive();
        let key = format!("previous_{}", date.format("%Y%m%d"));
        let query = ScoreboardQuery::on_date(date).cached(key, SEARCH_CACHE_TTL);

        let response = match source.fetch_scoreboard(&query).await {
            Ok(response) => response,
            Err(e) => {
                warn!("previous tournament lookup for {date} failed: {e}");
                continue;
            }
        };

        let found = response
            .events
            .iter()
            .filter(|e| EventState::from_wire(e.state()) == EventState::Post)
            .map(|e| build_board(e, limit))
            .find(|board| !board.is_empty());

        if let Some(board) = found {
            info!(
                "loaded previous tournament {} with {} players ({days_back} days back)",
                board.name(),
                board.players.len()
            );
            return PreviousResolution::Searched { board, days_back };
        }
    }

    info!("no previous tournaments found in the last {SEARCH_LIMIT_DAYS} days");
    PreviousResolution::NotFound
}
