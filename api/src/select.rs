//! Tournament selection and board derivation.
//!
//! A scoreboard response can carry several tournaments at once (the one being
//! played, next week's, last week's). Selection is a single pass:
//!
//! - the first event that is in progress, or upcoming within the look-ahead
//!   window, becomes *current* (first match in feed order wins);
//! - independently, the completed event with the latest start date becomes the
//!   *completed* candidate, used to refresh the previous board without an extra
//!   request.

use crate::espn::{EspnCompetition, EspnEvent, Loose};
use crate::rank::{UNRANKED, rank_competitors, rank_field};
use crate::{Board, EventState, PlayerEntry, TournamentInfo, extract, rank};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use log::debug;

const DEFAULT_TOURNAMENT_NAME: &str = "PGA Tour";
const UNKNOWN_PLAYER: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default)]
pub struct Selection<'a> {
    pub current: Option<&'a EspnEvent>,
    pub completed: Option<&'a EspnEvent>,
}

/// Pick the current event and the latest completed event from one response.
pub fn select_events(events: &[EspnEvent], now: DateTime<Utc>, window_days: u32) -> Selection<'_> {
    let horizon = now + TimeDelta::days(i64::from(window_days));
    let mut current: Option<&EspnEvent> = None;
    let mut completed: Option<(DateTime<Utc>, &EspnEvent)> = None;

    for event in events {
        let Some(start) = event.date.as_deref().and_then(parse_start_date) else {
            debug!(
                "skipping event {:?}: missing or unparsable date {:?}",
                event.name, event.date
            );
            continue;
        };

        match EventState::from_wire(event.state()) {
            EventState::In if current.is_none() => current = Some(event),
            EventState::Pre if current.is_none() && start <= horizon => current = Some(event),
            EventState::Post if start < now => {
                if completed.is_none_or(|(best, _)| start > best) {
                    completed = Some((start, event));
                }
            }
            _ => {}
        }
    }

    Selection {
        current,
        completed: completed.map(|(_, event)| event),
    }
}

/// Parse the feed's start date. ESPN golf usually omits seconds
/// (`2024-01-04T05:00Z`), so several layouts are accepted.
pub fn parse_start_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Derive the short round label shown next to the tournament name.
///
/// Competition-level status wins over event-level status because it carries
/// the live round number during play.
pub fn round_status(event: &EspnEvent) -> String {
    let competition_status = event.competitions.first().and_then(|c| c.status.as_ref());
    let event_status = event.status.as_ref();

    let description = competition_status
        .and_then(|s| s.description())
        .or_else(|| event_status.and_then(|s| s.description()))
        .unwrap_or_default();
    let state = competition_status
        .and_then(|s| s.state())
        .or_else(|| event_status.and_then(|s| s.state()));
    let round = competition_status
        .and_then(|s| s.period.as_ref())
        .or_else(|| event_status.and_then(|s| s.period.as_ref()))
        .and_then(round_number);

    let lowered = description.to_lowercase();
    if lowered.contains("final") {
        return "Final".to_owned();
    }
    let Some(n) = round else {
        return description.to_owned();
    };
    if lowered.contains("suspended") {
        format!("R{n} Susp")
    } else if EventState::from_wire(state) == EventState::In || lowered.contains("progress") {
        format!("R{n} Live")
    } else if lowered.contains("complete") {
        format!("R{n} Done")
    } else {
        format!("R{n}")
    }
}

fn round_number(period: &Loose) -> Option<i64> {
    let n = rank::parse_position(Some(period));
    (n > 0 && n != UNRANKED).then_some(n)
}

pub fn tournament_info(event: &EspnEvent) -> TournamentInfo {
    TournamentInfo {
        name: event
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOURNAMENT_NAME.to_owned()),
        start_date: event.date.as_deref().and_then(parse_start_date),
        state: EventState::from_wire(event.state()),
        status_description: event
            .status
            .as_ref()
            .and_then(|s| s.description())
            .unwrap_or_default()
            .to_owned(),
        round_status: round_status(event),
    }
}

/// Build the info + ranked board for an event, keeping at most `limit` rows.
/// Rows come from the first competition; an event without one gets an empty board.
pub fn build_board(event: &EspnEvent, limit: usize) -> Board {
    let players = event
        .competitions
        .first()
        .map(|competition| player_entries(competition, limit))
        .unwrap_or_default();
    Board {
        info: tournament_info(event),
        players,
    }
}

fn player_entries(competition: &EspnCompetition, limit: usize) -> Vec<PlayerEntry> {
    rank_competitors(&competition.competitors)
        .into_iter()
        .take(limit)
        .map(|competitor| {
            let athlete = competitor.athlete.as_ref();
            let display_name = athlete
                .and_then(|a| a.display_name.clone())
                .unwrap_or_else(|| UNKNOWN_PLAYER.to_owned());
            let short_name = athlete
                .and_then(|a| a.short_name.clone())
                .unwrap_or_else(|| display_name.clone());
            let thru_text = extract::thru(competitor);
            PlayerEntry {
                rank: rank::position(competitor),
                rank_label: rank_field(competitor)
                    .and_then(Loose::as_text)
                    .unwrap_or_else(|| "-".to_owned()),
                display_name,
                short_name,
                score_text: extract::score(competitor),
                on_course: extract::is_on_course(&thru_text),
                thru_text,
            }
        })
        .collect()
}
