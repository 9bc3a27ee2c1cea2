//! Score, thru and on-course extraction from a competitor record.
//!
//! Each field has an ordered fallback chain because the golf feed puts the
//! same value in different places depending on the endpoint and round state.
//! All functions are total: a missing or odd value falls through to the
//! documented default.

use crate::espn::{EspnCompetitor, Loose};

pub const EVEN_PAR: &str = "E";
pub const FINISHED: &str = "F";
const ON_COURSE_MARKER: char = '*';
const HOLES_PER_ROUND: u32 = 18;

/// Score to par: direct `score` field, then the `score` statistic, then "E".
pub fn score(competitor: &EspnCompetitor) -> String {
    competitor
        .score
        .as_ref()
        .and_then(Loose::as_text)
        .or_else(|| statistic(competitor, "score"))
        .unwrap_or_else(|| EVEN_PAR.to_owned())
}

/// Holes completed: `thru` statistic, direct `thru`, `status.thru`,
/// `status.holesCompleted`, then "F".
pub fn thru(competitor: &EspnCompetitor) -> String {
    let status = competitor.status.as_ref();
    statistic(competitor, "thru")
        .or_else(|| competitor.thru.as_ref().and_then(Loose::as_text))
        .or_else(|| status.and_then(|s| s.thru.as_ref()).and_then(Loose::as_text))
        .or_else(|| {
            status
                .and_then(|s| s.holes_completed.as_ref())
                .and_then(Loose::as_text)
        })
        .unwrap_or_else(|| FINISHED.to_owned())
}

/// Whether the player's round is in progress, judged from the thru text.
pub fn on_course(competitor: &EspnCompetitor) -> bool {
    is_on_course(&thru(competitor))
}

pub fn is_on_course(thru_text: &str) -> bool {
    let thru_text = thru_text.trim();
    if thru_text.is_empty() || thru_text == FINISHED {
        return false;
    }
    if thru_text.contains(ON_COURSE_MARKER) {
        return true;
    }
    thru_text
        .parse::<u32>()
        .map(|holes| (1..=HOLES_PER_ROUND).contains(&holes))
        .unwrap_or(false)
}

fn statistic(competitor: &EspnCompetitor, name: &str) -> Option<String> {
    competitor
        .statistics
        .iter()
        .find(|s| s.name.as_deref() == Some(name))
        .and_then(|s| s.text())
}
