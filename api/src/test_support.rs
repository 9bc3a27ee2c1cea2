//! In-memory scoreboard source for poll-cycle tests.

use crate::client::{ApiError, ApiResult, ScoreboardQuery, ScoreboardSource};
use crate::espn::ScoreboardResponse;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

/// Replies to live queries from a queue and to dated queries through a
/// callback, recording every query it sees.
pub struct ScriptedSource {
    live: Mutex<VecDeque<ApiResult<ScoreboardResponse>>>,
    dated: Box<dyn Fn(&ScoreboardQuery) -> ApiResult<ScoreboardResponse> + Send + Sync>,
    seen: Mutex<Vec<ScoreboardQuery>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            live: Mutex::new(VecDeque::new()),
            dated: Box::new(|_| Ok(ScoreboardResponse::default())),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_live(self, response: ApiResult<ScoreboardResponse>) -> Self {
        self.live.lock().unwrap().push_back(response);
        self
    }

    pub fn with_dated(
        mut self,
        reply: impl Fn(&ScoreboardQuery) -> ApiResult<ScoreboardResponse> + Send + Sync + 'static,
    ) -> Self {
        self.dated = Box::new(reply);
        self
    }

    pub fn queries(&self) -> Vec<ScoreboardQuery> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn live_calls(&self) -> usize {
        self.queries().iter().filter(|q| q.date.is_none()).count()
    }

    fn reply(&self, query: &ScoreboardQuery) -> ApiResult<ScoreboardResponse> {
        self.seen.lock().unwrap().push(query.clone());
        if query.date.is_some() {
            return (self.dated)(query);
        }
        self.live
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ScoreboardResponse::default()))
    }
}

impl ScoreboardSource for ScriptedSource {
    fn fetch_scoreboard(
        &self,
        query: &ScoreboardQuery,
    ) -> impl Future<Output = ApiResult<ScoreboardResponse>> + Send {
        let result = self.reply(query);
        async move { result }
    }
}

pub fn transport_error() -> ApiResult<ScoreboardResponse> {
    Err(ApiError::Other("connection refused".into()))
}

pub fn scoreboard(events: Vec<Value>) -> ScoreboardResponse {
    serde_json::from_value(json!({ "events": events })).unwrap()
}

/// An event with `players` competitors ranked 1..=players.
pub fn event(name: &str, start: DateTime<Utc>, state: &str, players: usize) -> Value {
    let competitors: Vec<Value> = (1..=players)
        .map(|n| {
            json!({
                "order": n,
                "athlete": { "displayName": format!("{name} Player {n}"), "shortName": format!("P. {n}") },
                "score": format!("-{}", 10 - n.min(10)),
                "statistics": [{ "name": "thru", "displayValue": "F" }]
            })
        })
        .collect();
    json!({
        "name": name,
        "date": start.format("%Y-%m-%dT%H:%MZ").to_string(),
        "status": { "type": { "state": state, "description": if state == "post" { "Final" } else { "Scheduled" } } },
        "competitions": [{ "competitors": competitors }]
    })
}

pub fn days(n: i64) -> TimeDelta {
    TimeDelta::days(n)
}
