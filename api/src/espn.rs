//! ESPN API raw wire types: serde shapes for deserializing the golf scoreboard.
//! These map to our clean domain types via the extract/select modules.
//!
//! The golf feed is inconsistent across tournaments and endpoints: the same
//! field can be a number, a string, an object, or missing. Every field here is
//! decoded leniently so one odd value never rejects the whole payload.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Lenient decoding helpers
// ---------------------------------------------------------------------------

/// Decode a field as `T`, treating `null` or a shape mismatch as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Decode an array, dropping elements that don't fit `T`.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// A scalar whose wire type varies between responses (`1`, `"1"`, `"T3"`, `{...}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl Loose {
    /// Display text for this value, or `None` when it carries nothing printable.
    ///
    /// Objects are unwrapped through their `displayValue`, then `value` keys,
    /// which is how ESPN nests scores on some endpoints.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Loose::Int(n) => Some(n.to_string()),
            Loose::Float(f) => format_float(*f),
            Loose::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            Loose::Other(Value::Object(map)) => ["displayValue", "value"]
                .iter()
                .filter_map(|key| map.get(*key))
                .filter_map(|v| serde_json::from_value::<Loose>(v.clone()).ok())
                .find_map(|v| v.as_text()),
            Loose::Other(_) => None,
        }
    }
}

fn format_float(f: f64) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    if f.fract() == 0.0 {
        Some(format!("{}", f as i64))
    } else {
        Some(f.to_string())
    }
}

// ---------------------------------------------------------------------------
// Scoreboard  (site v2 API, golf/pga)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub events: Vec<EspnEvent>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>, // ISO 8601, often without seconds
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<EspnStatus>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub competitions: Vec<EspnCompetition>,
}

impl EspnEvent {
    /// Lifecycle state ("pre" / "in" / "post") from the event-level status.
    pub fn state(&self) -> Option<&str> {
        self.status.as_ref().and_then(EspnStatus::state)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatus {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub status_type: Option<EspnStatusType>,
    #[serde(default, deserialize_with = "lenient")]
    pub period: Option<Loose>,
}

impl EspnStatus {
    pub fn state(&self) -> Option<&str> {
        self.status_type.as_ref().and_then(|t| t.state.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        self.status_type
            .as_ref()
            .and_then(|t| t.description.as_deref().or(t.detail.as_deref()))
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatusType {
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>, // "pre" | "in" | "post"
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>, // "Round 2 - In Progress", "Final"
    #[serde(default, deserialize_with = "lenient")]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCompetition {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<EspnStatus>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub competitors: Vec<EspnCompetitor>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCompetitor {
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<Loose>,
    #[serde(rename = "sortOrder", default, deserialize_with = "lenient")]
    pub sort_order: Option<Loose>,
    #[serde(default, deserialize_with = "lenient")]
    pub athlete: Option<EspnAthlete>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<Loose>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub statistics: Vec<EspnStatistic>,
    #[serde(default, deserialize_with = "lenient")]
    pub thru: Option<Loose>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<EspnCompetitorStatus>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnAthlete {
    #[serde(rename = "displayName", default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(rename = "shortName", default, deserialize_with = "lenient")]
    pub short_name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatistic {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<Loose>,
    #[serde(rename = "displayValue", default, deserialize_with = "lenient")]
    pub display_value: Option<Loose>,
}

impl EspnStatistic {
    /// `displayValue` when printable, else `value`.
    pub fn text(&self) -> Option<String> {
        self.display_value
            .as_ref()
            .and_then(Loose::as_text)
            .or_else(|| self.value.as_ref().and_then(Loose::as_text))
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCompetitorStatus {
    #[serde(default, deserialize_with = "lenient")]
    pub thru: Option<Loose>,
    #[serde(rename = "holesCompleted", default, deserialize_with = "lenient")]
    pub holes_completed: Option<Loose>,
}
