use crate::espn::{EspnCompetitor, Loose};

/// Position assigned to competitors whose rank can't be read.
pub const UNRANKED: i64 = 999;

/// Parse a rank value, returning [`UNRANKED`] for anything non-numeric.
pub fn parse_position(value: Option<&Loose>) -> i64 {
    match value {
        Some(Loose::Int(n)) => *n,
        Some(Loose::Float(f)) if f.is_finite() => f.trunc() as i64,
        Some(Loose::Text(s)) => s.trim().parse::<i64>().unwrap_or(UNRANKED),
        _ => UNRANKED,
    }
}

/// The rank field to trust: `order` when present, else legacy `sortOrder`.
pub fn rank_field(competitor: &EspnCompetitor) -> Option<&Loose> {
    competitor.order.as_ref().or(competitor.sort_order.as_ref())
}

pub fn position(competitor: &EspnCompetitor) -> i64 {
    parse_position(rank_field(competitor))
}

/// Competitors in rank order. The sort is stable, so ties keep feed order.
pub fn rank_competitors(competitors: &[EspnCompetitor]) -> Vec<&EspnCompetitor> {
    let mut ranked: Vec<&EspnCompetitor> = competitors.iter().collect();
    ranked.sort_by_key(|c| position(c));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn competitors(raw: serde_json::Value) -> Vec<EspnCompetitor> {
        serde_json::from_value(raw).unwrap()
    }

    fn names(ranked: &[&EspnCompetitor]) -> Vec<String> {
        ranked
            .iter()
            .map(|c| c.athlete.as_ref().and_then(|a| a.display_name.clone()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn parse_position_sentinel_for_junk() {
        assert_eq!(parse_position(None), UNRANKED);
        assert_eq!(parse_position(Some(&Loose::Text("T5".into()))), UNRANKED);
        assert_eq!(parse_position(Some(&Loose::Text("".into()))), UNRANKED);
        assert_eq!(parse_position(Some(&Loose::Other(json!({})))), UNRANKED);
        assert_eq!(parse_position(Some(&Loose::Float(f64::NAN))), UNRANKED);
    }

    #[test]
    fn parse_position_accepts_numbers_and_numeric_text() {
        assert_eq!(parse_position(Some(&Loose::Int(3))), 3);
        assert_eq!(parse_position(Some(&Loose::Float(4.0))), 4);
        assert_eq!(parse_position(Some(&Loose::Text(" 12 ".into()))), 12);
    }

    #[test]
    fn unparsable_ranks_sort_last() {
        let list = competitors(json!([
            { "order": "T2", "athlete": { "displayName": "Junk" } },
            { "order": 2, "athlete": { "displayName": "Second" } },
            { "athlete": { "displayName": "Missing" } },
            { "order": 1, "athlete": { "displayName": "First" } }
        ]));
        let ranked = rank_competitors(&list);
        assert_eq!(names(&ranked), vec!["First", "Second", "Junk", "Missing"]);
    }

    #[test]
    fn ties_keep_feed_order() {
        let list = competitors(json!([
            { "order": 3, "athlete": { "displayName": "C" } },
            { "order": 1, "athlete": { "displayName": "A1" } },
            { "order": 1, "athlete": { "displayName": "A2" } },
            { "order": 3, "athlete": { "displayName": "D" } },
            { "order": 1, "athlete": { "displayName": "A3" } }
        ]));
        let ranked = rank_competitors(&list);
        assert_eq!(names(&ranked), vec!["A1", "A2", "A3", "C", "D"]);
    }

    #[test]
    fn order_wins_over_sort_order() {
        let list = competitors(json!([
            { "order": 2, "sortOrder": 1, "athlete": { "displayName": "X" } },
            { "order": 1, "sortOrder": 2, "athlete": { "displayName": "Y" } },
            { "sortOrder": 3, "athlete": { "displayName": "Legacy" } }
        ]));
        let ranked = rank_competitors(&list);
        assert_eq!(names(&ranked), vec!["Y", "X", "Legacy"]);
    }
}
