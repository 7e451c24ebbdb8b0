//! Turning an accepted judgment object into a total `NormalizedVerdict`.
//!
//! Every lookup here degrades to a default; nothing returns an error.

use serde_json::{Map, Value};
use tracing::debug;

use super::{
    NormalizedVerdict, ScoreCard, DEFAULT_CONCLUSION, DEFAULT_RATIONALE, DEFAULT_SUMMARY,
};
use crate::side::{PerSide, Side};

const WINNER_FIELDS: [&str; 3] = ["winner", "winning_side", "winningSide"];
const KEY_POINT_FIELDS: [&str; 2] = ["key_points", "keyPoints"];

pub fn normalize(candidate: &Map<String, Value>) -> NormalizedVerdict {
    NormalizedVerdict {
        winning_side: winning_side(candidate),
        summary: text_field(candidate, "summary", DEFAULT_SUMMARY),
        rationale: text_field(candidate, "rationale", DEFAULT_RATIONALE),
        conclusion: text_field(candidate, "conclusion", DEFAULT_CONCLUSION),
        scores: scores(candidate.get("scores")),
        key_points: list_field(first_field(candidate, &KEY_POINT_FIELDS)),
        strengths: list_field(candidate.get("strengths")),
        weaknesses: list_field(candidate.get("weaknesses")),
    }
}

fn first_field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| object.get(*name))
}

/// Value stored under any spelling of `side`.
fn side_entry(map: &Map<String, Value>, side: Side) -> Option<&Value> {
    side.aliases().iter().find_map(|label| map.get(*label))
}

fn winning_side(candidate: &Map<String, Value>) -> Side {
    let named = WINNER_FIELDS
        .iter()
        .filter_map(|name| candidate.get(*name))
        .find_map(Value::as_str);
    match named.and_then(Side::from_label) {
        Some(side) => side,
        None => {
            debug!(winner = ?named, "Winner does not name a side, defaulting");
            Side::A
        }
    }
}

fn text_field(candidate: &Map<String, Value>, name: &str, default: &str) -> String {
    candidate
        .get(name)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

fn scores(raw: Option<&Value>) -> PerSide<ScoreCard> {
    let Some(map) = raw.and_then(Value::as_object) else {
        return PerSide::default();
    };
    PerSide::from_fn(|side| match side_entry(map, side).and_then(Value::as_object) {
        Some(metrics) => ScoreCard {
            logic: coerce_metric(metrics.get("logic")),
            persuasion: coerce_metric(metrics.get("persuasion")),
            aggression: coerce_metric(metrics.get("aggression")),
        },
        None => ScoreCard::default(),
    })
}

/// Finite number or `0.0`. Numeric strings count as numbers.
pub fn coerce_metric(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite()).unwrap_or(0.0)
}

fn list_field(raw: Option<&Value>) -> PerSide<Vec<String>> {
    let Some(map) = raw.and_then(Value::as_object) else {
        return PerSide::default();
    };
    PerSide::from_fn(|side| match side_entry(map, side) {
        Some(Value::Array(items)) => items.iter().filter_map(list_entry).collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    })
}

fn list_entry(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
