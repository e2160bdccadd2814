//! Turns a raw team-stats payload into a canonical [`TeamProfile`].
//!
//! Feeds disagree on key names and on how they ship recent results, so every
//! lookup tries a short list of known aliases and every missing value falls
//! back to [`NEUTRAL_STAT`]. The only hard failure is a payload that is not a
//! JSON object at all.

use serde_json::{Map, Value};

use super::error::PredictionError;
use crate::models::{GameStatus, RawStatsPayload, TeamProfile, NEUTRAL_STAT};

/// Number of most recent completed games averaged into the profile.
pub const RECENT_WINDOW: usize = 5;

const OFFENSIVE_KEYS: &[&str] = &["offensive_rating", "OffRtg", "off_rating"];
const DEFENSIVE_KEYS: &[&str] = &["defensive_rating", "DefRtg", "def_rating"];
const PACE_KEYS: &[&str] = &["pace", "Pace"];
const HISTORY_KEYS: &[&str] = &["last_5_games", "recent_games", "games"];
const AGAINST_HISTORY_KEYS: &[&str] = &["last_5_games_against", "recent_points_against"];
const POINTS_FOR_KEYS: &[&str] = &["points_for", "points", "pts"];
const POINTS_AGAINST_KEYS: &[&str] = &["points_against", "opponent_points", "opp_pts"];

/// Normalize a raw payload. Missing or malformed sub-fields are defaulted.
pub fn normalize(raw: &RawStatsPayload) -> Result<TeamProfile, PredictionError> {
    let obj = raw.as_object().ok_or_else(|| {
        PredictionError::InsufficientData(format!(
            "stats payload is not an object (got {})",
            json_kind(raw)
        ))
    })?;

    let window = recent_window(obj);

    let points_for: Vec<f64> = window.iter().map(|(pf, _)| *pf).collect();
    let mut points_against: Vec<f64> = window.iter().filter_map(|(_, pa)| *pa).collect();
    if points_against.is_empty() {
        points_against = first_array(obj, AGAINST_HISTORY_KEYS)
            .map(|arr| {
                let vals: Vec<f64> = arr.iter().filter_map(number).collect();
                tail(vals, RECENT_WINDOW)
            })
            .unwrap_or_default();
    }

    Ok(TeamProfile {
        offensive_rating: lookup(obj, OFFENSIVE_KEYS).unwrap_or(NEUTRAL_STAT),
        defensive_rating: lookup(obj, DEFENSIVE_KEYS).unwrap_or(NEUTRAL_STAT),
        pace: lookup(obj, PACE_KEYS).unwrap_or(NEUTRAL_STAT),
        recent_avg_points_for: mean(&points_for).unwrap_or(NEUTRAL_STAT),
        recent_avg_points_against: mean(&points_against).unwrap_or(NEUTRAL_STAT),
    })
}

/// The last `RECENT_WINDOW` completed games as (points for, points against).
/// Feeds list games oldest first.
fn recent_window(obj: &Map<String, Value>) -> Vec<(f64, Option<f64>)> {
    let entries: Vec<(f64, Option<f64>)> = first_array(obj, HISTORY_KEYS)
        .map(|arr| arr.iter().filter_map(history_entry).collect())
        .unwrap_or_default();
    tail(entries, RECENT_WINDOW)
}

fn history_entry(entry: &Value) -> Option<(f64, Option<f64>)> {
    if let Some(points) = number(entry) {
        return Some((points, None));
    }
    let game = entry.as_object()?;
    if game.get("completed").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    if let Some(status) = game.get("status").and_then(Value::as_str) {
        if GameStatus::from_feed(status) != GameStatus::Finished {
            return None;
        }
    }
    let points_for = lookup(game, POINTS_FOR_KEYS)?;
    Some((points_for, lookup(game, POINTS_AGAINST_KEYS)))
}

fn first_array<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_array))
}

fn lookup(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| obj.get(*k).and_then(number))
}

/// Numbers arrive either as JSON numbers or as numeric strings.
fn number(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|x| x.is_finite())
}

fn tail<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(n);
    items.drain(..skip);
    items
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
