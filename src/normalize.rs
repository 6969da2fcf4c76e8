//! Event Normalizer
//!
//! Turns one loosely-shaped source record into a canonical [`Event`]. Every
//! field is read defensively: wrong types and missing keys fall back to
//! defaults instead of failing the record.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::Event;

/// Raw event record as it appears in the source file
pub type RawEvent = Map<String, Value>;

/// Normalize a raw record into an [`Event`]. Never fails.
pub fn normalize(raw: &RawEvent) -> Event {
    let (start_time, end_time) = match raw.get("date") {
        Some(date) => date_pair(date).unwrap_or((None, None)),
        None => (None, None),
    };

    Event {
        name: optional_text(raw, "name").unwrap_or_default(),
        city: optional_text(raw, "city"),
        country: optional_text(raw, "country"),
        location: optional_text(raw, "location"),
        hyperlink: optional_text(raw, "hyperlink"),
        tags: raw.get("tags").map(normalize_tags).unwrap_or_default(),
        misc: optional_text(raw, "misc"),
        cfp: match raw.get("cfp") {
            Some(Value::Object(cfp)) => cfp.clone(),
            _ => Map::new(),
        },
        closed_captions: raw.get("closedCaptions").map(is_truthy).unwrap_or(false),
        scholarship: raw.get("scholarship").map(is_truthy).unwrap_or(false),
        status: optional_text(raw, "status"),
        start_time,
        end_time,
    }
}

/// Normalize an arbitrary JSON value. Only objects describe events.
pub fn normalize_value(raw: &Value) -> Option<Event> {
    raw.as_object().map(normalize)
}

/// Flatten the `tags` field into plain strings, keeping source order.
pub fn normalize_tags(value: &Value) -> Vec<String> {
    if !is_truthy(value) {
        return Vec::new();
    }

    let items = match value {
        Value::Array(items) => items,
        other => return vec![stringify(other)],
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(tag) => Some(tag.clone()),
            Value::Object(pair) => key_value_tag(pair),
            other => Some(stringify(other)),
        })
        .collect()
}

// {"key": "track", "value": "AI"} -> "track:AI"; a lone side is kept on its own
fn key_value_tag(pair: &Map<String, Value>) -> Option<String> {
    let side = |field: &str| {
        pair.get(field)
            .filter(|v| !v.is_null())
            .map(|v| stringify(v).trim().to_string())
            .unwrap_or_default()
    };
    let key = side("key");
    let value = side("value");

    match (key.is_empty(), value.is_empty()) {
        (false, false) => Some(format!("{}:{}", key, value)),
        (false, true) => Some(key),
        (true, false) => Some(value),
        (true, true) => None,
    }
}

/// Both timestamps or neither: a `[start_ms, end_ms]` pair where each side converts.
fn date_pair(value: &Value) -> Option<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    match value.as_array().map(Vec::as_slice) {
        Some([start, end]) => {
            let start = epoch_millis_to_utc(start)?;
            let end = epoch_millis_to_utc(end)?;
            Some((Some(start), Some(end)))
        }
        _ => None,
    }
}

/// Convert a millisecond epoch value to UTC. Integral strings and floats are accepted.
pub fn epoch_millis_to_utc(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value {
        Value::Number(n) => match n.as_i64() {
            Some(ms) => ms,
            None => {
                let ms = n.as_f64()?.trunc();
                if !ms.is_finite() || ms < i64::MIN as f64 || ms > i64::MAX as f64 {
                    return None;
                }
                ms as i64
            }
        },
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Bool(b) => i64::from(*b),
        _ => return None,
    };
    DateTime::from_timestamp_millis(millis)
}

/// Truthiness of a loosely-typed flag: empty, zero and null are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn optional_text(raw: &RawEvent, key: &str) -> Option<String> {
    match raw.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(stringify(value)),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
