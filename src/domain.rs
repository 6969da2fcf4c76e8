use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical event, built once by the normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub hyperlink: Option<String>,
    pub tags: Vec<String>,
    pub misc: Option<String>,
    /// Call-for-papers metadata, kept as-is from the source.
    pub cfp: Map<String, Value>,
    pub closed_captions: bool,
    pub scholarship: bool,
    pub status: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Event {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            city: None,
            country: None,
            location: None,
            hyperlink: None,
            tags: Vec::new(),
            misc: None,
            cfp: Map::new(),
            closed_captions: false,
            scholarship: false,
            status: None,
            start_time: None,
            end_time: None,
        }
    }

    pub fn has_dates(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }

    pub fn to_public_view(&self) -> PublicEvent {
        PublicEvent {
            name: self.name.clone(),
            hyperlink: self.hyperlink.clone(),
            location: self.location.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            tags: self.tags.clone(),
            status: self.status.clone(),
            closed_captions: self.closed_captions,
            scholarship: self.scholarship,
            start: self.start_time.map(iso8601),
            end: self.end_time.map(iso8601),
        }
    }
}

/// The fields of an [`Event`] handed to external callers. `cfp` and `misc` stay internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicEvent {
    pub name: String,
    pub hyperlink: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    #[serde(rename = "closedCaptions")]
    pub closed_captions: bool,
    pub scholarship: bool,
    pub start: Option<String>,
    pub end: Option<String>,
}

// Whole seconds, or microseconds when there is a fractional part: 1970-01-01T00:00:01.500000+00:00
fn iso8601(ts: DateTime<Utc>) -> String {
    let format = if ts.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    ts.to_rfc3339_opts(format, false)
}
