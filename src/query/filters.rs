//! Independent predicates over a list of events. Each takes the current
//! candidates and returns the ones that match, preserving order.

use chrono::NaiveDate;

use crate::domain::Event;
use crate::error::{EventAgentError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Case-insensitive substring match on the event name.
pub fn filter_by_name<'a>(query: &str, events: &[&'a Event]) -> Vec<&'a Event> {
    filter_text(query, events, |event| Some(event.name.as_str()))
}

pub fn filter_by_city<'a>(city: &str, events: &[&'a Event]) -> Vec<&'a Event> {
    filter_text(city, events, |event| event.city.as_deref())
}

pub fn filter_by_country<'a>(country: &str, events: &[&'a Event]) -> Vec<&'a Event> {
    filter_text(country, events, |event| event.country.as_deref())
}

fn filter_text<'a, F>(needle: &str, events: &[&'a Event], field: F) -> Vec<&'a Event>
where
    F: Fn(&Event) -> Option<&str>,
{
    let needle = needle.trim().to_lowercase();
    events
        .iter()
        .copied()
        .filter(|event| field(event).unwrap_or("").to_lowercase().contains(&needle))
        .collect()
}

/// Keep events whose dates overlap the inclusive `start_date..=end_date` window.
///
/// An event with only one timestamp is treated as a single-day event on that
/// date. Events without any timestamp never match. Both bounds must be
/// `YYYY-MM-DD`.
pub fn filter_by_date_range<'a>(
    start_date: &str,
    end_date: &str,
    events: &[&'a Event],
) -> Result<Vec<&'a Event>> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;

    Ok(events
        .iter()
        .copied()
        .filter(|event| match event_span(event) {
            Some((ev_start, ev_end)) => ev_start <= end && ev_end >= start,
            None => false,
        })
        .collect())
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| EventAgentError::InvalidDate {
        input: input.to_string(),
        source,
    })
}

fn event_span(event: &Event) -> Option<(NaiveDate, NaiveDate)> {
    let start = event.start_time.or(event.end_time)?.date_naive();
    let end = event.end_time.or(event.start_time)?.date_naive();
    Some((start, end))
}
