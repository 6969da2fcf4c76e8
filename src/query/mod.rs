//! Query Engine: composes the filters over a store snapshot.

pub mod filters;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Event, PublicEvent};
use crate::error::Result;
use crate::store::EventStore;

pub use filters::{
    filter_by_city, filter_by_country, filter_by_date_range, filter_by_name, parse_date,
};

/// Maximum number of events returned by one query
pub const MAX_RESULTS: usize = 10;

pub const NO_EVENTS_MESSAGE: &str = "No events found for the given criteria.";

/// Filter criteria. Empty strings mean "not filtered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventQuery {
    pub query: String,
    pub start_date: String,
    pub end_date: String,
    pub city: String,
    pub country: String,
}

impl EventQuery {
    pub fn named(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn between(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            ..Self::default()
        }
    }
}

/// Result of a query that ran: either some matches or none.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Found(Vec<PublicEvent>),
    NotFound,
}

/// Run the composed query against the current contents of `store`.
///
/// Filters apply in a fixed order (name, date range, city, country). The date
/// range only applies when both bounds are given. Matches are capped at
/// [`MAX_RESULTS`] in collection order.
pub fn get_events(store: &EventStore, params: &EventQuery) -> Result<QueryOutcome> {
    let snapshot = store.snapshot();
    let mut matched: Vec<&Event> = snapshot.iter().collect();

    if !params.query.is_empty() {
        matched = filter_by_name(&params.query, &matched);
        debug!(query = %params.query, remaining = matched.len(), "Applied name filter");
    }

    match (params.start_date.is_empty(), params.end_date.is_empty()) {
        (false, false) => {
            matched = filter_by_date_range(&params.start_date, &params.end_date, &matched)?;
            debug!(
                start_date = %params.start_date,
                end_date = %params.end_date,
                remaining = matched.len(),
                "Applied date range filter"
            );
        }
        (true, true) => {}
        _ => warn!(
            start_date = %params.start_date,
            end_date = %params.end_date,
            "Ignoring date filter: both start_date and end_date are required"
        ),
    }

    if !params.city.is_empty() {
        matched = filter_by_city(&params.city, &matched);
        debug!(city = %params.city, remaining = matched.len(), "Applied city filter");
    }

    if !params.country.is_empty() {
        matched = filter_by_country(&params.country, &matched);
        debug!(country = %params.country, remaining = matched.len(), "Applied country filter");
    }

    if matched.is_empty() {
        return Ok(QueryOutcome::NotFound);
    }

    Ok(QueryOutcome::Found(
        matched
            .into_iter()
            .take(MAX_RESULTS)
            .map(Event::to_public_view)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventAgentError;
    use chrono::{TimeZone, Utc};

    fn event(name: &str, city: &str, country: &str, day: Option<u32>) -> Event {
        let mut event = Event::named(name);
        event.city = Some(city.to_string());
        event.country = Some(country.to_string());
        if let Some(day) = day {
            event.start_time = Some(Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap());
            event.end_time = Some(Utc.with_ymd_and_hms(2024, 3, day + 1, 17, 0, 0).unwrap());
        }
        event
    }

    fn sample_store() -> EventStore {
        EventStore::from_events(vec![
            event("PyData Berlin", "Berlin", "Germany", Some(2)),
            event("Rust Meetup", "Berlin", "Germany", Some(20)),
            event("PyCon US", "Pittsburgh", "USA", Some(5)),
            event("JSConf", "Lisbon", "Portugal", None),
        ])
    }

    fn found_names(outcome: QueryOutcome) -> Vec<String> {
        match outcome {
            QueryOutcome::Found(events) => events.into_iter().map(|e| e.name).collect(),
            QueryOutcome::NotFound => panic!("expected matches"),
        }
    }

    #[test]
    fn test_no_criteria_returns_collection_order() {
        let outcome = get_events(&sample_store(), &EventQuery::default()).unwrap();

        assert_eq!(
            found_names(outcome),
            vec!["PyData Berlin", "Rust Meetup", "PyCon US", "JSConf"]
        );
    }

    #[test]
    fn test_results_are_capped() {
        let events = (0..25).map(|i| Event::named(format!("Event {}", i))).collect();
        let store = EventStore::from_events(events);

        let names = found_names(get_events(&store, &EventQuery::default()).unwrap());

        assert_eq!(names.len(), MAX_RESULTS);
        assert_eq!(names.first().map(String::as_str), Some("Event 0"));
        assert_eq!(names.last().map(String::as_str), Some("Event 9"));
    }

    #[test]
    fn test_filters_compose() {
        let params = EventQuery {
            query: "py".to_string(),
            start_date: "2024-03-01".to_string(),
            end_date: "2024-03-04".to_string(),
            country: "germany".to_string(),
            ..EventQuery::default()
        };

        let outcome = get_events(&sample_store(), &params).unwrap();

        assert_eq!(found_names(outcome), vec!["PyData Berlin"]);
    }

    #[test]
    fn test_no_match_is_not_found() {
        let outcome = get_events(&sample_store(), &EventQuery::named("zzz-nonexistent")).unwrap();
        assert_eq!(outcome, QueryOutcome::NotFound);

        let empty = EventStore::from_events(Vec::new());
        assert_eq!(
            get_events(&empty, &EventQuery::default()).unwrap(),
            QueryOutcome::NotFound
        );
    }

    #[test]
    fn test_single_date_bound_is_ignored() {
        let params = EventQuery {
            start_date: "2030-01-01".to_string(),
            ..EventQuery::default()
        };

        let outcome = get_events(&sample_store(), &params).unwrap();

        assert_eq!(found_names(outcome).len(), 4);
    }

    #[test]
    fn test_bad_date_propagates() {
        let err = get_events(&sample_store(), &EventQuery::between("tomorrow", "2024-03-10"))
            .unwrap_err();

        assert!(matches!(err, EventAgentError::InvalidDate { .. }));
    }
}
