//! The `get_events` tool as seen by an external agent: its declaration and
//! the structured result it returns.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::domain::PublicEvent;
use crate::error::EventAgentError;
use crate::query::{self, EventQuery, QueryOutcome, NO_EVENTS_MESSAGE};
use crate::store::EventStore;

pub const TOOL_NAME: &str = "get_events";
pub const AGENT_NAME: &str = "event_agent";
pub const AGENT_DESCRIPTION: &str =
    "Agent to answer questions about events, including when and where they occur, and other details.";
pub const AGENT_INSTRUCTION: &str = "You are a helpful agent who can answer user questions about events, \
providing details such as name, date, location, and more.";

/// What the tool hands back to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResult {
    Success { events: Vec<PublicEvent> },
    Error { error_message: String },
}

impl ToolResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success { .. })
    }

    /// Error result for a query that could not run
    pub fn failed(err: &EventAgentError) -> Self {
        ToolResult::Error {
            error_message: err.to_string(),
        }
    }
}

impl From<QueryOutcome> for ToolResult {
    fn from(outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Found(events) => ToolResult::Success { events },
            QueryOutcome::NotFound => ToolResult::Error {
                error_message: NO_EVENTS_MESSAGE.to_string(),
            },
        }
    }
}

/// Run a query and fold every outcome, including bad dates, into a [`ToolResult`].
pub fn call_get_events(store: &EventStore, params: &EventQuery) -> ToolResult {
    match query::get_events(store, params) {
        Ok(outcome) => {
            if let QueryOutcome::Found(events) = &outcome {
                info!(matches = events.len(), "get_events succeeded");
            }
            outcome.into()
        }
        Err(e) => {
            warn!("get_events rejected its arguments: {}", e);
            ToolResult::failed(&e)
        }
    }
}

/// Function declaration an agent framework registers for this tool.
pub fn tool_declaration() -> Value {
    json!({
        "agent": {
            "name": AGENT_NAME,
            "description": AGENT_DESCRIPTION,
            "instruction": AGENT_INSTRUCTION,
        },
        "name": TOOL_NAME,
        "description": "Fetch events from the in-memory catalogue based on various filters and return up to 10 matches.",
        "parameters": {
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Text to search for in event names."},
                "start_date": {"type": "string", "description": "Inclusive start date (YYYY-MM-DD) to filter events."},
                "end_date": {"type": "string", "description": "Inclusive end date (YYYY-MM-DD) to filter events."},
                "city": {"type": "string", "description": "City name fragment to filter events."},
                "country": {"type": "string", "description": "Country name fragment to filter events."}
            },
            "required": []
        },
        "returns": "An object with status 'success' and an events list, or status 'error' and an error_message."
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Event;

    fn store() -> EventStore {
        let mut event = Event::named("PyData Conf");
        event.tags = vec!["python".to_string()];
        EventStore::from_events(vec![event, Event::named("Rust Meetup")])
    }

    #[test]
    fn test_success_shape() {
        let result = call_get_events(&store(), &EventQuery::named("py"));
        let value = serde_json::to_value(&result).unwrap();

        assert!(result.is_success());
        assert_eq!(value["status"], "success");
        assert_eq!(value["events"][0]["name"], "PyData Conf");
        assert_eq!(value["events"][0]["tags"], json!(["python"]));
        assert_eq!(value["events"][0]["start"], Value::Null);
    }

    #[test]
    fn test_no_match_shape() {
        let result = call_get_events(&store(), &EventQuery::named("zzz-nonexistent"));

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": "error", "error_message": NO_EVENTS_MESSAGE})
        );
    }

    #[test]
    fn test_bad_date_uses_error_shape_with_its_own_message() {
        let result = call_get_events(&store(), &EventQuery::between("2024-3-1x", "2024-03-10"));

        match result {
            ToolResult::Error { error_message } => {
                assert!(error_message.contains("2024-3-1x"));
                assert!(error_message.contains("YYYY-MM-DD"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_outcome_conversion() {
        let found = ToolResult::from(QueryOutcome::Found(vec![Event::named("A").to_public_view()]));
        assert!(found.is_success());

        assert_eq!(
            ToolResult::from(QueryOutcome::NotFound),
            ToolResult::Error {
                error_message: NO_EVENTS_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_declaration_lists_all_parameters() {
        let declaration = tool_declaration();
        let properties = declaration["parameters"]["properties"].as_object().unwrap();

        assert_eq!(declaration["name"], TOOL_NAME);
        for param in ["query", "start_date", "end_date", "city", "country"] {
            assert!(properties.contains_key(param), "missing {}", param);
        }
    }

    #[test]
    fn test_params_default_to_empty() {
        let params: EventQuery = serde_json::from_value(json!({"city": "Berlin"})).unwrap();

        assert_eq!(params.city, "Berlin");
        assert!(params.query.is_empty() && params.start_date.is_empty());
    }
}
