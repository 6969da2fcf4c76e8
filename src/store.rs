use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};

use crate::domain::Event;
use crate::error::{EventAgentError, Result};
use crate::normalize::normalize_value;

/// Read-only view of the collection at one point in time
pub type Snapshot = Arc<Vec<Event>>;

/// In-memory event collection loaded from the events file.
///
/// The collection is never edited in place. [`EventStore::reload`] builds a
/// complete new vector and swaps the shared pointer, so a [`Snapshot`] taken
/// before the reload keeps seeing the old, consistent data.
pub struct EventStore {
    source: Option<PathBuf>,
    events: RwLock<Snapshot>,
}

impl EventStore {
    /// Load the store from `path`. A failed load yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            source: Some(path.into()),
            events: RwLock::new(Arc::new(Vec::new())),
        };
        store.reload();
        store
    }

    /// Store over an already normalized collection, without a backing file.
    pub fn from_events(events: Vec<Event>) -> Self {
        Self {
            source: None,
            events: RwLock::new(Arc::new(events)),
        }
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn snapshot(&self) -> Snapshot {
        match self.events.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-read the backing file and replace the collection. Returns the new size.
    ///
    /// Load failures are logged and leave the store empty.
    pub fn reload(&self) -> usize {
        let events = match &self.source {
            Some(path) => match load_events(path) {
                Ok(events) => {
                    info!("Loaded {} events from {}", events.len(), path.display());
                    events
                }
                Err(e) => {
                    error!("Failed to load events data: {}", e);
                    Vec::new()
                }
            },
            None => return self.len(),
        };

        let count = events.len();
        self.replace(events);
        count
    }

    fn replace(&self, events: Vec<Event>) {
        let events = Arc::new(events);
        match self.events.write() {
            Ok(mut guard) => *guard = events,
            Err(poisoned) => *poisoned.into_inner() = events,
        }
    }
}

/// Read and normalize every record of a JSON array file.
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    if !path.exists() {
        return Err(EventAgentError::DataFileMissing {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content)?;
    let records = match parsed {
        Value::Array(records) => records,
        other => {
            return Err(EventAgentError::InvalidRoot {
                found: json_type_name(&other),
            })
        }
    };

    let mut events = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match normalize_value(record) {
            Some(event) => events.push(event),
            None => warn!("Skipping record {}: not a JSON object", index),
        }
    }
    Ok(events)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
