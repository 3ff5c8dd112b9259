//! Tracking plan
//!
//! Holds the expected events of every test case. Plans are read from JSON
//! files shaped like:
//!
//! ```json
//! {"test_cases": {"home": {"events": [{"t": "pageview", "dp": "%2Fhome"}]}}}
//! ```
//!
//! Values are normalized when they enter the plan: percent-decoded, numbers
//! turned into their decimal text, and empty values dropped.

use crate::query::{decode_value, encode_value};
use crate::types::{Event, GaUnitError, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Expected events per test case id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingPlan {
    test_cases: BTreeMap<String, Vec<Event>>,
}

impl TrackingPlan {
    /// Create an empty tracking plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plan holding a single test case
    pub fn from_events(test_case_id: impl Into<String>, events: Vec<Event>) -> Self {
        let mut plan = Self::new();
        plan.upsert_test_case(test_case_id, events);
        plan
    }

    /// Load a tracking plan JSON file
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading tracking plan: {:?}", path);

        let content = std::fs::read_to_string(path)?;
        let plan = Self::from_json_str(&content).map_err(|e| match e {
            GaUnitError::FormatError(msg) => {
                GaUnitError::FormatError(format!("tracking plan {:?}: {}", path, msg))
            }
            other => other,
        })?;

        log::info!("Tracking plan loaded: {} test cases", plan.len());
        Ok(plan)
    }

    /// Parse a tracking plan from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| GaUnitError::FormatError(format!("invalid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Build a tracking plan from a parsed JSON document
    pub fn from_value(value: &Value) -> Result<Self> {
        let test_cases = value
            .get("test_cases")
            .ok_or_else(|| format_error("missing 'test_cases'"))?
            .as_object()
            .ok_or_else(|| format_error("'test_cases' must be an object"))?;

        let mut plan = Self::new();
        for (id, case) in test_cases {
            let events = case
                .get("events")
                .ok_or_else(|| format_error(format!("test case '{}' has no 'events'", id)))?
                .as_array()
                .ok_or_else(|| {
                    format_error(format!("'events' of test case '{}' must be an array", id))
                })?;

            let events = events
                .iter()
                .enumerate()
                .map(|(index, event)| event_from_json(id, index, event))
                .collect::<Result<Vec<_>>>()?;

            plan.upsert_test_case(id.clone(), events);
        }

        Ok(plan)
    }

    /// Expected events of a test case
    pub fn expected_events(&self, test_case_id: &str) -> Result<&[Event]> {
        self.test_cases
            .get(test_case_id)
            .map(Vec::as_slice)
            .ok_or_else(|| GaUnitError::LookupError(test_case_id.to_string()))
    }

    /// Insert or fully replace the events of a test case
    ///
    /// Values are percent-decoded and empty values are dropped.
    pub fn upsert_test_case(&mut self, test_case_id: impl Into<String>, events: Vec<Event>) {
        let test_case_id = test_case_id.into();
        let events: Vec<Event> = events.iter().map(normalize_event).collect();
        log::debug!("Test case '{}': {} expected events", test_case_id, events.len());
        self.test_cases.insert(test_case_id, events);
    }

    pub fn contains_test_case(&self, test_case_id: &str) -> bool {
        self.test_cases.contains_key(test_case_id)
    }

    /// Ids of all test cases, sorted
    pub fn test_case_ids(&self) -> impl Iterator<Item = &str> {
        self.test_cases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    /// JSON document in the tracking plan file format
    ///
    /// `%` is escaped so that loading the document gives back the same values.
    pub fn to_json_value(&self) -> Value {
        let test_cases: Map<String, Value> = self
            .test_cases
            .iter()
            .map(|(id, events)| {
                let events: Vec<Value> = events
                    .iter()
                    .map(|event| {
                        Value::Object(
                            event
                                .iter()
                                .map(|(k, v)| (k.to_string(), Value::String(encode_value(v))))
                                .collect(),
                        )
                    })
                    .collect();
                (id.clone(), json!({ "events": events }))
            })
            .collect();

        json!({ "test_cases": test_cases })
    }

    /// Pretty-printed JSON text in the tracking plan file format
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_json_value())
            .map_err(|e| GaUnitError::FormatError(format!("cannot serialize tracking plan: {}", e)))
    }

    /// Write the plan to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        log::info!("Saving tracking plan: {:?}", path);
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Percent-decode values and drop empty parameters
fn normalize_event(event: &Event) -> Event {
    event
        .iter()
        .map(|(key, value)| (key, decode_value(value)))
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

/// Read one event object; values must be strings or numbers
fn event_from_json(test_case_id: &str, index: usize, value: &Value) -> Result<Event> {
    let object = value.as_object().ok_or_else(|| {
        format_error(format!(
            "event #{} of test case '{}' must be an object",
            index, test_case_id
        ))
    })?;

    let mut event = Event::new();
    for (key, value) in object {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(format_error(format!(
                    "parameter '{}' of event #{} in test case '{}' must be a string or a number",
                    key, index, test_case_id
                )))
            }
        };
        event.insert(key.clone(), text);
    }
    Ok(event)
}

fn format_error(msg: impl Into<String>) -> GaUnitError {
    GaUnitError::FormatError(msg.into())
}
