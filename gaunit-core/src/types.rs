//! Core types for the tracking checker library
//!
//! This module defines the event records produced from captures and read from
//! tracking plans, plus the library-wide error type. Events keep their
//! parameters in insertion order so reports list them the way they were sent
//! or written.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, GaUnitError>;

/// Errors that can occur while loading plans, extracting captures or checking
#[derive(Debug, thiserror::Error)]
pub enum GaUnitError {
    /// Malformed tracking plan or capture
    #[error("Invalid format: {0}")]
    FormatError(String),

    /// Unknown test case id
    #[error("Test case not found in tracking plan: {0}")]
    LookupError(String),

    /// Both or neither of two mutually exclusive inputs were supplied
    #[error("Conflicting inputs: {0}")]
    InputConflictError(String),

    /// A check was attempted before its inputs were loaded
    #[error("Missing input: {0}")]
    MissingInputError(String),

    /// A value had the wrong shape where a specific structure was required
    #[error("Unexpected input type: {0}")]
    TypeConflictError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One analytics hit: an ordered mapping of parameter name to value
///
/// Keys are unique. Inserting an existing key replaces its value in place,
/// so the original position of the key is kept. Equality ignores order:
/// two events are equal when they hold the same key/value pairs.
#[derive(Debug, Clone, Default)]
pub struct Event {
    params: Vec<(String, String)>,
}

impl Event {
    /// Create an empty event
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an event from key/value pairs; later duplicates replace earlier ones
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut event = Self::new();
        for (key, value) in pairs {
            event.insert(key, value);
        }
        event
    }

    /// Insert or replace a parameter, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.params.push((key, value));
                None
            }
        }
    }

    /// Insert a parameter only if the key is not present yet
    ///
    /// Returns true if the parameter was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.params.push((key, value.into()));
        true
    }

    /// Overlay every parameter of `other` onto this event (`other` wins)
    pub fn merge(&mut self, other: &Event) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    /// Get the value of a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Subset containment: true if every parameter of `expected` is present
    /// in this event with the same value. Extra parameters are ignored.
    pub fn contains(&self, expected: &Event) -> bool {
        expected
            .iter()
            .all(|(key, value)| self.get(key) == Some(value))
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.contains(other)
    }
}

impl Eq for Event {}

impl AsRef<Event> for Event {
    fn as_ref(&self) -> &Event {
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Event
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// An event decoded from a captured request, with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct ActualEvent {
    /// Decoded hit parameters (raw, not percent-decoded)
    pub params: Event,
    /// URL of the request this event came from
    pub url: String,
    /// Time the request was sent, when the capture records it
    pub timestamp: Option<Timestamp>,
}

impl ActualEvent {
    pub fn new(params: Event, url: impl Into<String>) -> Self {
        Self {
            params,
            url: url.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Option<Timestamp>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl AsRef<Event> for ActualEvent {
    fn as_ref(&self) -> &Event {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut event = Event::from_pairs([("v", "1"), ("t", "pageview")]);
        assert_eq!(event.insert("v", "2"), Some("1".to_string()));
        let keys: Vec<&str> = event.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["v", "t"]);
        assert_eq!(event.get("v"), Some("2"));
    }

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut event = Event::new();
        assert!(event.insert_if_absent("dp", "A"));
        assert!(!event.insert_if_absent("dp", "B"));
        assert_eq!(event.get("dp"), Some("A"));
    }

    #[test]
    fn test_contains_is_subset() {
        let actual = Event::from_pairs([("v", "1"), ("t", "pageview"), ("dp", "home")]);
        let expected = Event::from_pairs([("dp", "home")]);
        assert!(actual.contains(&expected));
        assert!(!expected.contains(&actual));
        assert!(actual.contains(&Event::new()));

        let wrong_value = Event::from_pairs([("dp", "other")]);
        assert!(!actual.contains(&wrong_value));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = Event::from_pairs([("a", "1"), ("b", "2")]);
        let b = Event::from_pairs([("b", "2"), ("a", "1")]);
        assert_eq!(a, b);
        assert_ne!(a, Event::from_pairs([("a", "1")]));
    }

    #[test]
    fn test_serialize_keeps_order() {
        let event = Event::from_pairs([("z", "1"), ("a", "2")]);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn test_display() {
        let event = Event::from_pairs([("t", "pageview"), ("dp", "home")]);
        assert_eq!(event.to_string(), r#"{t: "pageview", dp: "home"}"#);
    }
}
