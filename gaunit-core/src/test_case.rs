//! Test cases
//!
//! A test case ties the expected events of one tracking plan entry to the
//! events captured while running it.

use crate::capture::CaptureSource;
use crate::config::EndpointConfig;
use crate::matcher::{match_events, Checklists, MatchMode};
use crate::parser::actual_events;
use crate::result::CheckResult;
use crate::tracking_plan::TrackingPlan;
use crate::types::{ActualEvent, Event, GaUnitError, Result};

/// One test case: expected events plus the events of its capture
#[derive(Debug, Clone)]
pub struct TestCase {
    id: String,
    expected: Vec<Event>,
    source: Option<CaptureSource>,
    actual: Option<Vec<ActualEvent>>,
}

impl TestCase {
    /// Create a test case from its tracking plan entry
    pub fn new(id: impl Into<String>, plan: &TrackingPlan) -> Result<Self> {
        let id = id.into();
        let expected = plan.expected_events(&id)?.to_vec();
        Ok(Self::with_expected_events(id, expected))
    }

    /// Create a test case from already normalized expected events
    pub fn with_expected_events(id: impl Into<String>, expected: Vec<Event>) -> Self {
        Self {
            id: id.into(),
            expected,
            source: None,
            actual: None,
        }
    }

    /// Extract and decode the events of a capture
    ///
    /// Replaces any previously loaded capture. On error the test case keeps
    /// its previous state.
    pub fn load_capture(&mut self, source: CaptureSource, endpoint: &EndpointConfig) -> Result<()> {
        let requests = source.requests(endpoint)?;
        let events = actual_events(&requests);
        log::info!(
            "Test case '{}': {} tracking requests, {} events",
            self.id,
            requests.len(),
            events.len()
        );

        self.source = Some(source);
        self.actual = Some(events);
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn expected_events(&self) -> &[Event] {
        &self.expected
    }

    /// Decoded events of the loaded capture, if any
    pub fn actual_events(&self) -> Option<&[ActualEvent]> {
        self.actual.as_deref()
    }

    pub fn source(&self) -> Option<&CaptureSource> {
        self.source.as_ref()
    }

    /// Compute the checklists; fails if no capture has been loaded
    pub fn check(&self, mode: MatchMode) -> Result<Checklists> {
        let actual = self.loaded_events()?;
        Ok(match_events(&self.expected, actual, mode))
    }

    /// Check and package the outcome as a `CheckResult`
    pub fn result(&self, mode: MatchMode) -> Result<CheckResult> {
        let actual = self.loaded_events()?;
        let checklists = match_events(&self.expected, actual, mode);
        Ok(CheckResult::new(
            self.id.clone(),
            self.expected.clone(),
            actual.to_vec(),
            checklists,
        ))
    }

    fn loaded_events(&self) -> Result<&[ActualEvent]> {
        self.actual.as_deref().ok_or_else(|| {
            GaUnitError::MissingInputError(format!(
                "no capture loaded for test case '{}'",
                self.id
            ))
        })
    }
}
