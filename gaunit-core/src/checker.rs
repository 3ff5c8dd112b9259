//! Main checker API
//!
//! This module provides the entry points of the library. The `Checker` struct
//! carries the endpoint configuration and matching mode explicitly; the free
//! functions use the defaults (standard collection host, ordered matching).

use crate::capture::CaptureSource;
use crate::config::EndpointConfig;
use crate::matcher::MatchMode;
use crate::result::CheckResult;
use crate::test_case::TestCase;
use crate::tracking_plan::TrackingPlan;
use crate::types::Result;
use serde_json::Value;
use std::path::Path;

/// Checks captures against a tracking plan
#[derive(Debug, Clone, Default)]
pub struct Checker {
    endpoint: EndpointConfig,
    mode: MatchMode,
}

impl Checker {
    /// Create a checker for the default endpoint with ordered matching
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the tracking endpoint configuration
    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Builder method: set the matching mode
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Check one test case against any capture source
    ///
    /// # Example
    /// ```no_run
    /// use gaunit_core::{CaptureSource, Checker, TrackingPlan};
    /// use std::path::{Path, PathBuf};
    ///
    /// let plan = TrackingPlan::load(Path::new("tracking_plan.json")).unwrap();
    /// let source = CaptureSource::File(PathBuf::from("session.har"));
    /// let result = Checker::new().check("home", &plan, source).unwrap();
    /// assert!(result.was_successful());
    /// ```
    pub fn check(
        &self,
        test_case_id: &str,
        plan: &TrackingPlan,
        source: CaptureSource,
    ) -> Result<CheckResult> {
        log::info!("Checking test case '{}' ({:?})", test_case_id, self.mode);

        let mut test_case = TestCase::new(test_case_id, plan)?;
        test_case.load_capture(source, &self.endpoint)?;
        let result = test_case.result(self.mode)?;

        log::info!(
            "Test case '{}': {}",
            test_case_id,
            if result.was_successful() { "passed" } else { "failed" }
        );
        Ok(result)
    }

    /// Check an in-memory capture (HAR object or performance log array)
    pub fn check_capture(
        &self,
        test_case_id: &str,
        plan: &TrackingPlan,
        capture: Value,
    ) -> Result<CheckResult> {
        self.check(test_case_id, plan, CaptureSource::from_value(capture)?)
    }

    /// Check a capture file (HAR, performance log or URL log)
    pub fn check_capture_file(
        &self,
        test_case_id: &str,
        plan: &TrackingPlan,
        path: &Path,
    ) -> Result<CheckResult> {
        self.check(test_case_id, plan, CaptureSource::File(path.to_path_buf()))
    }

    /// Check browser performance log entries
    pub fn check_perf_log(
        &self,
        test_case_id: &str,
        plan: &TrackingPlan,
        entries: Vec<Value>,
    ) -> Result<CheckResult> {
        self.check(test_case_id, plan, CaptureSource::PerfLog(entries))
    }

    /// Check a plain URL log (one request URL per line)
    pub fn check_url_log(
        &self,
        test_case_id: &str,
        plan: &TrackingPlan,
        text: impl Into<String>,
    ) -> Result<CheckResult> {
        self.check(test_case_id, plan, CaptureSource::UrlLog(text.into()))
    }
}

/// Check an in-memory capture with the default checker
pub fn check_capture(
    test_case_id: &str,
    plan: &TrackingPlan,
    capture: Value,
) -> Result<CheckResult> {
    Checker::new().check_capture(test_case_id, plan, capture)
}

/// Check a capture file with the default checker
pub fn check_capture_file(
    test_case_id: &str,
    plan: &TrackingPlan,
    path: &Path,
) -> Result<CheckResult> {
    Checker::new().check_capture_file(test_case_id, plan, path)
}

/// Check performance log entries with the default checker
pub fn check_perf_log(
    test_case_id: &str,
    plan: &TrackingPlan,
    entries: Vec<Value>,
) -> Result<CheckResult> {
    Checker::new().check_perf_log(test_case_id, plan, entries)
}

/// Check a URL log with the default checker
pub fn check_url_log(
    test_case_id: &str,
    plan: &TrackingPlan,
    text: impl Into<String>,
) -> Result<CheckResult> {
    Checker::new().check_url_log(test_case_id, plan, text)
}
