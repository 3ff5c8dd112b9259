//! GAUnit Core Library
//!
//! A stateless, reusable library for checking analytics tracking captured
//! during a browser session against an expected tracking plan.
//!
//! # Architecture
//!
//! The library turns a network capture into an ordered list of analytics
//! events and compares it with the expected events of a test case:
//! - Decodes query strings and batched POST bodies into events
//! - Extracts tracking requests from HAR captures, browser performance logs
//!   and plain URL logs
//! - Loads and normalizes tracking plans
//! - Matches expected and actual events (ordered or unordered)
//!
//! The library does NOT:
//! - Drive a browser or capture network traffic
//! - Install a logger (it only emits `log` records)
//! - Validate the analytics taxonomy itself
//!
//! The command-line front end lives in the application layer (gaunit-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use gaunit_core::{check_capture_file, TrackingPlan};
//! use std::path::Path;
//!
//! let plan = TrackingPlan::load(Path::new("tracking_plan.json")).unwrap();
//! let result = check_capture_file("home", &plan, Path::new("session.har")).unwrap();
//!
//! for status in result.status_of_expected_events() {
//!     println!("{} -> {}", status.event, if status.found { "OK" } else { "missing" });
//! }
//! assert!(result.was_successful());
//! ```

// Public modules
pub mod capture;
pub mod checker;
pub mod config;
pub mod matcher;
pub mod parser;
pub mod query;
pub mod result;
pub mod test_case;
pub mod tracking_plan;
pub mod types;

// Re-export main types for convenience
pub use capture::{CaptureSource, CapturedRequest};
pub use checker::{check_capture, check_capture_file, check_perf_log, check_url_log, Checker};
pub use config::EndpointConfig;
pub use matcher::{match_events, Checklists, MatchMode};
pub use result::{ActualStatus, CheckResult, ExpectedStatus, Summary};
pub use test_case::TestCase;
pub use tracking_plan::TrackingPlan;
pub use types::{ActualEvent, Event, GaUnitError, Result, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
