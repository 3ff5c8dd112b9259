//! Check results and reporting
//!
//! A `CheckResult` is produced once per check and never changes. It can be
//! asserted on (`was_successful`), inspected per event, or rendered as a
//! plain-text report.

use crate::matcher::Checklists;
use crate::types::{ActualEvent, Event};
use std::fmt;
use std::io::{self, Write};

const RULE_WIDTH: usize = 70;

/// Outcome of checking one test case
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    test_case_id: String,
    expected: Vec<Event>,
    actual: Vec<ActualEvent>,
    checklist_expected: Vec<bool>,
    checklist_actual: Vec<bool>,
}

/// An expected event and whether it was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedStatus<'a> {
    pub event: &'a Event,
    pub found: bool,
}

/// A captured event and whether it satisfied an expected event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActualStatus<'a> {
    pub event: &'a ActualEvent,
    pub expected: bool,
}

/// Counts shown at the end of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Actual events captured
    pub captured: usize,
    /// Actual events that satisfied an expected event
    pub matched: usize,
    /// Expected events in the tracking plan
    pub expected: usize,
    /// Expected events not found
    pub missing: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events captured, {} matched the tracking plan, {} of {} expected events missing",
            self.captured, self.matched, self.missing, self.expected
        )
    }
}

impl CheckResult {
    /// Assemble a result from matched inputs
    pub fn new(
        test_case_id: impl Into<String>,
        expected: Vec<Event>,
        actual: Vec<ActualEvent>,
        checklists: Checklists,
    ) -> Self {
        debug_assert_eq!(expected.len(), checklists.expected.len());
        debug_assert_eq!(actual.len(), checklists.actual.len());
        Self {
            test_case_id: test_case_id.into(),
            expected,
            actual,
            checklist_expected: checklists.expected,
            checklist_actual: checklists.actual,
        }
    }

    pub fn test_case_id(&self) -> &str {
        &self.test_case_id
    }

    pub fn expected_events(&self) -> &[Event] {
        &self.expected
    }

    pub fn actual_events(&self) -> &[ActualEvent] {
        &self.actual
    }

    pub fn checklist_expected(&self) -> &[bool] {
        &self.checklist_expected
    }

    pub fn checklist_actual(&self) -> &[bool] {
        &self.checklist_actual
    }

    /// True if every expected event was found
    pub fn was_successful(&self) -> bool {
        self.checklist_expected.iter().all(|&found| found)
    }

    pub fn status_of_expected_events(&self) -> Vec<ExpectedStatus<'_>> {
        self.expected
            .iter()
            .zip(&self.checklist_expected)
            .map(|(event, &found)| ExpectedStatus { event, found })
            .collect()
    }

    pub fn status_of_actual_events(&self) -> Vec<ActualStatus<'_>> {
        self.actual
            .iter()
            .zip(&self.checklist_actual)
            .map(|(event, &expected)| ActualStatus { event, expected })
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            captured: self.actual.len(),
            matched: self.checklist_actual.iter().filter(|&&m| m).count(),
            expected: self.expected.len(),
            missing: self.checklist_expected.iter().filter(|&&found| !found).count(),
        }
    }

    /// Render the report: missing expected events (all of them when
    /// `display_all`), then the summary and a pass/fail banner
    pub fn write_result<W: Write>(&self, out: &mut W, display_all: bool) -> io::Result<()> {
        for status in self.status_of_expected_events() {
            if status.found && !display_all {
                continue;
            }
            writeln!(out, "{}", status.event)?;
            writeln!(
                out,
                "{} {}",
                "-".repeat(RULE_WIDTH),
                if status.found { "OK" } else { "missing" }
            )?;
        }

        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "{}", self.summary())?;
        if self.was_successful() {
            writeln!(out, "PASSED: {}", self.test_case_id)
        } else {
            writeln!(out, "FAILED: {}", self.test_case_id)
        }
    }

    /// Render every captured event, marking the ones that were expected
    ///
    /// With `show_urls` the request URL is printed instead of the parameters.
    pub fn write_actual_events<W: Write>(&self, out: &mut W, show_urls: bool) -> io::Result<()> {
        for status in self.status_of_actual_events() {
            let event = status.event;
            if let Some(ts) = event.timestamp {
                write!(out, "[{}] ", ts.format("%H:%M:%S%.3f"))?;
            }
            if show_urls {
                writeln!(out, "{}", event.url)?;
            } else {
                writeln!(out, "{}", event.params)?;
            }
            writeln!(
                out,
                "{} {}",
                "-".repeat(RULE_WIDTH),
                if status.expected { "OK" } else { "skip" }
            )?;
        }
        Ok(())
    }

    /// Print the report to stdout
    pub fn print_result(&self, display_all: bool) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_result(&mut out, display_all)
    }

    /// Print every captured event to stdout
    pub fn print_actual_events(&self, show_urls: bool) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_actual_events(&mut out, show_urls)
    }
}
