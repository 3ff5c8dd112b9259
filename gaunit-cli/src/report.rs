//! Report printing
//!
//! Writes the check outcome to stdout: the expected events (missing ones, or
//! all of them), optionally every captured event, then the summary.

use anyhow::{Context, Result};
use gaunit_core::CheckResult;
use std::io::{self, Write};

/// What to include in the report
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Show found expected events and all captured events, not only missing ones
    pub display_all: bool,
    /// Print captured events as request URLs instead of parameters
    pub show_urls: bool,
}

pub fn print_report(result: &CheckResult, options: ReportOptions) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, result, options).context("Failed to write report")
}

pub fn write_report<W: Write>(
    out: &mut W,
    result: &CheckResult,
    options: ReportOptions,
) -> io::Result<()> {
    if options.display_all {
        writeln!(out, "Captured events:")?;
        result.write_actual_events(out, options.show_urls)?;
        writeln!(out)?;
        writeln!(out, "Expected events:")?;
    }
    result.write_result(out, options.display_all)?;
    out.flush()
}
